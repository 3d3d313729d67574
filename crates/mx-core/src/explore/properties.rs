//! Property tables of elements and B-Rep sub-shapes

use std::fmt;

use mx_cad::ShapeId;

use super::reachable_elements;
use crate::error::ModelResult;
use crate::model::Model;
use crate::property::{PropertyTable, PropertyVisitor};
use crate::scene::ElementKind;

#[derive(Debug, Clone)]
pub struct PropertySection {
    /// Element name, or element name and shape for sub-shapes
    pub owner: String,
    pub entries: Vec<String>,
}

impl PropertySection {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Renders each typed entry as `name: value (type)`
#[derive(Default)]
struct EntryPrinter(Vec<String>);

impl PropertyVisitor for EntryPrinter {
    fn visit_integer(&mut self, name: &str, value: i32) {
        self.0.push(format!("{name}: {value} (integer)"));
    }

    fn visit_double(&mut self, name: &str, value: f64) {
        self.0.push(format!("{name}: {value} (double)"));
    }

    fn visit_string(&mut self, name: &str, value: &str) {
        self.0.push(format!("{name}: \"{value}\" (string)"));
    }
}

fn section(owner: String, table: &PropertyTable) -> PropertySection {
    let mut printer = EntryPrinter::default();
    table.accept(&mut printer);
    PropertySection {
        owner,
        entries: printer.0,
    }
}

/// One section per distinct element, then one per sub-shape carrying a table
pub fn collect_properties(model: &Model) -> ModelResult<Vec<PropertySection>> {
    let mut sections = Vec::new();
    for id in reachable_elements(model) {
        let node = model.element(id)?;
        let name = format!("{} {}", node.element_type().name(), node.display_name());
        sections.push(section(name.clone(), &node.common.properties));

        if let ElementKind::Part(part) = &node.kind
            && let Some(brep) = part.brep()
        {
            let data = brep.data()?;
            let mut shapes: Vec<ShapeId> = data
                .store()
                .ids()
                .filter(|&shape| data.properties(shape).is_some())
                .collect();
            shapes.sort();
            for shape in shapes {
                if let Some(table) = data.properties(shape) {
                    let kind = data.store().shape_type(shape).name();
                    sections.push(section(format!("{name} / {kind} {shape}"), table));
                }
            }
        }
    }
    Ok(sections)
}

impl fmt::Display for PropertySection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Properties of {}:", self.owner)?;
        if self.entries.is_empty() {
            return writeln!(f, "  (empty)");
        }
        for entry in &self.entries {
            writeln!(f, "  {entry}")?;
        }
        Ok(())
    }
}
