//! Bill of materials: nested listing and occurrence counts

use std::fmt;

use indexmap::IndexMap;
use mx_cad::Visit;

use crate::model::Model;
use crate::scene::{Assembly, ElementId, ElementType, Instance, Part};
use crate::traverse::{ElementVisitor, VisitContext};

#[derive(Debug, Clone, PartialEq)]
pub struct BomLine {
    pub depth: usize,
    pub element_type: ElementType,
    pub name: String,
}

/// Occurrences of one part or assembly, counted by identity
#[derive(Debug, Clone, PartialEq)]
pub struct BomEntry {
    pub element: ElementId,
    pub element_type: ElementType,
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Bom {
    pub lines: Vec<BomLine>,
    pub entries: Vec<BomEntry>,
}

impl Bom {
    pub fn entry(&self, element: ElementId) -> Option<&BomEntry> {
        self.entries.iter().find(|e| e.element == element)
    }
}

#[derive(Default)]
struct BomVisitor {
    lines: Vec<BomLine>,
    counts: IndexMap<ElementId, (ElementType, String, usize)>,
}

impl BomVisitor {
    fn record(&mut self, ctx: &VisitContext<'_>) {
        self.lines.push(BomLine {
            depth: ctx.depth,
            element_type: ctx.element_type(),
            name: ctx.name().to_owned(),
        });
        if ctx.element_type() != ElementType::Instance {
            self.counts
                .entry(ctx.id)
                .or_insert_with(|| (ctx.element_type(), ctx.name().to_owned(), 0))
                .2 += 1;
        }
    }
}

impl ElementVisitor for BomVisitor {
    fn visit_part(&mut self, ctx: &VisitContext<'_>, _part: &Part) {
        self.record(ctx);
    }

    fn visit_enter_assembly(&mut self, ctx: &VisitContext<'_>, _assembly: &Assembly) -> Visit {
        self.record(ctx);
        Visit::Continue
    }

    fn visit_enter_instance(&mut self, ctx: &VisitContext<'_>, _instance: &Instance) -> Visit {
        self.record(ctx);
        Visit::Continue
    }
}

pub fn bill_of_materials(model: &Model) -> Bom {
    let mut visitor = BomVisitor::default();
    model.accept(&mut visitor);
    Bom {
        lines: visitor.lines,
        entries: visitor
            .counts
            .into_iter()
            .map(|(element, (element_type, name, count))| BomEntry {
                element,
                element_type,
                name,
                count,
            })
            .collect(),
    }
}

impl fmt::Display for Bom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(
                f,
                "{}{}: {}",
                "--- ".repeat(line.depth),
                line.element_type.name(),
                line.name
            )?;
        }
        let margin = self
            .entries
            .iter()
            .map(|e| e.name.len())
            .chain(["name".len(), "Assembly".len()])
            .max()
            .unwrap_or_default();
        writeln!(f, "Total:")?;
        writeln!(f, "\t{:margin$} | {:margin$} | count", "name", "type")?;
        for entry in &self.entries {
            writeln!(
                f,
                "\t{:margin$} | {:margin$} | {}",
                entry.name,
                entry.element_type.name(),
                entry.count
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::nut_bolt;

    #[test]
    fn test_counts_follow_identity() {
        let fixture = nut_bolt();
        let bom = bill_of_materials(&fixture.model);

        assert_eq!(bom.entry(fixture.bolt).unwrap().count, 3);
        assert_eq!(bom.entry(fixture.nut).unwrap().count, 2);
        assert_eq!(bom.entry(fixture.assembly).unwrap().count, 2);
        assert_eq!(bom.entries.len(), 3);
    }

    #[test]
    fn test_listing_is_nested() {
        let fixture = nut_bolt();
        let text = bill_of_materials(&fixture.model).to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Instance: nut-bolt-1"));
        assert_eq!(lines.next(), Some("--- Assembly: nut-bolt"));
        assert_eq!(lines.next(), Some("--- --- Instance: bolt-1"));
        assert_eq!(lines.next(), Some("--- --- --- Part: bolt"));
        assert!(text.contains("Total:"));
    }
}
