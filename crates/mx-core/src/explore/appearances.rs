//! Distinct appearances used anywhere in a model

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use mx_cad::ShapeId;

use super::reachable_elements;
use crate::appearance::{Appearance, AppearanceId};
use crate::error::ModelResult;
use crate::model::Model;
use crate::representation::PolyShapeId;
use crate::scene::{ElementId, ElementKind};

/// Where an appearance is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppearanceSource {
    Element(ElementId),
    Shape { part: ElementId, shape: ShapeId },
    PolyShape { part: ElementId, shape: PolyShapeId },
}

#[derive(Debug, Clone)]
pub struct AppearanceUse {
    pub appearance: Arc<Appearance>,
    pub sources: Vec<AppearanceSource>,
}

/// Appearances keyed by identity, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct AppearanceReport {
    pub appearances: IndexMap<AppearanceId, AppearanceUse>,
}

impl AppearanceReport {
    fn record(&mut self, appearance: &Arc<Appearance>, source: AppearanceSource) {
        self.appearances
            .entry(appearance.id())
            .or_insert_with(|| AppearanceUse {
                appearance: appearance.clone(),
                sources: Vec::new(),
            })
            .sources
            .push(source);
    }

    pub fn len(&self) -> usize {
        self.appearances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appearances.is_empty()
    }
}

/// Collect appearances of elements, B-Rep sub-shapes and poly shapes
pub fn collect_appearances(model: &Model) -> ModelResult<AppearanceReport> {
    let mut report = AppearanceReport::default();
    for id in reachable_elements(model) {
        let node = model.element(id)?;
        if let Some(appearance) = &node.common.appearance {
            report.record(appearance, AppearanceSource::Element(id));
        }
        let ElementKind::Part(part) = &node.kind else {
            continue;
        };
        if let Some(brep) = part.brep() {
            let data = brep.data()?;
            let mut shapes: Vec<_> = data.appearances().collect();
            shapes.sort_by_key(|(shape, _)| *shape);
            for (shape, appearance) in shapes {
                report.record(appearance, AppearanceSource::Shape { part: id, shape });
            }
        }
        for poly in part.polys() {
            for (shape, poly_shape) in poly.get()?.shapes() {
                if let Some(appearance) = &poly_shape.appearance {
                    report.record(appearance, AppearanceSource::PolyShape { part: id, shape });
                }
            }
        }
    }
    Ok(report)
}

impl fmt::Display for AppearanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total unique appearances: {}", self.appearances.len())?;
        for (id, usage) in &self.appearances {
            match usage.appearance.display_color() {
                Some(c) => writeln!(
                    f,
                    "  {id}: color ({:.3}, {:.3}, {:.3}, {:.3}), used {} times",
                    c.r,
                    c.g,
                    c.b,
                    c.a,
                    usage.sources.len()
                )?,
                None => writeln!(f, "  {id}: no color, used {} times", usage.sources.len())?,
            }
        }
        Ok(())
    }
}
