//! Default layers and per-layer statistics

use std::fmt;

use crate::error::ModelResult;
use crate::layer::{Layer, LayerItemVisitor, LayerShape};
use crate::model::Model;
use crate::scene::{ElementId, ElementKind, ElementType};

use super::reachable_elements;

pub const ELEMENT_LAYER: &str = "SGELayer";
pub const SUBSHAPE_LAYER: &str = "SubshapesLayer";

/// Put every element in one layer and every body in another
///
/// Does nothing and returns false when the model already has layers.
pub fn fill_default_layers(model: &mut Model) -> ModelResult<bool> {
    if !model.layers().is_empty() {
        return Ok(false);
    }
    let mut elements = Layer::new(ELEMENT_LAYER);
    let mut subshapes = Layer::new(SUBSHAPE_LAYER);
    for id in reachable_elements(model) {
        elements.add_element(id);
        if let ElementKind::Part(part) = &model.element(id)?.kind
            && let Some(brep) = part.brep()
        {
            for &body in brep.get()? {
                subshapes.add_shape(brep.id(), body);
            }
        }
    }
    tracing::debug!(
        "Default layers: {} elements, {} shapes",
        elements.elements().len(),
        subshapes.shapes().len()
    );
    model.add_layer(elements);
    model.add_layer(subshapes);
    Ok(true)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerStatistics {
    pub name: String,
    pub parts: usize,
    pub assemblies: usize,
    pub instances: usize,
    pub shapes: usize,
}

struct Counter<'m> {
    model: &'m Model,
    stats: LayerStatistics,
}

impl LayerItemVisitor for Counter<'_> {
    fn visit_element(&mut self, element: ElementId) {
        match self.model.element(element).map(|n| n.element_type()) {
            Ok(ElementType::Part) => self.stats.parts += 1,
            Ok(ElementType::Assembly) => self.stats.assemblies += 1,
            Ok(ElementType::Instance) => self.stats.instances += 1,
            Err(e) => tracing::warn!("Layer {}: {}", self.stats.name, e),
        }
    }

    fn visit_shape(&mut self, _item: LayerShape) {
        self.stats.shapes += 1;
    }
}

pub fn layer_statistics(model: &Model) -> Vec<LayerStatistics> {
    model
        .layers()
        .iter()
        .map(|layer| {
            let mut counter = Counter {
                model,
                stats: LayerStatistics {
                    name: layer.name().to_owned(),
                    ..Default::default()
                },
            };
            layer.accept(&mut counter);
            counter.stats
        })
        .collect()
}

impl fmt::Display for LayerStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Layer {}: {} parts, {} assemblies, {} instances, {} shapes",
            self.name, self.parts, self.assemblies, self.instances, self.shapes
        )
    }
}
