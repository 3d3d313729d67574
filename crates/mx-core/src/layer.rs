//! Named groupings orthogonal to the scene-graph hierarchy

use mx_cad::ShapeId;
use uuid::Uuid;

use crate::representation::RepresentationId;
use crate::scene::ElementId;

/// A sub-shape of a specific B-Rep representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerShape {
    pub representation: RepresentationId,
    pub shape: ShapeId,
}

pub trait LayerItemVisitor {
    fn visit_element(&mut self, _element: ElementId) {}
    fn visit_shape(&mut self, _item: LayerShape) {}
}

#[derive(Debug, Clone)]
pub struct Layer {
    id: Uuid,
    name: String,
    elements: Vec<ElementId>,
    shapes: Vec<LayerShape>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            elements: Vec::new(),
            shapes: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns false if the element was already a member
    pub fn add_element(&mut self, element: ElementId) -> bool {
        if self.elements.contains(&element) {
            return false;
        }
        self.elements.push(element);
        true
    }

    pub fn add_shape(&mut self, representation: RepresentationId, shape: ShapeId) -> bool {
        let item = LayerShape {
            representation,
            shape,
        };
        if self.shapes.contains(&item) {
            return false;
        }
        self.shapes.push(item);
        true
    }

    pub(crate) fn retarget_shapes(&mut self, from: RepresentationId, to: RepresentationId) {
        for item in &mut self.shapes {
            if item.representation == from {
                item.representation = to;
            }
        }
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn shapes(&self) -> &[LayerShape] {
        &self.shapes
    }

    pub fn contains_element(&self, element: ElementId) -> bool {
        self.elements.contains(&element)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.shapes.is_empty()
    }

    /// Elements first, then shapes, each in insertion order
    pub fn accept<V: LayerItemVisitor + ?Sized>(&self, visitor: &mut V) {
        for &element in &self.elements {
            visitor.visit_element(element);
        }
        for &item in &self.shapes {
            visitor.visit_shape(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_is_deduplicated() {
        let mut layer = Layer::new("Hidden");
        assert!(layer.is_empty());
        assert!(layer.add_element(ElementId(2)));
        assert!(!layer.add_element(ElementId(2)));
        assert!(layer.add_element(ElementId(0)));
        assert_eq!(layer.elements(), &[ElementId(2), ElementId(0)]);
        assert!(layer.contains_element(ElementId(0)));
    }

    #[test]
    fn test_accept_visits_elements_then_shapes() {
        #[derive(Default)]
        struct Count(usize, usize);
        impl LayerItemVisitor for Count {
            fn visit_element(&mut self, _: ElementId) {
                self.0 += 1;
            }
            fn visit_shape(&mut self, _: LayerShape) {
                self.1 += 1;
            }
        }

        let mut store = mx_cad::ShapeStore::new();
        let shape = store.add_vertex(glam::DVec3::ZERO, 1e-7);
        let mut layer = Layer::new("Mixed");
        layer.add_element(ElementId(1));
        layer.add_shape(RepresentationId::new(), shape);

        let mut count = Count::default();
        layer.accept(&mut count);
        assert_eq!((count.0, count.1), (1, 1));
    }
}
