//! Structural edits recorded during a traversal and applied afterwards

use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::representation::{BRepRepresentation, PolyRepresentation};
use crate::scene::ElementId;

#[derive(Debug, Clone)]
pub enum Edit {
    RemoveRoot(ElementId),
    RemoveInstance {
        assembly: ElementId,
        instance: ElementId,
    },
    ReplaceBRep {
        part: ElementId,
        brep: BRepRepresentation,
    },
    AddPoly {
        part: ElementId,
        poly: PolyRepresentation,
    },
}

impl Edit {
    fn apply(self, model: &mut Model) -> ModelResult<()> {
        match self {
            Self::RemoveRoot(element) => {
                if model.remove_root(element) == 0 {
                    return Err(ModelError::UnknownElement(element));
                }
            }
            Self::RemoveInstance { assembly, instance } => {
                model.assembly_remove_instance(assembly, instance)?;
            }
            Self::ReplaceBRep { part, brep } => {
                model.part_mut(part)?.replace_brep(brep);
            }
            Self::AddPoly { part, poly } => model.part_mut(part)?.add_poly(poly),
        }
        Ok(())
    }
}

/// Edits collected by a visitor, applied once the walk is over
#[derive(Debug, Clone, Default)]
pub struct EditQueue {
    edits: Vec<Edit>,
}

impl EditQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    pub fn remove_root(&mut self, element: ElementId) {
        self.push(Edit::RemoveRoot(element));
    }

    pub fn remove_instance(&mut self, assembly: ElementId, instance: ElementId) {
        self.push(Edit::RemoveInstance { assembly, instance });
    }

    pub fn replace_brep(&mut self, part: ElementId, brep: BRepRepresentation) {
        self.push(Edit::ReplaceBRep { part, brep });
    }

    pub fn add_poly(&mut self, part: ElementId, poly: PolyRepresentation) {
        self.push(Edit::AddPoly { part, poly });
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply every edit in recording order; failing edits are logged and skipped
    pub fn apply(self, model: &mut Model) -> usize {
        let total = self.edits.len();
        let mut applied = 0;
        for edit in self.edits {
            match edit.apply(model) {
                Ok(()) => applied += 1,
                Err(e) => tracing::warn!("Deferred edit failed: {}", e),
            }
        }
        tracing::debug!("Applied {}/{} deferred edits", applied, total);
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Part;

    #[test]
    fn test_failed_edits_are_skipped() {
        let mut model = Model::new("demo");
        let part = model.add_part(Some("p"), Part::new());
        let assembly = model.add_assembly(Some("a"));
        let instance = model.assembly_add_instance(assembly, part, None, None).unwrap();
        model.add_root(assembly).unwrap();

        let mut queue = EditQueue::new();
        queue.remove_instance(assembly, instance);
        queue.remove_instance(assembly, instance);
        queue.add_poly(part, PolyRepresentation::default());
        queue.add_poly(assembly, PolyRepresentation::default());
        queue.remove_root(assembly);
        assert_eq!(queue.len(), 5);

        assert_eq!(queue.apply(&mut model), 3);
        assert!(model.assembly(assembly).unwrap().is_empty());
        assert_eq!(model.part(part).unwrap().polys().len(), 1);
        assert!(model.is_empty());
    }

    #[test]
    fn test_replace_brep() {
        let mut model = Model::new("demo");
        let part = model.add_part(None, Part::with_brep(BRepRepresentation::default()));
        let replacement = BRepRepresentation::default();
        let id = replacement.id();

        let mut queue = EditQueue::new();
        queue.replace_brep(part, replacement);
        queue.apply(&mut model);
        assert_eq!(model.part(part).unwrap().brep().map(BRepRepresentation::id), Some(id));
    }
}
