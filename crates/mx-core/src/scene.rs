//! Scene-graph elements: parts, assemblies and instances

use std::fmt;
use std::sync::Arc;

use mx_cad::Transformation;
use serde::{Deserialize, Serialize};

use crate::appearance::Appearance;
use crate::pmi::PmiTable;
use crate::property::PropertyTable;
use crate::representation::{
    BRepRepresentation, Lod, PolyRepresentation, RepresentationVisitor,
};

/// Stable handle of an element inside its model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub(crate) u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementType {
    Part,
    Assembly,
    Instance,
}

impl ElementType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Part => "Part",
            Self::Assembly => "Assembly",
            Self::Instance => "Instance",
        }
    }
}

/// Attributes every element carries
#[derive(Debug, Clone, Default)]
pub struct ElementCommon {
    pub name: Option<String>,
    pub appearance: Option<Arc<Appearance>>,
    pub properties: PropertyTable,
    pub pmi: Option<PmiTable>,
}

/// Leaf element holding geometry
#[derive(Debug, Clone, Default)]
pub struct Part {
    brep: Option<BRepRepresentation>,
    polys: Vec<PolyRepresentation>,
}

impl Part {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_brep(brep: BRepRepresentation) -> Self {
        Self {
            brep: Some(brep),
            polys: Vec::new(),
        }
    }

    pub fn brep(&self) -> Option<&BRepRepresentation> {
        self.brep.as_ref()
    }

    pub fn brep_mut(&mut self) -> Option<&mut BRepRepresentation> {
        self.brep.as_mut()
    }

    /// Set the exact representation, returning the previous one
    pub fn replace_brep(&mut self, brep: BRepRepresentation) -> Option<BRepRepresentation> {
        self.brep.replace(brep)
    }

    pub fn add_poly(&mut self, poly: PolyRepresentation) {
        self.polys.push(poly);
    }

    pub fn polys(&self) -> &[PolyRepresentation] {
        &self.polys
    }

    pub fn clear_polys(&mut self) {
        self.polys.clear();
    }

    /// The most recently added poly representation
    pub fn latest_poly(&self) -> Option<&PolyRepresentation> {
        self.polys.last()
    }

    /// The most recently added poly representation for `lod`
    pub fn poly_for_lod(&self, lod: Lod) -> Option<&PolyRepresentation> {
        self.polys.iter().rev().find(|p| p.lod() == Some(lod))
    }

    /// Copy with fresh representation identities; B-Rep to poly links
    /// follow the copied poly representations
    pub fn duplicate(&self) -> Self {
        let polys: Vec<PolyRepresentation> =
            self.polys.iter().map(PolyRepresentation::duplicate).collect();
        let brep = self.brep.as_ref().map(|brep| {
            let mut copy = brep.duplicate();
            for (old, new) in self.polys.iter().zip(&polys) {
                copy.retarget_links(old.id(), new.id());
            }
            copy
        });
        Self { brep, polys }
    }

    pub fn accept_representations<V: RepresentationVisitor + ?Sized>(&self, visitor: &mut V) {
        if let Some(brep) = &self.brep {
            visitor.visit_brep(brep);
        }
        for poly in &self.polys {
            visitor.visit_poly(poly);
        }
    }
}

/// Ordered group of instances
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub(crate) instances: Vec<ElementId>,
}

impl Assembly {
    pub fn instances(&self) -> &[ElementId] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Placed reference to a part or an assembly
#[derive(Debug, Clone)]
pub struct Instance {
    pub(crate) target: ElementId,
    transformation: Option<Transformation>,
}

impl Instance {
    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn transformation(&self) -> Option<&Transformation> {
        self.transformation.as_ref()
    }

    /// Local transformation, identity when none is set
    pub fn local(&self) -> Transformation {
        self.transformation.unwrap_or_default()
    }

    pub fn set_transformation(&mut self, transformation: Option<Transformation>) {
        self.transformation = transformation;
    }
}

#[derive(Debug, Clone)]
pub enum ElementKind {
    Part(Part),
    Assembly(Assembly),
    Instance(Instance),
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Part(_) => ElementType::Part,
            Self::Assembly(_) => ElementType::Assembly,
            Self::Instance(_) => ElementType::Instance,
        }
    }
}

/// An element stored in a model
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub common: ElementCommon,
    pub kind: ElementKind,
}

impl SceneNode {
    pub(crate) fn new(name: Option<&str>, kind: ElementKind) -> Self {
        Self {
            common: ElementCommon {
                name: name.map(str::to_owned),
                ..Default::default()
            },
            kind,
        }
    }

    pub(crate) fn instance(target: ElementId, transformation: Option<Transformation>, name: Option<&str>) -> Self {
        Self::new(
            name,
            ElementKind::Instance(Instance {
                target,
                transformation,
            }),
        )
    }

    pub fn name(&self) -> Option<&str> {
        self.common.name.as_deref()
    }

    /// Name for reports; `"unnamed"` when absent
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or("unnamed")
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_latest_poly_and_lod_lookup() {
        let mut part = Part::new();
        let coarse = PolyRepresentation::default().with_lod(Lod::Coarse);
        let fine = PolyRepresentation::default().with_lod(Lod::Fine);
        let fine_id = fine.id();
        part.add_poly(coarse);
        part.add_poly(fine);

        assert_eq!(part.latest_poly().map(PolyRepresentation::id), Some(fine_id));
        assert!(part.poly_for_lod(Lod::Coarse).is_some());
        assert!(part.poly_for_lod(Lod::Medium).is_none());
    }

    #[test]
    fn test_instance_without_transformation_is_identity() {
        let node = SceneNode::instance(ElementId(0), None, None);
        let ElementKind::Instance(instance) = &node.kind else {
            panic!("expected an instance");
        };
        assert!(instance.local().is_identity());
        assert_eq!(node.display_name(), "unnamed");

        let moved = Transformation::from_translation(DVec3::X);
        let node = SceneNode::instance(ElementId(0), Some(moved), Some("bolt"));
        assert_eq!(node.display_name(), "bolt");
    }

    #[test]
    fn test_accept_representations_order() {
        #[derive(Default)]
        struct Kinds(Vec<&'static str>);
        impl RepresentationVisitor for Kinds {
            fn visit_brep(&mut self, _: &BRepRepresentation) {
                self.0.push("brep");
            }
            fn visit_poly(&mut self, _: &PolyRepresentation) {
                self.0.push("poly");
            }
        }

        let mut part = Part::with_brep(BRepRepresentation::default());
        part.add_poly(PolyRepresentation::default());
        let mut kinds = Kinds::default();
        part.accept_representations(&mut kinds);
        assert_eq!(kinds.0, vec!["brep", "poly"]);
    }
}
