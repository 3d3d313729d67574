//! The document: an element arena, ordered roots and layers

use mx_cad::Transformation;

use crate::error::{ModelError, ModelResult};
use crate::layer::Layer;
use crate::scene::{Assembly, ElementId, ElementKind, ElementType, Instance, Part, SceneNode};

/// Root container of a CAD document
///
/// Elements are stored once and referenced by [`ElementId`]; a part or an
/// assembly instanced several times is one element with several parents.
#[derive(Debug, Clone, Default)]
pub struct Model {
    name: String,
    nodes: Vec<SceneNode>,
    roots: Vec<ElementId>,
    layers: Vec<Layer>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    fn push(&mut self, node: SceneNode) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // ============== Building ==============

    pub fn add_part(&mut self, name: Option<&str>, part: Part) -> ElementId {
        self.push(SceneNode::new(name, ElementKind::Part(part)))
    }

    pub fn add_assembly(&mut self, name: Option<&str>) -> ElementId {
        self.push(SceneNode::new(name, ElementKind::Assembly(Assembly::default())))
    }

    /// Instance element not yet attached to an assembly (e.g. to be used as a root)
    pub fn add_instance(
        &mut self,
        target: ElementId,
        transformation: Option<Transformation>,
        name: Option<&str>,
    ) -> ModelResult<ElementId> {
        self.check_target(target)?;
        Ok(self.push(SceneNode::instance(target, transformation, name)))
    }

    /// Create an instance of `target` as the last child of `assembly`
    pub fn assembly_add_instance(
        &mut self,
        assembly: ElementId,
        target: ElementId,
        transformation: Option<Transformation>,
        name: Option<&str>,
    ) -> ModelResult<ElementId> {
        self.assembly(assembly)?;
        self.check_target(target)?;
        self.check_cycle(assembly, target)?;
        let instance = self.push(SceneNode::instance(target, transformation, name));
        self.assembly_mut(assembly)?.instances.push(instance);
        Ok(instance)
    }

    /// Attach an existing instance element as the last child of `assembly`
    pub fn assembly_attach(&mut self, assembly: ElementId, instance: ElementId) -> ModelResult<()> {
        self.assembly(assembly)?;
        let target = self.instance(instance)?.target();
        self.check_cycle(assembly, target)?;
        self.assembly_mut(assembly)?.instances.push(instance);
        Ok(())
    }

    /// Detach the first occurrence of `instance` from `assembly`
    pub fn assembly_remove_instance(
        &mut self,
        assembly: ElementId,
        instance: ElementId,
    ) -> ModelResult<()> {
        let children = &mut self.assembly_mut(assembly)?.instances;
        let position = children
            .iter()
            .position(|&child| child == instance)
            .ok_or(ModelError::NotAChild {
                assembly,
                instance,
            })?;
        children.remove(position);
        Ok(())
    }

    fn check_target(&self, target: ElementId) -> ModelResult<()> {
        match self.element(target)?.element_type() {
            ElementType::Instance => Err(ModelError::InvalidInstanceTarget(target)),
            _ => Ok(()),
        }
    }

    fn check_cycle(&self, assembly: ElementId, target: ElementId) -> ModelResult<()> {
        if self.reaches(target, assembly) {
            return Err(ModelError::WouldCreateCycle { assembly, target });
        }
        Ok(())
    }

    /// True if `to` is `from` or one of its descendants
    pub fn reaches(&self, from: ElementId, to: ElementId) -> bool {
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            match self.nodes.get(current.index()).map(|n| &n.kind) {
                Some(ElementKind::Assembly(assembly)) => stack.extend(&assembly.instances),
                Some(ElementKind::Instance(instance)) => stack.push(instance.target),
                _ => {}
            }
        }
        false
    }

    // ============== Roots and layers ==============

    pub fn add_root(&mut self, element: ElementId) -> ModelResult<()> {
        self.element(element)?;
        self.roots.push(element);
        Ok(())
    }

    /// Remove every root occurrence of `element`; returns how many were removed
    pub fn remove_root(&mut self, element: ElementId) -> usize {
        let before = self.roots.len();
        self.roots.retain(|&root| root != element);
        before - self.roots.len()
    }

    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn number_of_roots(&self) -> usize {
        self.roots.len()
    }

    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Drop every element, root and layer; the name is kept
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.layers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Copy whose parts own representations with fresh identities
    ///
    /// Element ids and roots are kept, so the copy can be compared element
    /// by element with `self`. Layer shape entries follow the copied B-Reps.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        for node in &mut copy.nodes {
            let ElementKind::Part(part) = &mut node.kind else {
                continue;
            };
            let source = part.brep().map(|brep| brep.id());
            *part = part.duplicate();
            if let (Some(from), Some(to)) = (source, part.brep().map(|brep| brep.id())) {
                for layer in &mut copy.layers {
                    layer.retarget_shapes(from, to);
                }
            }
        }
        copy
    }

    // ============== Lookup ==============

    pub fn element(&self, id: ElementId) -> ModelResult<&SceneNode> {
        self.nodes
            .get(id.index())
            .ok_or(ModelError::UnknownElement(id))
    }

    pub fn element_mut(&mut self, id: ElementId) -> ModelResult<&mut SceneNode> {
        self.nodes
            .get_mut(id.index())
            .ok_or(ModelError::UnknownElement(id))
    }

    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (ElementId(i as u32), node))
    }

    pub fn number_of_elements(&self) -> usize {
        self.nodes.len()
    }

    pub fn part(&self, id: ElementId) -> ModelResult<&Part> {
        match &self.element(id)?.kind {
            ElementKind::Part(part) => Ok(part),
            _ => Err(ModelError::NotAPart(id)),
        }
    }

    pub fn part_mut(&mut self, id: ElementId) -> ModelResult<&mut Part> {
        match &mut self.element_mut(id)?.kind {
            ElementKind::Part(part) => Ok(part),
            _ => Err(ModelError::NotAPart(id)),
        }
    }

    pub fn assembly(&self, id: ElementId) -> ModelResult<&Assembly> {
        match &self.element(id)?.kind {
            ElementKind::Assembly(assembly) => Ok(assembly),
            _ => Err(ModelError::NotAnAssembly(id)),
        }
    }

    fn assembly_mut(&mut self, id: ElementId) -> ModelResult<&mut Assembly> {
        match &mut self.element_mut(id)?.kind {
            ElementKind::Assembly(assembly) => Ok(assembly),
            _ => Err(ModelError::NotAnAssembly(id)),
        }
    }

    pub fn instance(&self, id: ElementId) -> ModelResult<&Instance> {
        match &self.element(id)?.kind {
            ElementKind::Instance(instance) => Ok(instance),
            _ => Err(ModelError::NotAnInstance(id)),
        }
    }

    pub fn instance_mut(&mut self, id: ElementId) -> ModelResult<&mut Instance> {
        match &mut self.element_mut(id)?.kind {
            ElementKind::Instance(instance) => Ok(instance),
            _ => Err(ModelError::NotAnInstance(id)),
        }
    }

    pub fn find_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = ElementId> + 'a {
        self.elements()
            .filter(move |(_, node)| node.name() == Some(name))
            .map(|(id, _)| id)
    }
}
