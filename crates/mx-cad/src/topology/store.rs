//! Shape arena

use std::sync::Arc;

use glam::DVec3;

use super::{
    BodyType, Orientation, ShapeId, ShapeRef, ShapeType, TopologyError, TopologyResult,
};
use crate::geom::{Curve, Curve2d, Surface, check_range};
use crate::precision::DEFAULT_TOLERANCE;

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub point: DVec3,
    pub tolerance: f64,
}

/// 2D curve of an edge in the parameter space of one of its faces
#[derive(Debug, Clone, PartialEq)]
pub struct PCurve {
    pub face: ShapeId,
    pub curve: Arc<Curve2d>,
    pub range: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Absent for degenerate edges
    pub curve: Option<Arc<Curve>>,
    pub range: (f64, f64),
    pub vertices: Vec<ShapeRef>,
    pub pcurves: Vec<PCurve>,
    pub degenerate: bool,
    pub tolerance: f64,
}

impl Edge {
    pub fn pcurve(&self, face: ShapeId) -> Option<&PCurve> {
        self.pcurves.iter().find(|p| p.face == face)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wire {
    pub edges: Vec<ShapeRef>,
}

/// Surface bounded by one outer wire and any number of inner wires (holes)
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Absent only for incomplete data handed over by a reader
    pub surface: Option<Arc<Surface>>,
    pub outer: Option<ShapeRef>,
    pub inner: Vec<ShapeRef>,
}

impl Face {
    pub fn wires(&self) -> impl Iterator<Item = ShapeRef> + '_ {
        self.outer.iter().chain(self.inner.iter()).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shell {
    pub faces: Vec<ShapeRef>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solid {
    pub shells: Vec<ShapeRef>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    pub body_type: BodyType,
    pub children: Vec<ShapeRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Vertex(Vertex),
    Edge(Edge),
    Wire(Wire),
    Face(Face),
    Shell(Shell),
    Solid(Solid),
    Body(Body),
}

impl Shape {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Self::Vertex(_) => ShapeType::Vertex,
            Self::Edge(_) => ShapeType::Edge,
            Self::Wire(_) => ShapeType::Wire,
            Self::Face(_) => ShapeType::Face,
            Self::Shell(_) => ShapeType::Shell,
            Self::Solid(_) => ShapeType::Solid,
            Self::Body(_) => ShapeType::Body,
        }
    }
}

/// Append-only arena of shapes
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    fn push(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId(self.shapes.len() as u32);
        self.shapes.push(shape);
        id
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.index())
    }

    fn get_mut(&mut self, id: ShapeId) -> TopologyResult<&mut Shape> {
        self.shapes
            .get_mut(id.index())
            .ok_or(TopologyError::UnknownShape(id))
    }

    /// Kind of the shape, `Undefined` if the id is not in this store
    pub fn shape_type(&self, id: ShapeId) -> ShapeType {
        self.get(id)
            .map_or(ShapeType::Undefined, Shape::shape_type)
    }

    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        (0..self.shapes.len() as u32).map(ShapeId)
    }

    // ============== Builders ==============

    pub fn add_vertex(&mut self, point: DVec3, tolerance: f64) -> ShapeId {
        self.push(Shape::Vertex(Vertex { point, tolerance }))
    }

    /// Edge along `curve` between parameters `first` and `last`
    pub fn add_edge(&mut self, curve: Arc<Curve>, first: f64, last: f64) -> TopologyResult<ShapeId> {
        check_range(first, last)?;
        Ok(self.push(Shape::Edge(Edge {
            curve: Some(curve),
            range: (first, last),
            vertices: Vec::new(),
            pcurves: Vec::new(),
            degenerate: false,
            tolerance: DEFAULT_TOLERANCE,
        })))
    }

    /// Straight edge between two new vertices
    pub fn add_segment(&mut self, start: DVec3, end: DVec3) -> TopologyResult<ShapeId> {
        let length = start.distance(end);
        let curve = Arc::new(Curve::line(start, end - start));
        let edge = self.add_edge(curve, 0.0, length)?;
        let v1 = self.add_vertex(start, DEFAULT_TOLERANCE);
        let v2 = self.add_vertex(end, DEFAULT_TOLERANCE);
        self.append(edge, ShapeRef::forward(v1))?;
        self.append(edge, ShapeRef::new(v2, Orientation::Reversed))?;
        Ok(edge)
    }

    /// Topology-only edge, e.g. at the pole of a sphere
    pub fn add_degenerate_edge(&mut self, first: f64, last: f64) -> TopologyResult<ShapeId> {
        check_range(first, last)?;
        Ok(self.push(Shape::Edge(Edge {
            curve: None,
            range: (first, last),
            vertices: Vec::new(),
            pcurves: Vec::new(),
            degenerate: true,
            tolerance: DEFAULT_TOLERANCE,
        })))
    }

    /// Attach (or replace) the PCurve of `edge` on `face`
    pub fn set_pcurve(
        &mut self,
        edge: ShapeId,
        face: ShapeId,
        curve: Arc<Curve2d>,
        first: f64,
        last: f64,
    ) -> TopologyResult<()> {
        check_range(first, last)?;
        if self.shape_type(face) != ShapeType::Face {
            return Err(TopologyError::UnknownShape(face));
        }
        let Shape::Edge(data) = self.get_mut(edge)? else {
            return Err(TopologyError::UnknownShape(edge));
        };
        data.pcurves.retain(|p| p.face != face);
        data.pcurves.push(PCurve {
            face,
            curve,
            range: (first, last),
        });
        Ok(())
    }

    pub fn add_wire(
        &mut self,
        edges: impl IntoIterator<Item = ShapeRef>,
    ) -> TopologyResult<ShapeId> {
        let wire = self.push(Shape::Wire(Wire::default()));
        for edge in edges {
            self.append(wire, edge)?;
        }
        Ok(wire)
    }

    pub fn add_face(&mut self, surface: Arc<Surface>) -> ShapeId {
        self.push(Shape::Face(Face {
            surface: Some(surface),
            outer: None,
            inner: Vec::new(),
        }))
    }

    /// Face whose surface was not supplied
    pub fn add_bare_face(&mut self) -> ShapeId {
        self.push(Shape::Face(Face {
            surface: None,
            outer: None,
            inner: Vec::new(),
        }))
    }

    pub fn add_shell(&mut self, faces: impl IntoIterator<Item = ShapeRef>) -> TopologyResult<ShapeId> {
        let shell = self.push(Shape::Shell(Shell::default()));
        for face in faces {
            self.append(shell, face)?;
        }
        Ok(shell)
    }

    pub fn add_solid(&mut self, shells: impl IntoIterator<Item = ShapeRef>) -> TopologyResult<ShapeId> {
        let solid = self.push(Shape::Solid(Solid::default()));
        for shell in shells {
            self.append(solid, shell)?;
        }
        Ok(solid)
    }

    pub fn add_body(
        &mut self,
        body_type: BodyType,
        children: impl IntoIterator<Item = ShapeRef>,
    ) -> TopologyResult<ShapeId> {
        let body = self.push(Shape::Body(Body {
            body_type,
            children: Vec::new(),
        }));
        for child in children {
            self.append(body, child)?;
        }
        Ok(body)
    }

    /// Append `child` under `parent`
    ///
    /// On a face, a reversed wire becomes an inner boundary and any other
    /// wire becomes the outer boundary, whatever the call order.
    pub fn append(&mut self, parent: ShapeId, child: ShapeRef) -> TopologyResult<()> {
        let child_type = self.shape_type(child.id);
        if child_type == ShapeType::Undefined {
            return Err(TopologyError::UnknownShape(child.id));
        }
        let parent_type = self.shape_type(parent);
        let invalid = TopologyError::InvalidChild {
            parent: parent_type,
            child: child_type,
        };
        match (self.get_mut(parent)?, child_type) {
            (Shape::Edge(edge), ShapeType::Vertex) => {
                if edge.vertices.len() >= 2 {
                    return Err(TopologyError::TooManyVertices(parent));
                }
                edge.vertices.push(child);
            }
            (Shape::Wire(wire), ShapeType::Edge) => wire.edges.push(child),
            (Shape::Face(face), ShapeType::Wire) => {
                if child.orientation == Orientation::Reversed {
                    face.inner.push(child);
                } else if face.outer.is_some() {
                    return Err(TopologyError::OuterWireExists(parent));
                } else {
                    face.outer = Some(child);
                }
            }
            (Shape::Shell(shell), ShapeType::Face) => shell.faces.push(child),
            (Shape::Solid(solid), ShapeType::Shell) => solid.shells.push(child),
            (Shape::Body(body), kind) if kind != ShapeType::Body => body.children.push(child),
            _ => return Err(invalid),
        }
        Ok(())
    }

    // ============== Queries ==============

    pub fn vertex(&self, id: ShapeId) -> Option<&Vertex> {
        match self.get(id)? {
            Shape::Vertex(vertex) => Some(vertex),
            _ => None,
        }
    }

    pub fn edge(&self, id: ShapeId) -> Option<&Edge> {
        match self.get(id)? {
            Shape::Edge(edge) => Some(edge),
            _ => None,
        }
    }

    pub fn face(&self, id: ShapeId) -> Option<&Face> {
        match self.get(id)? {
            Shape::Face(face) => Some(face),
            _ => None,
        }
    }

    pub fn body(&self, id: ShapeId) -> Option<&Body> {
        match self.get(id)? {
            Shape::Body(body) => Some(body),
            _ => None,
        }
    }

    /// Child uses of `shape`, oriented as seen through `shape`'s own orientation
    pub fn children(&self, shape: ShapeRef) -> Vec<ShapeRef> {
        let Some(data) = self.get(shape.id) else {
            return Vec::new();
        };
        let compose = |child: &ShapeRef| {
            ShapeRef::new(child.id, child.orientation.composed(shape.orientation))
        };
        match data {
            Shape::Vertex(_) => Vec::new(),
            Shape::Edge(edge) => edge.vertices.iter().map(compose).collect(),
            Shape::Wire(wire) => wire.edges.iter().map(compose).collect(),
            Shape::Face(face) => face.wires().map(|w| compose(&w)).collect(),
            Shape::Shell(shell) => shell.faces.iter().map(compose).collect(),
            Shape::Solid(solid) => solid.shells.iter().map(compose).collect(),
            Shape::Body(body) => body.children.iter().map(compose).collect(),
        }
    }
}
