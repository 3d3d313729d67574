//! Discrete geometry: point sets, polyline sets and indexed triangle sets

use glam::{DVec2, DVec3};

use crate::appearance::Color;
use crate::error::{ModelError, ModelResult};

/// Groups of raw points
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyPointSet {
    groups: Vec<Vec<DVec3>>,
}

impl PolyPointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, points: Vec<DVec3>) {
        self.groups.push(points);
    }

    pub fn groups(&self) -> &[Vec<DVec3>] {
        &self.groups
    }

    pub fn number_of_points(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }
}

/// Set of polylines, each an ordered point list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyLineSet {
    polylines: Vec<Vec<DVec3>>,
}

impl PolyLineSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_polyline(&mut self, points: Vec<DVec3>) -> ModelResult<usize> {
        if points.len() < 2 {
            return Err(ModelError::InvalidPolyData(
                "a polyline needs at least two points".into(),
            ));
        }
        self.polylines.push(points);
        Ok(self.polylines.len() - 1)
    }

    pub fn number_of_polylines(&self) -> usize {
        self.polylines.len()
    }

    pub fn polyline(&self, index: usize) -> Option<&[DVec3]> {
        self.polylines.get(index).map(Vec::as_slice)
    }

    pub fn number_of_points(&self) -> usize {
        self.polylines.iter().map(Vec::len).sum()
    }
}

/// Indexed triangles with optional per-vertex normals, colors and UVs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedTriangleSet {
    coordinates: Vec<DVec3>,
    triangles: Vec<[u32; 3]>,
    normals: Vec<DVec3>,
    colors: Vec<Color>,
    uvs: Vec<DVec2>,
}

impl IndexedTriangleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block of coordinates and polygons over it
    ///
    /// `indices` refer to `coordinates` of this block; `counts` gives the
    /// vertex count of each polygon. Polygons are fan-triangulated. Fails once
    /// per-vertex attributes are set, since they must cover every vertex.
    pub fn add_coordinates(
        &mut self,
        coordinates: Vec<DVec3>,
        indices: &[u32],
        counts: &[usize],
    ) -> ModelResult<()> {
        if self.has_normals() || self.has_colors() || self.has_uvs() {
            return Err(ModelError::InvalidPolyData(
                "coordinates cannot be added after per-vertex attributes".into(),
            ));
        }
        let total: usize = counts.iter().sum();
        if total != indices.len() {
            return Err(ModelError::InvalidPolyData(format!(
                "counts cover {total} indices but {} were given",
                indices.len()
            )));
        }
        if counts.iter().any(|&c| c < 3) {
            return Err(ModelError::InvalidPolyData(
                "a polygon needs at least three vertices".into(),
            ));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= coordinates.len()) {
            return Err(ModelError::InvalidPolyData(format!(
                "index {bad} is out of {} coordinates",
                coordinates.len()
            )));
        }

        let base = self.coordinates.len() as u32;
        let mut offset = 0;
        for &count in counts {
            let polygon = &indices[offset..offset + count];
            for i in 1..count - 1 {
                self.triangles.push([
                    base + polygon[0],
                    base + polygon[i],
                    base + polygon[i + 1],
                ]);
            }
            offset += count;
        }
        self.coordinates.extend(coordinates);
        Ok(())
    }

    fn check_per_vertex(&self, what: &str, len: usize) -> ModelResult<()> {
        if len != self.coordinates.len() {
            return Err(ModelError::InvalidPolyData(format!(
                "{len} {what} for {} vertices",
                self.coordinates.len()
            )));
        }
        Ok(())
    }

    pub fn set_normals(&mut self, normals: Vec<DVec3>) -> ModelResult<()> {
        self.check_per_vertex("normals", normals.len())?;
        self.normals = normals;
        Ok(())
    }

    pub fn set_colors(&mut self, colors: Vec<Color>) -> ModelResult<()> {
        self.check_per_vertex("colors", colors.len())?;
        self.colors = colors;
        Ok(())
    }

    pub fn set_uvs(&mut self, uvs: Vec<DVec2>) -> ModelResult<()> {
        self.check_per_vertex("uv coordinates", uvs.len())?;
        self.uvs = uvs;
        Ok(())
    }

    pub fn number_of_faces(&self) -> usize {
        self.triangles.len()
    }

    pub fn number_of_vertices(&self) -> usize {
        self.coordinates.len()
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    pub fn triangle(&self, face: usize) -> Option<[u32; 3]> {
        self.triangles.get(face).copied()
    }

    fn vertex_index(&self, face: usize, node: usize) -> Option<usize> {
        let triangle = self.triangles.get(face)?;
        triangle.get(node).map(|&i| i as usize)
    }

    pub fn coordinate(&self, face: usize, node: usize) -> Option<DVec3> {
        self.coordinates.get(self.vertex_index(face, node)?).copied()
    }

    pub fn vertex_normal(&self, face: usize, node: usize) -> Option<DVec3> {
        self.normals.get(self.vertex_index(face, node)?).copied()
    }

    pub fn vertex_color(&self, face: usize, node: usize) -> Option<Color> {
        self.colors.get(self.vertex_index(face, node)?).copied()
    }

    pub fn uv_coordinate(&self, face: usize, node: usize) -> Option<DVec2> {
        self.uvs.get(self.vertex_index(face, node)?).copied()
    }
}

/// One discrete primitive of a poly representation
#[derive(Debug, Clone, PartialEq)]
pub enum PolyVertexSet {
    PointSet(PolyPointSet),
    LineSet(PolyLineSet),
    Triangles(IndexedTriangleSet),
}

impl PolyVertexSet {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::PointSet(_) => "PolyPointSet",
            Self::LineSet(_) => "PolyLineSet",
            Self::Triangles(_) => "IndexedTriangleSet",
        }
    }

    pub fn number_of_triangles(&self) -> usize {
        match self {
            Self::Triangles(its) => its.number_of_faces(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> IndexedTriangleSet {
        let mut its = IndexedTriangleSet::new();
        its.add_coordinates(
            vec![DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y],
            &[0, 1, 2, 3],
            &[4],
        )
        .unwrap();
        its
    }

    #[test]
    fn test_quad_is_fan_triangulated() {
        let its = unit_quad();
        assert_eq!(its.number_of_faces(), 2);
        assert_eq!(its.triangle(1), Some([0, 2, 3]));
        assert_eq!(its.coordinate(1, 2), Some(DVec3::Y));
        assert_eq!(its.coordinate(2, 0), None);
    }

    #[test]
    fn test_second_block_is_offset() {
        let mut its = unit_quad();
        its.add_coordinates(vec![DVec3::Z, DVec3::ONE, DVec3::NEG_X], &[0, 1, 2], &[3])
            .unwrap();
        assert_eq!(its.triangle(2), Some([4, 5, 6]));
        assert_eq!(its.number_of_vertices(), 7);
    }

    #[test]
    fn test_rejects_inconsistent_counts() {
        let mut its = IndexedTriangleSet::new();
        let result = its.add_coordinates(vec![DVec3::ZERO, DVec3::X, DVec3::Y], &[0, 1, 2], &[4]);
        assert!(matches!(result, Err(ModelError::InvalidPolyData(_))));
        let result = its.add_coordinates(vec![DVec3::ZERO, DVec3::X, DVec3::Y], &[0, 1, 5], &[3]);
        assert!(result.is_err());
        assert_eq!(its.number_of_faces(), 0);
    }

    #[test]
    fn test_per_vertex_attributes() {
        let mut its = unit_quad();
        assert!(its.set_normals(vec![DVec3::Z; 3]).is_err());
        its.set_normals(vec![DVec3::Z; 4]).unwrap();
        its.set_uvs(vec![DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::Y]).unwrap();
        assert_eq!(its.vertex_normal(0, 1), Some(DVec3::Z));
        assert_eq!(its.uv_coordinate(1, 1), Some(DVec2::ONE));
        assert_eq!(its.vertex_color(0, 0), None);
    }

    #[test]
    fn test_no_coordinates_after_attributes() {
        let mut its = IndexedTriangleSet::new();
        its.add_coordinates(vec![DVec3::ZERO, DVec3::X, DVec3::Y], &[0, 1, 2], &[3])
            .unwrap();
        its.set_normals(vec![DVec3::Z; 3]).unwrap();

        let result = its.add_coordinates(vec![DVec3::Z, DVec3::ONE, DVec3::NEG_X], &[0, 1, 2], &[3]);
        assert!(matches!(result, Err(ModelError::InvalidPolyData(_))));
        assert_eq!(its.number_of_vertices(), 3);
        assert_eq!(its.number_of_faces(), 1);
        assert!(its.has_normals());
        assert_eq!(its.vertex_normal(0, 2), Some(DVec3::Z));
    }

    #[test]
    fn test_point_and_line_sets() {
        let mut points = PolyPointSet::new();
        points.add(vec![DVec3::ZERO, DVec3::X]);
        points.add(vec![DVec3::Y]);
        assert_eq!(points.number_of_points(), 3);

        let mut lines = PolyLineSet::new();
        assert!(lines.add_polyline(vec![DVec3::ZERO]).is_err());
        assert_eq!(lines.add_polyline(vec![DVec3::ZERO, DVec3::X]).unwrap(), 0);
        assert_eq!(lines.polyline(0).map(<[DVec3]>::len), Some(2));
    }
}
