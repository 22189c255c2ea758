//! Mesh data structures and functionality

use serde::{Deserialize, Serialize};

use crate::entity_set::GrowthPolicy;
use crate::face_set::FaceSet;
use crate::point::Point3f;
use crate::vertex_set::VertexSet;
use crate::Result;

/// A polygonal mesh: one vertex set and one face set indexing into it.
///
/// Faces may have any number of corners. Cloning yields an independent copy of
/// both sets, correspondence tags included.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndexedMesh {
    pub vertices: VertexSet,
    pub faces: FaceSet,
}

impl IndexedMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty mesh whose sets grow under `growth`
    pub fn with_policy(growth: GrowthPolicy) -> Self {
        Self {
            vertices: VertexSet::with_policy(growth),
            faces: FaceSet::with_policy(growth),
        }
    }

    /// Create a mesh from existing vertex and face sets
    pub fn from_parts(vertices: VertexSet, faces: FaceSet) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from positions and polygon index lists
    pub fn from_polygons<I, R>(points: &[Point3f], polygons: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[usize]>,
    {
        let mesh = Self {
            vertices: VertexSet::from_points(points),
            faces: FaceSet::from_polygons(polygons),
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Create a mesh from positions and triangles
    pub fn from_triangles(points: &[Point3f], triangles: &[[usize; 3]]) -> Result<Self> {
        Self::from_polygons(points, triangles)
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of closed faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Append a vertex from raw coordinates, returning its index
    pub fn add_vertex(&mut self, x: f32, y: f32, z: f32) -> usize {
        self.vertices.add_vertex(x, y, z)
    }

    /// Feed one value of a streamed face-index sequence (see [`FaceSet::add_face_coord`])
    pub fn add_face_coord(&mut self, value: i64) -> Result<Option<usize>> {
        self.faces.add_face_coord(value)
    }

    /// Close a trailing polygon that was never terminated
    pub fn finish_face(&mut self) -> Option<usize> {
        self.faces.finish_face()
    }

    /// Append a complete polygon, returning its index
    pub fn add_face(&mut self, polygon: &[usize]) -> usize {
        self.faces.push_face(polygon)
    }

    /// Check that every face references an existing vertex
    pub fn validate(&self) -> Result<()> {
        self.faces.validate(self.vertices.len())
    }

    /// Number of distinct undirected edges
    pub fn edge_count(&self) -> usize {
        let mut edges: Vec<(usize, usize)> = self
            .faces
            .iter()
            .flat_map(|face| {
                let k = face.len();
                (0..k).map(move |i| {
                    let (a, b) = (face[i], face[(i + 1) % k]);
                    (a.min(b), a.max(b))
                })
            })
            .filter(|(a, b)| a != b)
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges.len()
    }

    /// Clear the mesh
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
    }
}

/// A triangle mesh with vertices and faces
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }
}

impl From<&TriangleMesh> for IndexedMesh {
    fn from(mesh: &TriangleMesh) -> Self {
        Self {
            vertices: VertexSet::from_points(&mesh.vertices),
            faces: FaceSet::from_polygons(&mesh.faces),
        }
    }
}
