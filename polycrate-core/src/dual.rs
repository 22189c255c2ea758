//! Topological dual of a polygonal mesh
//!
//! The dual swaps the roles of vertices and faces:
//! - dual vertex `f` sits at the *sum* of the positions of face `f`'s corners;
//! - dual face `v` lists the faces around original vertex `v`, ordered by
//!   walking from each face to the next one across a shared edge.
//!
//! So `dual.vertex_count() == face_count()` and `dual.face_count() == vertex_count()`.

use log::trace;

use crate::entity_set::Correspondence;
use crate::face_set::FaceSet;
use crate::mesh::IndexedMesh;
use crate::point::{Point3f, Vector3f};
use crate::vertex_set::VertexSet;
use crate::Result;

/// A face incident to a vertex, with the corners just before and after it.
#[derive(Debug, Clone, Copy)]
struct Corner {
    face: usize,
    prev: usize,
    next: usize,
}

impl IndexedMesh {
    /// Compute the dual mesh, leaving `self` untouched
    pub fn dual(&self) -> Result<IndexedMesh> {
        self.validate()?;

        let mut vertices =
            VertexSet::with_capacity_and_policy(self.face_count(), self.vertices.growth_policy());
        for face in self.faces.iter() {
            let sum = face
                .iter()
                .filter_map(|&vi| self.vertices.point(vi))
                .fold(Vector3f::zeros(), |acc, p| acc + p.coords);
            vertices.push(Point3f::from(sum));
        }
        vertices.set_correspondence(Correspondence::Standalone);

        let corners = incident_corners(&self.faces, self.vertex_count());
        let mut faces = FaceSet::with_policy(self.faces.growth_policy());
        let mut ring = Vec::new();
        for around in &corners {
            walk_ring(around, &mut ring);
            faces.push_face(&ring);
        }
        faces.set_correspondence(self.faces.correspondence());

        trace!(
            "dual: {} vertices / {} faces -> {} vertices / {} faces",
            self.vertex_count(),
            self.face_count(),
            vertices.len(),
            faces.len()
        );

        Ok(IndexedMesh::from_parts(vertices, faces))
    }

    /// Replace this mesh with its dual
    pub fn make_dual(&mut self) -> Result<()> {
        *self = self.dual()?;
        Ok(())
    }
}

/// For every vertex, the faces that touch it, in face-index order
fn incident_corners(faces: &FaceSet, vertex_count: usize) -> Vec<Vec<Corner>> {
    let mut corners: Vec<Vec<Corner>> = vec![Vec::new(); vertex_count];
    for (fi, face) in faces.iter().enumerate() {
        let k = face.len();
        for (i, &v) in face.iter().enumerate() {
            // A vertex repeated within one polygon is only counted at its first corner.
            if corners[v].last().is_some_and(|c| c.face == fi) {
                continue;
            }
            corners[v].push(Corner {
                face: fi,
                prev: face[(i + k - 1) % k],
                next: face[(i + 1) % k],
            });
        }
    }
    corners
}

/// Order the faces around one vertex into `ring`.
///
/// Following the winding, the face after `f` is the one whose outgoing edge
/// from the vertex is `f`'s incoming edge. A fan with a boundary starts at the
/// face that has no predecessor; separate fans are concatenated.
fn walk_ring(around: &[Corner], ring: &mut Vec<usize>) {
    ring.clear();
    let mut visited = vec![false; around.len()];
    let has_predecessor: Vec<bool> = (0..around.len())
        .map(|i| {
            around
                .iter()
                .enumerate()
                .any(|(j, c)| j != i && c.prev == around[i].next)
        })
        .collect();

    while ring.len() < around.len() {
        let unvisited = || (0..around.len()).filter(|&i| !visited[i]);
        let Some(start) = unvisited()
            .find(|&i| !has_predecessor[i])
            .or_else(|| unvisited().next())
        else {
            break;
        };

        let mut current = start;
        loop {
            visited[current] = true;
            ring.push(around[current].face);
            match successor(around, &visited, current) {
                Some(next) => current = next,
                None => break,
            }
        }
    }
}

fn successor(around: &[Corner], visited: &[bool], current: usize) -> Option<usize> {
    let shared = around[current].prev;
    let candidates = || (0..around.len()).filter(|&i| !visited[i]);

    candidates()
        .find(|&i| around[i].next == shared)
        // Inconsistently wound neighbours still share the edge, just reversed.
        .or_else(|| candidates().find(|&i| around[i].prev == shared))
}
