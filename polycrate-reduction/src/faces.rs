//! Face reconstruction
//!
//! Every attractor polygon is rebuilt as a fan: its dual vertex acts as the
//! polygon's center and is connected to each boundary edge. All three corners
//! of a fan triangle are floater indices chosen by the attraction passes:
//! boundary corners through the nearest-preserving pass over attractor
//! vertices, the center through the farthest-preserving pass over dual vertices.

use std::iter::FusedIterator;

use polycrate_core::FaceSet;

use crate::attractor::{CoordinateAttractor, UNASSIGNED};

/// One triangle of a polygon fan, in floater indices.
///
/// A corner is `None` when the partition it was drawn from is empty; such a
/// triangle is invalid and is meant to be skipped by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FanTriangle {
    corners: [Option<usize>; 3],
}

impl FanTriangle {
    pub fn new(corners: [Option<usize>; 3]) -> Self {
        Self { corners }
    }

    pub fn corners(&self) -> [Option<usize>; 3] {
        self.corners
    }

    /// All three corners resolved to a floater vertex
    pub fn is_valid(&self) -> bool {
        self.corners.iter().all(Option::is_some)
    }

    /// Floater indices of the corners, if the triangle is valid
    pub fn indices(&self) -> Option<[usize; 3]> {
        match self.corners {
            [Some(a), Some(b), Some(c)] => Some([a, b, c]),
            _ => None,
        }
    }

    /// Corners as signed offsets, with [`UNASSIGNED`] for empty partitions
    pub fn offsets(&self) -> [isize; 3] {
        self.corners.map(|c| c.map_or(UNASSIGNED, |fi| fi as isize))
    }
}

/// Fan triangles for a single attractor polygon.
#[derive(Debug, Clone, Copy)]
pub struct FaceGenerator<'a> {
    face_index: usize,
    polygon: &'a [usize],
    nearest: &'a CoordinateAttractor,
    farthest: &'a CoordinateAttractor,
}

impl<'a> FaceGenerator<'a> {
    /// Index of the attractor polygon, which is also its dual vertex index
    pub fn face_index(&self) -> usize {
        self.face_index
    }

    pub fn dual_vertex(&self) -> usize {
        self.face_index
    }

    /// Attractor vertex indices of the polygon, in winding order
    pub fn polygon(&self) -> &'a [usize] {
        self.polygon
    }

    /// Number of corners, which is also the number of fan triangles
    pub fn degree(&self) -> usize {
        self.polygon.len()
    }

    /// The `i`th fan triangle: edge `(polygon[i], polygon[i + 1])` plus the center
    pub fn triangle(&self, i: usize) -> Option<FanTriangle> {
        let k = self.polygon.len();
        if i >= k {
            return None;
        }
        Some(FanTriangle::new([
            self.nearest.preserved_floater(self.polygon[i]),
            self.nearest.preserved_floater(self.polygon[(i + 1) % k]),
            self.farthest.preserved_floater(self.face_index),
        ]))
    }

    /// All fan triangles of the polygon, valid or not
    pub fn triangles(&self) -> impl Iterator<Item = FanTriangle> + 'a {
        let generator = *self;
        (0..generator.degree()).filter_map(move |i| generator.triangle(i))
    }

    /// Only the valid fan triangles, as floater indices
    pub fn valid_triangles(&self) -> impl Iterator<Item = [usize; 3]> + 'a {
        self.triangles().filter_map(|t| t.indices())
    }
}

/// Lazy sequence of [`FaceGenerator`]s, one per attractor polygon, in face order.
///
/// The sequence is consumed as it is iterated; ask the reduction for a new one
/// to walk the faces again.
#[derive(Debug, Clone)]
pub struct FaceGenerators<'a> {
    faces: &'a FaceSet,
    next: usize,
    nearest: &'a CoordinateAttractor,
    farthest: &'a CoordinateAttractor,
}

impl<'a> FaceGenerators<'a> {
    pub(crate) fn new(
        faces: &'a FaceSet,
        nearest: &'a CoordinateAttractor,
        farthest: &'a CoordinateAttractor,
    ) -> Self {
        Self {
            faces,
            next: 0,
            nearest,
            farthest,
        }
    }
}

impl<'a> Iterator for FaceGenerators<'a> {
    type Item = FaceGenerator<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let polygon = self.faces.face(self.next)?;
        let generator = FaceGenerator {
            face_index: self.next,
            polygon,
            nearest: self.nearest,
            farthest: self.farthest,
        };
        self.next += 1;
        Some(generator)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.faces.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FaceGenerators<'_> {}

impl FusedIterator for FaceGenerators<'_> {}
