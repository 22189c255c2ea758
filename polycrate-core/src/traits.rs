//! Core traits for polycrate

use crate::{bounds::BoundingBox, mesh::IndexedMesh, point::Point3f, vertex_set::VertexSet};

/// Trait for objects occupying a region of space
pub trait Bounded {
    /// Get the bounding box of the object, or `None` if it has no positions
    fn bounding_box(&self) -> Option<BoundingBox>;

    /// Get the center point of the bounding box
    fn center(&self) -> Option<Point3f> {
        self.bounding_box().map(|b| b.center())
    }
}

impl Bounded for VertexSet {
    fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.points())
    }
}

impl Bounded for IndexedMesh {
    fn bounding_box(&self) -> Option<BoundingBox> {
        self.vertices.bounding_box()
    }
}

impl Bounded for [Point3f] {
    fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.iter().copied())
    }
}
