//! Axis-aligned bounding boxes

use serde::{Deserialize, Serialize};

use crate::point::{Point3f, Vector3f};

/// Axis-aligned bounding box over a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3f,
    pub max: Point3f,
}

impl BoundingBox {
    pub fn new(min: Point3f, max: Point3f) -> Self {
        Self { min, max }
    }

    /// Tightest box around `points`, or `None` when there are no points
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3f>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = first;
        let mut max = first;

        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);

            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some(Self { min, max })
    }

    /// Per-axis extent (`max - min`)
    pub fn dimensions(&self) -> Vector3f {
        self.max - self.min
    }

    /// Extent along a single axis (0 = x, 1 = y, 2 = z)
    pub fn extent(&self, axis: usize) -> f32 {
        self.max[axis] - self.min[axis]
    }

    pub fn center(&self) -> Point3f {
        nalgebra::center(&self.min, &self.max)
    }

    /// Length of the box diagonal
    pub fn diagonal(&self) -> f32 {
        self.dimensions().norm()
    }

    /// Whether `p` lies inside the box, widened by `epsilon` on every side
    pub fn contains(&self, p: &Point3f, epsilon: f32) -> bool {
        (0..3).all(|axis| {
            p[axis] >= self.min[axis] - epsilon && p[axis] <= self.max[axis] + epsilon
        })
    }
}
