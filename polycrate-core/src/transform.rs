//! Bounding-box normalization
//!
//! An [`AxisRemap`] is the per-axis affine map taking one bounding box onto
//! another: `p' = (p - source.min) * factor + target.min`, where each axis
//! factor is `target extent / source extent`.

use log::warn;
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;
use crate::point::{Point3f, Vector3f};
use crate::traits::Bounded;
use crate::vertex_set::VertexSet;
use crate::{Error, Result};

/// What to do when a source box has zero extent on some axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DegenerateAxisPolicy {
    /// Use a scale factor of 1 on that axis; the axis is still translated.
    #[default]
    Identity,
    /// Fail with [`Error::DegenerateBounds`].
    Reject,
}

/// Per-axis affine remap between two bounding boxes.
///
/// The source minimum is subtracted before scaling, so boxes far from the
/// origin keep their precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRemap {
    source_min: Point3f,
    factors: Vector3f,
    target_min: Point3f,
}

impl AxisRemap {
    /// Create an identity remap
    pub fn identity() -> Self {
        Self {
            source_min: Point3f::origin(),
            factors: Vector3f::new(1.0, 1.0, 1.0),
            target_min: Point3f::origin(),
        }
    }

    /// Build the remap taking `source` onto `target`
    pub fn between(
        source: &BoundingBox,
        target: &BoundingBox,
        policy: DegenerateAxisPolicy,
    ) -> Result<Self> {
        let mut factors = Vector3f::new(1.0, 1.0, 1.0);
        for axis in 0..3 {
            let source_extent = source.extent(axis);
            if source_extent > 0.0 && source_extent.is_finite() {
                factors[axis] = target.extent(axis) / source_extent;
                continue;
            }
            match policy {
                DegenerateAxisPolicy::Identity => {
                    warn!("source bounding box has zero extent on axis {axis}; using unit scale");
                }
                DegenerateAxisPolicy::Reject => return Err(Error::DegenerateBounds { axis }),
            }
        }

        Ok(Self {
            source_min: source.min,
            factors,
            target_min: target.min,
        })
    }

    /// Per-axis scale factors
    pub fn scale_factors(&self) -> Vector3f {
        self.factors
    }

    /// The remap as a homogeneous matrix (translate, scale, translate)
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.target_min.coords)
            * Matrix4::new_nonuniform_scaling(&self.factors)
            * Matrix4::new_translation(&-self.source_min.coords)
    }

    /// Apply the remap to a point
    pub fn transform_point(&self, point: &Point3f) -> Point3f {
        let scaled = (point - self.source_min).component_mul(&self.factors);
        Point3f::from(scaled + self.target_min.coords)
    }

    /// Apply the remap to every position of `vertices`
    pub fn apply_to(&self, vertices: &mut VertexSet) {
        vertices.map_in_place(|p| self.transform_point(&p));
    }
}

impl Default for AxisRemap {
    fn default() -> Self {
        Self::identity()
    }
}

/// Remap `vertices` in place so that their bounding box becomes `target`.
///
/// Returns the remap that was applied; an empty vertex set is left untouched
/// and yields the identity.
pub fn scale_to(
    vertices: &mut VertexSet,
    target: &BoundingBox,
    policy: DegenerateAxisPolicy,
) -> Result<AxisRemap> {
    let Some(source) = vertices.bounding_box() else {
        return Ok(AxisRemap::identity());
    };
    let remap = AxisRemap::between(&source, target, policy)?;
    remap.apply_to(vertices);
    Ok(remap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_between_maps_corners() {
        let source = unit_box();
        let target = BoundingBox::new(Point3f::new(-2.0, 10.0, 3.0), Point3f::new(2.0, 12.0, 3.5));
        let remap = AxisRemap::between(&source, &target, DegenerateAxisPolicy::Reject).unwrap();

        assert_relative_eq!(remap.transform_point(&source.min), target.min, epsilon = 1e-5);
        assert_relative_eq!(remap.transform_point(&source.max), target.max, epsilon = 1e-5);
        assert_relative_eq!(remap.scale_factors(), Vector3f::new(4.0, 2.0, 0.5), epsilon = 1e-6);
        assert_relative_eq!(
            remap.transform_point(&Point3f::new(0.5, 0.5, 0.5)),
            Point3f::new(0.0, 11.0, 3.25),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_degenerate_axis_identity() {
        let source = BoundingBox::new(Point3f::new(0.0, 5.0, 0.0), Point3f::new(1.0, 5.0, 1.0));
        let target = BoundingBox::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(2.0, 2.0, 2.0));
        let remap = AxisRemap::between(&source, &target, DegenerateAxisPolicy::Identity).unwrap();

        assert_relative_eq!(remap.scale_factors(), Vector3f::new(2.0, 1.0, 2.0), epsilon = 1e-6);
        let p = remap.transform_point(&Point3f::new(1.0, 5.0, 0.0));
        assert!(p.iter().all(|c| c.is_finite()));
        assert_relative_eq!(p, Point3f::new(2.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_axis_reject() {
        let source = BoundingBox::new(Point3f::new(0.0, 0.0, 1.0), Point3f::new(1.0, 1.0, 1.0));
        let result = AxisRemap::between(&source, &unit_box(), DegenerateAxisPolicy::Reject);
        assert_eq!(result, Err(Error::DegenerateBounds { axis: 2 }));
    }

    #[test]
    fn test_scale_to_aligns_vertex_set() {
        let mut vertices = VertexSet::new();
        vertices.add_vertex(-1.0, -1.0, -1.0);
        vertices.add_vertex(1.0, 3.0, 0.0);
        vertices.add_vertex(0.0, 0.0, 1.0);

        let target =
            BoundingBox::new(Point3f::new(10.0, 20.0, 30.0), Point3f::new(11.0, 22.0, 33.0));
        scale_to(&mut vertices, &target, DegenerateAxisPolicy::Identity).unwrap();

        let bbox = vertices.bounding_box().unwrap();
        assert_relative_eq!(bbox.min, target.min, epsilon = 1e-4);
        assert_relative_eq!(bbox.max, target.max, epsilon = 1e-4);
    }

    #[test]
    fn test_scale_to_far_from_origin_keeps_precision() {
        let mut vertices = VertexSet::new();
        vertices.add_vertex(1.0e6, 1.0e6, 1.0e6);
        vertices.add_vertex(1.0e6 + 1.0, 1.0e6 + 1.0, 1.0e6 + 1.0);
        vertices.add_vertex(1.0e6 + 0.5, 1.0e6 + 0.25, 1.0e6 + 0.75);

        let target = BoundingBox::new(Point3f::origin(), Point3f::new(1.0e-3, 1.0e-3, 1.0e-3));
        scale_to(&mut vertices, &target, DegenerateAxisPolicy::Reject).unwrap();

        let bbox = vertices.bounding_box().unwrap();
        for axis in 0..3 {
            assert!(bbox.min[axis].abs() < 1e-9);
            assert!((bbox.max[axis] - 1.0e-3).abs() < 1e-6);
        }
        assert_relative_eq!(
            vertices.point(2).unwrap(),
            Point3f::new(0.5e-3, 0.25e-3, 0.75e-3),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_matrix_matches_transform_point() {
        let source = BoundingBox::new(Point3f::new(1.0, 2.0, 3.0), Point3f::new(3.0, 6.0, 4.0));
        let target = unit_box();
        let remap = AxisRemap::between(&source, &target, DegenerateAxisPolicy::Reject).unwrap();
        let p = Point3f::new(2.0, 3.0, 3.5);
        assert_relative_eq!(
            remap.matrix().transform_point(&p),
            remap.transform_point(&p),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_scale_to_empty_is_identity() {
        let mut vertices = VertexSet::new();
        let remap = scale_to(&mut vertices, &unit_box(), DegenerateAxisPolicy::Reject).unwrap();
        assert_eq!(remap, AxisRemap::identity());
    }
}
