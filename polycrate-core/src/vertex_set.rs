//! Vertex position sets

use serde::{Deserialize, Serialize};

use crate::entity_set::{Correspondence, GrowthPolicy, TupleSet};
use crate::point::Point3f;

/// A set of 3D vertex positions stored as a flat `f32` buffer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VertexSet {
    coords: TupleSet<f32, 3>,
}

impl VertexSet {
    /// Create a new empty vertex set
    pub fn new() -> Self {
        Self {
            coords: TupleSet::new(),
        }
    }

    /// Create a new empty vertex set growing under `growth`
    pub fn with_policy(growth: GrowthPolicy) -> Self {
        Self {
            coords: TupleSet::with_policy(growth),
        }
    }

    /// Create a new empty vertex set with room for `count` positions
    pub fn with_capacity(count: usize) -> Self {
        Self {
            coords: TupleSet::with_capacity(count),
        }
    }

    /// Create a new empty vertex set with room for `count` positions, growing under `growth`
    pub fn with_capacity_and_policy(count: usize, growth: GrowthPolicy) -> Self {
        Self {
            coords: TupleSet::with_capacity_and_policy(count, growth),
        }
    }

    /// Create a vertex set from points
    pub fn from_points(points: &[Point3f]) -> Self {
        let mut set = Self::with_capacity(points.len());
        for p in points {
            set.push(*p);
        }
        set
    }

    /// Get the number of vertices
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Append a vertex from raw coordinates, returning its index
    pub fn add_vertex(&mut self, x: f32, y: f32, z: f32) -> usize {
        self.coords.push([x, y, z])
    }

    /// Append a vertex, returning its index
    pub fn push(&mut self, point: Point3f) -> usize {
        self.coords.push([point.x, point.y, point.z])
    }

    /// Position of the vertex at `index`
    pub fn point(&self, index: usize) -> Option<Point3f> {
        self.coords.get(index).map(|&[x, y, z]| Point3f::new(x, y, z))
    }

    /// Overwrite the position of the vertex at `index`
    pub fn set_point(&mut self, index: usize, point: Point3f) -> bool {
        match self.coords.get_mut(index) {
            Some(slot) => {
                *slot = [point.x, point.y, point.z];
                true
            }
            None => false,
        }
    }

    /// Iterate over positions in index order
    pub fn points(&self) -> impl Iterator<Item = Point3f> + '_ {
        self.coords.iter().map(|&[x, y, z]| Point3f::new(x, y, z))
    }

    /// Collect positions into a vector
    pub fn to_points(&self) -> Vec<Point3f> {
        self.points().collect()
    }

    /// Apply `f` to every position in place
    pub fn map_in_place<F>(&mut self, mut f: F)
    where
        F: FnMut(Point3f) -> Point3f,
    {
        for slot in self.coords.iter_mut() {
            let p = f(Point3f::new(slot[0], slot[1], slot[2]));
            *slot = [p.x, p.y, p.z];
        }
    }

    /// View positions as `[x, y, z]` triples without copying
    pub fn as_tuples(&self) -> &[[f32; 3]] {
        bytemuck::cast_slice(self.coords.as_flat())
    }

    /// The underlying flat coordinate buffer
    pub fn as_flat(&self) -> &[f32] {
        self.coords.as_flat()
    }

    pub fn correspondence(&self) -> Correspondence {
        self.coords.correspondence()
    }

    pub fn set_correspondence(&mut self, correspondence: Correspondence) {
        self.coords.set_correspondence(correspondence);
    }

    pub fn growth_policy(&self) -> GrowthPolicy {
        self.coords.growth_policy()
    }

    pub fn clear(&mut self) {
        self.coords.clear();
    }
}

impl FromIterator<Point3f> for VertexSet {
    fn from_iter<I: IntoIterator<Item = Point3f>>(iter: I) -> Self {
        let mut set = Self::new();
        for p in iter {
            set.push(p);
        }
        set
    }
}

impl Extend<Point3f> for VertexSet {
    fn extend<I: IntoIterator<Item = Point3f>>(&mut self, iter: I) {
        for p in iter {
            self.push(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_read_back() {
        let mut set = VertexSet::new();
        assert_eq!(set.add_vertex(1.0, 2.0, 3.0), 0);
        assert_eq!(set.push(Point3f::new(4.0, 5.0, 6.0)), 1);
        assert_eq!(set.len(), 2);
        assert_eq!(set.point(1), Some(Point3f::new(4.0, 5.0, 6.0)));
        assert_eq!(set.point(2), None);
        assert_eq!(set.as_tuples(), &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_set_point_and_map() {
        let mut set =
            VertexSet::from_points(&[Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 1.0, 1.0)]);
        assert!(set.set_point(0, Point3f::new(2.0, 2.0, 2.0)));
        assert!(!set.set_point(5, Point3f::origin()));

        set.map_in_place(|p| Point3f::new(p.x * 2.0, p.y, p.z));
        assert_eq!(set.to_points(), vec![Point3f::new(4.0, 2.0, 2.0), Point3f::new(2.0, 1.0, 1.0)]);
    }

    #[test]
    fn test_deserialize_rejects_partial_tuple() {
        let set = VertexSet::from_points(&[Point3f::new(1.0, 2.0, 3.0)]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(serde_json::from_str::<VertexSet>(&json).unwrap(), set);

        let partial = json.replace("[1.0,2.0,3.0]", "[1.0,2.0,3.0,4.0]");
        assert!(serde_json::from_str::<VertexSet>(&partial).is_err());
    }

    #[test]
    fn test_capacity_constructor_keeps_policy() {
        let policy = GrowthPolicy::new(32, 4);
        let mut set = VertexSet::with_capacity_and_policy(2, policy);
        set.add_vertex(0.0, 0.0, 0.0);
        assert_eq!(set.growth_policy(), policy);
        assert_eq!(VertexSet::with_capacity(2).growth_policy(), GrowthPolicy::default());
    }

    #[test]
    fn test_standalone_by_default() {
        let set: VertexSet = vec![Point3f::origin()].into_iter().collect();
        assert_eq!(set.correspondence(), Correspondence::Standalone);
    }
}
