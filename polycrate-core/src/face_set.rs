//! Polygon face sets

use serde::{Deserialize, Serialize};

use crate::entity_set::{Correspondence, GrowthPolicy, RaggedSet};
use crate::{Error, Result};

/// Value that terminates a polygon in a streamed face-index sequence.
pub const FACE_SENTINEL: i64 = -1;

/// A set of polygons, each listing its vertex indices in winding order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceSet {
    runs: RaggedSet<usize>,
}

impl FaceSet {
    /// Create a new empty face set
    pub fn new() -> Self {
        Self {
            runs: RaggedSet::new(),
        }
    }

    /// Create a new empty face set growing under `growth`
    pub fn with_policy(growth: GrowthPolicy) -> Self {
        Self {
            runs: RaggedSet::with_policy(growth),
        }
    }

    /// Build a face set from polygon index lists
    pub fn from_polygons<I, R>(polygons: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[usize]>,
    {
        Self {
            runs: RaggedSet::from_runs(polygons),
        }
    }

    /// Get the number of closed faces
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Append a complete polygon, returning its index
    pub fn push_face(&mut self, polygon: &[usize]) -> usize {
        self.runs.push_run(polygon)
    }

    /// Feed one value of a streamed face-index sequence.
    ///
    /// Non-negative values extend the open polygon; [`FACE_SENTINEL`] closes it
    /// and returns the index of the closed face. A sentinel with no open polygon
    /// is ignored.
    pub fn add_face_coord(&mut self, value: i64) -> Result<Option<usize>> {
        if value == FACE_SENTINEL {
            return Ok(self.finish_face());
        }
        let index = usize::try_from(value).map_err(|_| {
            Error::InvalidData(format!("face index {value} is negative and not the sentinel"))
        })?;
        self.runs.push_value(index);
        Ok(None)
    }

    /// Close a trailing polygon that was never terminated by a sentinel
    pub fn finish_face(&mut self) -> Option<usize> {
        if self.runs.has_open_run() {
            Some(self.runs.close_run())
        } else {
            None
        }
    }

    /// Whether a streamed polygon is still open
    pub fn has_open_face(&self) -> bool {
        self.runs.has_open_run()
    }

    /// Vertex indices of the face at `index`
    pub fn face(&self, index: usize) -> Option<&[usize]> {
        self.runs.run(index)
    }

    /// Number of corners of the face at `index`
    pub fn degree(&self, index: usize) -> Option<usize> {
        self.runs.run_len(index)
    }

    /// Total number of polygon corners across all faces
    pub fn corner_count(&self) -> usize {
        self.runs.value_count()
    }

    /// Iterate over faces in index order
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.runs.iter()
    }

    /// Largest vertex index referenced by any face
    pub fn max_index(&self) -> Option<usize> {
        self.runs.as_flat().iter().copied().max()
    }

    /// Check that every referenced vertex index is below `vertex_count`
    pub fn validate(&self, vertex_count: usize) -> Result<()> {
        for (fi, face) in self.iter().enumerate() {
            if let Some(&bad) = face.iter().find(|&&vi| vi >= vertex_count) {
                return Err(Error::InvalidData(format!(
                    "face {fi} references vertex {bad}, but only {vertex_count} vertices exist"
                )));
            }
        }
        Ok(())
    }

    pub fn correspondence(&self) -> Correspondence {
        self.runs.correspondence()
    }

    pub fn set_correspondence(&mut self, correspondence: Correspondence) {
        self.runs.set_correspondence(correspondence);
    }

    pub fn growth_policy(&self) -> GrowthPolicy {
        self.runs.growth_policy()
    }

    pub fn clear(&mut self) {
        self.runs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streamed_faces() {
        let mut faces = FaceSet::new();
        for v in [0, 1, 2, -1, 2, 1, 3, 4] {
            faces.add_face_coord(v).unwrap();
        }
        assert_eq!(faces.len(), 1);
        assert!(faces.has_open_face());
        assert_eq!(faces.add_face_coord(-1).unwrap(), Some(1));
        assert_eq!(faces.face(1), Some(&[2, 1, 3, 4][..]));
        assert_eq!(faces.degree(0), Some(3));
        assert_eq!(faces.corner_count(), 7);
    }

    #[test]
    fn test_repeated_sentinel_is_ignored() {
        let mut faces = FaceSet::new();
        assert_eq!(faces.add_face_coord(-1).unwrap(), None);
        faces.add_face_coord(0).unwrap();
        faces.add_face_coord(-1).unwrap();
        assert_eq!(faces.add_face_coord(-1).unwrap(), None);
        assert_eq!(faces.len(), 1);
    }

    #[test]
    fn test_other_negative_values_are_rejected() {
        let mut faces = FaceSet::new();
        assert!(matches!(faces.add_face_coord(-2), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_finish_trailing_face() {
        let mut faces = FaceSet::new();
        faces.add_face_coord(3).unwrap();
        faces.add_face_coord(4).unwrap();
        faces.add_face_coord(5).unwrap();
        assert_eq!(faces.finish_face(), Some(0));
        assert_eq!(faces.finish_face(), None);
        assert_eq!(faces.max_index(), Some(5));
    }

    #[test]
    fn test_deserialize_rejects_missing_offsets() {
        let faces = FaceSet::from_polygons([[0usize, 1, 2]]);
        let json = serde_json::to_string(&faces).unwrap();
        assert_eq!(serde_json::from_str::<FaceSet>(&json).unwrap(), faces);

        let broken = json.replace(r#""offsets":[0,3]"#, r#""offsets":[]"#);
        assert_ne!(broken, json);
        assert!(serde_json::from_str::<FaceSet>(&broken).is_err());
    }

    #[test]
    fn test_validate() {
        let faces = FaceSet::from_polygons([[0usize, 1, 2], [1, 2, 3]]);
        assert!(faces.validate(4).is_ok());
        assert!(faces.validate(3).is_err());
    }
}
