//! Representative selection within a partition

use serde::{Deserialize, Serialize};

/// Strategy for choosing the one floater vertex that represents a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// Keep the member closest to its attractor point.
    NearestPreserving,
    /// Keep the member farthest from its attractor point.
    FarthestPreserving,
}

impl SelectionPolicy {
    /// Whether a member at distance `candidate` replaces the current
    /// representative at distance `incumbent`.
    ///
    /// The comparison is strict, so on ties the first member encountered wins.
    #[inline]
    pub fn prefers(self, candidate: f32, incumbent: f32) -> bool {
        match self {
            SelectionPolicy::NearestPreserving => candidate < incumbent,
            SelectionPolicy::FarthestPreserving => candidate > incumbent,
        }
    }

    /// Pick the representative among `(member, distance)` pairs, in order.
    pub fn select<I>(self, members: I) -> Option<usize>
    where
        I: IntoIterator<Item = (usize, f32)>,
    {
        members
            .into_iter()
            .fold(None, |best: Option<(usize, f32)>, (member, distance)| match best {
                Some((_, d)) if !self.prefers(distance, d) => best,
                _ => Some((member, distance)),
            })
            .map(|(member, _)| member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers() {
        assert!(SelectionPolicy::NearestPreserving.prefers(1.0, 2.0));
        assert!(!SelectionPolicy::NearestPreserving.prefers(2.0, 1.0));
        assert!(SelectionPolicy::FarthestPreserving.prefers(2.0, 1.0));
        assert!(!SelectionPolicy::FarthestPreserving.prefers(1.0, 2.0));
    }

    #[test]
    fn test_ties_keep_first() {
        assert!(!SelectionPolicy::NearestPreserving.prefers(1.0, 1.0));
        assert!(!SelectionPolicy::FarthestPreserving.prefers(1.0, 1.0));

        let members = [(4, 1.0), (7, 1.0), (9, 3.0), (2, 3.0)];
        assert_eq!(SelectionPolicy::NearestPreserving.select(members), Some(4));
        assert_eq!(SelectionPolicy::FarthestPreserving.select(members), Some(9));
    }

    #[test]
    fn test_empty_partition_has_no_representative() {
        assert_eq!(SelectionPolicy::NearestPreserving.select(std::iter::empty()), None);
    }
}
