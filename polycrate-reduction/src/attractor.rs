//! Coordinate attraction
//!
//! A [`CoordinateAttractor`] holds a fixed set of attractor points. Attracting
//! a floater vertex set assigns every floater vertex to its nearest attractor
//! point (ties go to the lowest attractor index), which splits the floater into
//! one partition per attractor point. The [`SelectionPolicy`] then keeps a single
//! representative per non-empty partition.

use log::{debug, trace};
use nalgebra::distance_squared;
use polycrate_core::{Error, Point3f, Result, VertexSet};
use rayon::prelude::*;

use crate::config::ReductionConfig;
use crate::selection::SelectionPolicy;

/// Offset reported for an attractor point whose partition is empty.
pub const UNASSIGNED: isize = -1;

/// Partitions floater vertices against a fixed attractor set.
#[derive(Debug, Clone)]
pub struct CoordinateAttractor {
    attractor: Vec<Point3f>,
    policy: SelectionPolicy,
    /// Representative floater index per attractor point
    preserved: Vec<Option<usize>>,
    partition_sizes: Vec<usize>,
}

impl CoordinateAttractor {
    pub fn new(attractor: &VertexSet, policy: SelectionPolicy) -> Self {
        let attractor = attractor.to_points();
        let n = attractor.len();
        Self {
            attractor,
            policy,
            preserved: vec![None; n],
            partition_sizes: vec![0; n],
        }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Number of attractor points
    pub fn len(&self) -> usize {
        self.attractor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attractor.is_empty()
    }

    /// Partition `floater` and mark the representative of every non-empty
    /// partition in `indicator`.
    ///
    /// Marks are only ever set, so several attractors can share one indicator.
    /// Returns the number of representatives chosen.
    pub fn attract_into(
        &mut self,
        floater: &VertexSet,
        indicator: &mut [bool],
        config: &ReductionConfig,
    ) -> Result<usize> {
        if indicator.len() != floater.len() {
            return Err(Error::InvalidData(format!(
                "indicator has {} entries for {} floater vertices",
                indicator.len(),
                floater.len()
            )));
        }

        self.preserved.iter_mut().for_each(|p| *p = None);
        self.partition_sizes.iter_mut().for_each(|s| *s = 0);
        if self.attractor.is_empty() {
            return Ok(0);
        }

        let assignments = self.scan(floater, config)?;

        let mut best: Vec<Option<(usize, f32)>> = vec![None; self.attractor.len()];
        for (fi, &(ai, distance)) in assignments.iter().enumerate() {
            self.partition_sizes[ai] += 1;
            let replace = best[ai].map_or(true, |(_, d)| self.policy.prefers(distance, d));
            if replace {
                best[ai] = Some((fi, distance));
            }
        }

        let mut chosen = 0;
        for (slot, b) in self.preserved.iter_mut().zip(&best) {
            *slot = b.map(|(fi, _)| fi);
            if let Some(fi) = *slot {
                indicator[fi] = true;
                chosen += 1;
            }
        }

        debug!(
            "{:?}: {} floater vertices, {} attractor points, {} kept, {} empty partitions",
            self.policy,
            floater.len(),
            self.attractor.len(),
            chosen,
            self.empty_partitions()
        );
        Ok(chosen)
    }

    /// Index of the nearest attractor point for every floater vertex
    pub fn assign_nearest(
        &self,
        floater: &VertexSet,
        config: &ReductionConfig,
    ) -> Result<Vec<usize>> {
        if self.attractor.is_empty() && !floater.is_empty() {
            return Err(Error::InvalidData(
                "cannot assign floater vertices to an empty attractor set".to_string(),
            ));
        }
        let assignments = self.scan(floater, config)?;
        trace!("assigned {} floater vertices to nearest attractor points", assignments.len());
        Ok(assignments.into_iter().map(|(ai, _)| ai).collect())
    }

    /// Representative floater index for attractor point `index`, if any
    pub fn preserved_floater(&self, index: usize) -> Option<usize> {
        self.preserved.get(index).copied().flatten()
    }

    /// Representative floater index for attractor point `index`, or
    /// [`UNASSIGNED`] when its partition is empty
    pub fn preserved_floater_offset(&self, index: usize) -> isize {
        match self.preserved_floater(index) {
            Some(fi) => fi as isize,
            None => UNASSIGNED,
        }
    }

    /// Representative per attractor point, from the last attraction
    pub fn preserved(&self) -> &[Option<usize>] {
        &self.preserved
    }

    /// Number of floater vertices per attractor point, from the last attraction
    pub fn partition_sizes(&self) -> &[usize] {
        &self.partition_sizes
    }

    /// Number of attractor points with no floater vertex assigned
    pub fn empty_partitions(&self) -> usize {
        self.partition_sizes.iter().filter(|&&s| s == 0).count()
    }

    /// Nearest attractor point to `p` and the squared distance to it
    fn nearest(&self, p: &Point3f) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (ai, a) in self.attractor.iter().enumerate() {
            let d = distance_squared(a, p);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((ai, d));
            }
        }
        best
    }

    /// Nearest-point assignment for every floater vertex, in floater order
    fn scan(&self, floater: &VertexSet, config: &ReductionConfig) -> Result<Vec<(usize, f32)>> {
        let assign = |coords: &[f32; 3]| -> Result<(usize, f32)> {
            config.check_cancelled()?;
            self.nearest(&Point3f::from(*coords))
                .ok_or_else(|| Error::Algorithm("attractor set is empty".to_string()))
        };

        let points = floater.as_tuples();
        if config.parallel {
            points.par_iter().map(assign).collect()
        } else {
            points.iter().map(assign).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CancelFlag;

    fn set(points: &[[f32; 3]]) -> VertexSet {
        points.iter().map(|&p| Point3f::from(p)).collect()
    }

    fn line_attractor() -> VertexSet {
        set(&[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]])
    }

    fn line_floater() -> VertexSet {
        set(&[
            [1.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
            [-0.5, 0.0, 0.0],
            [9.0, 0.0, 0.0],
            [6.0, 0.0, 0.0],
        ])
    }

    #[test]
    fn test_nearest_preserving() {
        let mut attractor =
            CoordinateAttractor::new(&line_attractor(), SelectionPolicy::NearestPreserving);
        let floater = line_floater();
        let mut indicator = vec![false; floater.len()];

        let chosen = attractor
            .attract_into(&floater, &mut indicator, &ReductionConfig::new())
            .unwrap();

        assert_eq!(chosen, 2);
        assert_eq!(attractor.partition_sizes(), &[3, 2]);
        assert_eq!(attractor.preserved_floater(0), Some(2));
        assert_eq!(attractor.preserved_floater(1), Some(3));
        assert_eq!(indicator, vec![false, false, true, true, false]);
    }

    #[test]
    fn test_farthest_preserving() {
        let mut attractor =
            CoordinateAttractor::new(&line_attractor(), SelectionPolicy::FarthestPreserving);
        let floater = line_floater();
        let mut indicator = vec![false; floater.len()];

        attractor
            .attract_into(&floater, &mut indicator, &ReductionConfig::new().with_parallel(false))
            .unwrap();

        assert_eq!(attractor.preserved_floater(0), Some(1));
        assert_eq!(attractor.preserved_floater(1), Some(4));
        assert_eq!(indicator, vec![false, true, false, false, true]);
    }

    #[test]
    fn test_marks_accumulate() {
        let floater = line_floater();
        let mut indicator = vec![false; floater.len()];
        let config = ReductionConfig::new();

        CoordinateAttractor::new(&line_attractor(), SelectionPolicy::NearestPreserving)
            .attract_into(&floater, &mut indicator, &config)
            .unwrap();
        CoordinateAttractor::new(&line_attractor(), SelectionPolicy::FarthestPreserving)
            .attract_into(&floater, &mut indicator, &config)
            .unwrap();

        assert_eq!(indicator, vec![false, true, true, true, true]);
    }

    #[test]
    fn test_empty_partition_is_unassigned() {
        let attractor_set = set(&[[0.0, 0.0, 0.0], [100.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let floater = set(&[[0.1, 0.0, 0.0], [0.9, 0.0, 0.0]]);
        let mut attractor =
            CoordinateAttractor::new(&attractor_set, SelectionPolicy::NearestPreserving);
        let mut indicator = vec![false; floater.len()];

        attractor
            .attract_into(&floater, &mut indicator, &ReductionConfig::new())
            .unwrap();

        assert_eq!(attractor.preserved_floater(1), None);
        assert_eq!(attractor.preserved_floater_offset(1), UNASSIGNED);
        assert_eq!(attractor.preserved_floater_offset(0), 0);
        assert_eq!(attractor.preserved_floater_offset(2), 1);
        assert_eq!(attractor.preserved_floater_offset(99), UNASSIGNED);
        assert_eq!(attractor.empty_partitions(), 1);
    }

    #[test]
    fn test_nearest_ties_go_to_lowest_attractor() {
        let attractor = CoordinateAttractor::new(
            &set(&[[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]]),
            SelectionPolicy::NearestPreserving,
        );
        let floater = set(&[[0.0, 0.0, 0.0], [0.0, 5.0, 0.0]]);
        let assigned = attractor.assign_nearest(&floater, &ReductionConfig::new()).unwrap();
        assert_eq!(assigned, vec![0, 0]);
    }

    #[test]
    fn test_assign_nearest() {
        let attractor =
            CoordinateAttractor::new(&line_attractor(), SelectionPolicy::NearestPreserving);
        let assigned = attractor
            .assign_nearest(&line_floater(), &ReductionConfig::new())
            .unwrap();
        assert_eq!(assigned, vec![0, 0, 0, 1, 1]);
    }

    #[test]
    fn test_parallel_and_serial_agree() {
        let attractor_set: VertexSet = (0..7)
            .map(|i| Point3f::new(i as f32, (i * i) as f32 * 0.1, 0.0))
            .collect();
        let floater: VertexSet = (0..200)
            .map(|i| {
                let t = i as f32 * 0.037;
                Point3f::new(t.sin() * 6.0, t.cos() * 3.0, t * 0.01)
            })
            .collect();

        let run = |parallel: bool| {
            let mut a =
                CoordinateAttractor::new(&attractor_set, SelectionPolicy::FarthestPreserving);
            let mut indicator = vec![false; floater.len()];
            let config = ReductionConfig::new().with_parallel(parallel);
            a.attract_into(&floater, &mut indicator, &config).unwrap();
            (a.preserved().to_vec(), indicator)
        };

        assert_eq!(run(true), run(false));
    }

    #[test]
    fn test_indicator_length_mismatch() {
        let mut attractor =
            CoordinateAttractor::new(&line_attractor(), SelectionPolicy::NearestPreserving);
        let mut indicator = vec![false; 2];
        let result =
            attractor.attract_into(&line_floater(), &mut indicator, &ReductionConfig::new());
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_empty_attractor() {
        let empty = VertexSet::new();
        let mut attractor = CoordinateAttractor::new(&empty, SelectionPolicy::NearestPreserving);
        let floater = line_floater();
        let mut indicator = vec![false; floater.len()];
        assert_eq!(
            attractor
                .attract_into(&floater, &mut indicator, &ReductionConfig::new())
                .unwrap(),
            0
        );
        assert!(attractor.assign_nearest(&floater, &ReductionConfig::new()).is_err());
    }

    #[test]
    fn test_cancelled_scan() {
        let flag = CancelFlag::new();
        flag.cancel();
        let config = ReductionConfig::new().with_cancel_flag(flag);

        let mut attractor =
            CoordinateAttractor::new(&line_attractor(), SelectionPolicy::NearestPreserving);
        let floater = line_floater();
        let mut indicator = vec![false; floater.len()];
        let result = attractor.attract_into(&floater, &mut indicator, &config);
        assert_eq!(result, Err(Error::Cancelled));
        assert!(indicator.iter().all(|&m| !m));
    }
}
