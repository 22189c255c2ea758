//! Indexed entity sets
//!
//! Two growable containers back every mesh in polycrate:
//! - [`TupleSet`]: a flat buffer logically divided into fixed-size tuples
//!   (e.g. three floats per vertex position).
//! - [`RaggedSet`]: a flat buffer divided into variable-length runs, with an
//!   explicit offsets array giving O(1) access to the Nth run
//!   (e.g. the vertex-index list of the Nth polygon).
//!
//! Both grow through a [`GrowthPolicy`]: capacity doubles until a threshold and
//! then grows by a fixed increment, which keeps appends amortized O(1) on meshes
//! with hundreds of thousands of entries without overshooting memory on the
//! largest ones.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const MIN_CAPACITY: usize = 8;

/// Capacity growth discipline shared by all entity sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthPolicy {
    /// Capacity doubles while it is below this many elements.
    pub doubling_limit: usize,
    /// Past the doubling limit, capacity grows by this many elements at a time.
    pub increment: usize,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            doubling_limit: 1 << 20,
            increment: 1 << 18,
        }
    }
}

impl GrowthPolicy {
    pub fn new(doubling_limit: usize, increment: usize) -> Self {
        Self {
            doubling_limit,
            increment: increment.max(1),
        }
    }

    /// Smallest capacity reachable from `current` under this policy that holds
    /// at least `required` elements.
    pub fn next_capacity(&self, current: usize, required: usize) -> usize {
        let mut capacity = current.max(MIN_CAPACITY);
        while capacity < required {
            capacity = if capacity < self.doubling_limit {
                capacity.saturating_mul(2)
            } else {
                capacity.saturating_add(self.increment.max(1))
            };
        }
        capacity
    }

    /// Make room for `additional` more elements in `buffer`.
    pub fn reserve<T>(&self, buffer: &mut Vec<T>, additional: usize) {
        let required = buffer.len() + additional;
        if required > buffer.capacity() {
            let target = self.next_capacity(buffer.capacity(), required);
            buffer.reserve_exact(target - buffer.len());
        }
    }
}

/// Opaque identifier of an entity set, used to express alignment between sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntitySetId(pub u32);

/// How the entries of a set correspond to the entries of the rest of the mesh.
///
/// The reduction engine never interprets this tag; it is carried for the
/// consumer that writes the reduced mesh back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Correspondence {
    /// Entries are addressed only by their own index.
    #[default]
    Standalone,
    /// Entries are addressed through the given index set.
    IndexDriven(EntitySetId),
    /// One entry per mesh vertex.
    PerVertex,
    /// One entry per mesh face.
    PerFace,
    /// One entry per entry of the given set.
    AlignedTo(EntitySetId),
}

/// A flat buffer of fixed-arity tuples.
///
/// Invariant: the buffer length is always a multiple of `N`, so
/// `len() == as_flat().len() / N`. Deserialization rejects buffers that break it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawTupleSet<T>",
    bound(deserialize = "T: Copy + Deserialize<'de>")
)]
pub struct TupleSet<T, const N: usize> {
    values: Vec<T>,
    correspondence: Correspondence,
    growth: GrowthPolicy,
}

impl<T: Copy, const N: usize> TupleSet<T, N> {
    /// Create a new empty set
    pub fn new() -> Self {
        Self::with_policy(GrowthPolicy::default())
    }

    /// Create a new empty set growing under `growth`
    pub fn with_policy(growth: GrowthPolicy) -> Self {
        Self {
            values: Vec::new(),
            correspondence: Correspondence::Standalone,
            growth,
        }
    }

    /// Create a new empty set with room for `count` tuples
    pub fn with_capacity(count: usize) -> Self {
        Self::with_capacity_and_policy(count, GrowthPolicy::default())
    }

    /// Create a new empty set with room for `count` tuples, growing under `growth`
    pub fn with_capacity_and_policy(count: usize, growth: GrowthPolicy) -> Self {
        let mut set = Self::with_policy(growth);
        set.values.reserve_exact(count * N);
        set
    }

    /// Build a set from a flat buffer whose length must be a multiple of `N`.
    pub fn from_flat(values: Vec<T>) -> Result<Self> {
        if N == 0 || values.len() % N != 0 {
            return Err(Error::InvalidData(format!(
                "flat buffer of length {} is not divisible into tuples of {}",
                values.len(),
                N
            )));
        }
        Ok(Self {
            values,
            correspondence: Correspondence::Standalone,
            growth: GrowthPolicy::default(),
        })
    }

    /// Number of tuples
    pub fn len(&self) -> usize {
        if N == 0 {
            0
        } else {
            self.values.len() / N
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Tuple arity
    pub fn unit_size(&self) -> usize {
        N
    }

    /// Append a tuple, returning its index
    pub fn push(&mut self, tuple: [T; N]) -> usize {
        let index = self.len();
        self.growth.reserve(&mut self.values, N);
        self.values.extend_from_slice(&tuple);
        index
    }

    pub fn get(&self, index: usize) -> Option<&[T; N]> {
        let start = index.checked_mul(N)?;
        self.values.get(start..start + N)?.try_into().ok()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut [T; N]> {
        let start = index.checked_mul(N)?;
        self.values.get_mut(start..start + N)?.try_into().ok()
    }

    /// Iterate over tuples in index order
    pub fn iter(&self) -> impl Iterator<Item = &[T; N]> + '_ {
        self.values
            .chunks_exact(N.max(1))
            .filter_map(|chunk| <&[T; N]>::try_from(chunk).ok())
    }

    /// Iterate mutably over tuples in index order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut [T; N]> + '_ {
        self.values
            .chunks_exact_mut(N.max(1))
            .filter_map(|chunk| <&mut [T; N]>::try_from(chunk).ok())
    }

    /// The underlying flat buffer
    pub fn as_flat(&self) -> &[T] {
        &self.values
    }

    pub fn correspondence(&self) -> Correspondence {
        self.correspondence
    }

    pub fn set_correspondence(&mut self, correspondence: Correspondence) {
        self.correspondence = correspondence;
    }

    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth
    }

    /// Current buffer capacity in elements (not tuples)
    pub fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl<T: Copy, const N: usize> Default for TupleSet<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> FromIterator<[T; N]> for TupleSet<T, N> {
    fn from_iter<I: IntoIterator<Item = [T; N]>>(iter: I) -> Self {
        let mut set = Self::new();
        for tuple in iter {
            set.push(tuple);
        }
        set
    }
}

/// Serialized form of a [`TupleSet`], checked before it becomes one
#[derive(Deserialize)]
struct RawTupleSet<T> {
    values: Vec<T>,
    correspondence: Correspondence,
    growth: GrowthPolicy,
}

impl<T: Copy, const N: usize> TryFrom<RawTupleSet<T>> for TupleSet<T, N> {
    type Error = Error;

    fn try_from(raw: RawTupleSet<T>) -> Result<Self> {
        let mut set = Self::from_flat(raw.values)?;
        set.correspondence = raw.correspondence;
        set.growth = raw.growth;
        Ok(set)
    }
}

/// A flat buffer divided into variable-length runs.
///
/// `offsets` always starts with `0` and gains one entry per closed run, so the
/// run-start offsets are `offsets[..len()]` and the Nth run is
/// `values[offsets[n]..offsets[n + 1]]`. Values appended after the last closed
/// run form the *open run*, which is not yet a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawRaggedSet<T>",
    bound(deserialize = "T: Copy + Deserialize<'de>")
)]
pub struct RaggedSet<T> {
    values: Vec<T>,
    offsets: Vec<usize>,
    correspondence: Correspondence,
    growth: GrowthPolicy,
}

impl<T: Copy> RaggedSet<T> {
    /// Create a new empty set
    pub fn new() -> Self {
        Self::with_policy(GrowthPolicy::default())
    }

    /// Create a new empty set growing under `growth`
    pub fn with_policy(growth: GrowthPolicy) -> Self {
        Self {
            values: Vec::new(),
            offsets: vec![0],
            correspondence: Correspondence::Standalone,
            growth,
        }
    }

    /// Build a set from any sequence of runs
    pub fn from_runs<I, R>(runs: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[T]>,
    {
        let mut set = Self::new();
        for run in runs {
            set.push_run(run.as_ref());
        }
        set
    }

    /// Number of closed runs
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of values across closed runs
    pub fn value_count(&self) -> usize {
        self.closed_end()
    }

    fn closed_end(&self) -> usize {
        self.offsets.last().copied().unwrap_or(0)
    }

    /// Append a complete run, returning its index. Any open run is closed first.
    pub fn push_run(&mut self, run: &[T]) -> usize {
        if self.has_open_run() {
            self.close_run();
        }
        self.growth.reserve(&mut self.values, run.len());
        self.values.extend_from_slice(run);
        self.close_run()
    }

    /// Append a value to the open run
    pub fn push_value(&mut self, value: T) {
        self.growth.reserve(&mut self.values, 1);
        self.values.push(value);
    }

    /// Close the open run (possibly empty), returning the new record's index
    pub fn close_run(&mut self) -> usize {
        let index = self.len();
        self.growth.reserve(&mut self.offsets, 1);
        self.offsets.push(self.values.len());
        index
    }

    /// Whether values have been appended since the last closed run
    pub fn has_open_run(&self) -> bool {
        self.values.len() > self.closed_end()
    }

    /// Values appended since the last closed run
    pub fn open_run(&self) -> &[T] {
        &self.values[self.closed_end()..]
    }

    /// Drop the values of the open run
    pub fn discard_open_run(&mut self) {
        let end = self.closed_end();
        self.values.truncate(end);
    }

    pub fn run(&self, index: usize) -> Option<&[T]> {
        let start = *self.offsets.get(index)?;
        let end = *self.offsets.get(index + 1)?;
        self.values.get(start..end)
    }

    pub fn run_len(&self, index: usize) -> Option<usize> {
        Some(self.offsets.get(index + 1)? - self.offsets.get(index)?)
    }

    /// Start offsets of every closed run
    pub fn run_starts(&self) -> &[usize] {
        &self.offsets[..self.len()]
    }

    /// Iterate over closed runs in index order
    pub fn iter(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.offsets
            .windows(2)
            .map(move |w| &self.values[w[0]..w[1]])
    }

    /// All values of closed runs, concatenated
    pub fn as_flat(&self) -> &[T] {
        &self.values[..self.closed_end()]
    }

    pub fn correspondence(&self) -> Correspondence {
        self.correspondence
    }

    pub fn set_correspondence(&mut self, correspondence: Correspondence) {
        self.correspondence = correspondence;
    }

    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.offsets.truncate(1);
    }
}

impl<T: Copy> Default for RaggedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized form of a [`RaggedSet`], checked before it becomes one
#[derive(Deserialize)]
struct RawRaggedSet<T> {
    values: Vec<T>,
    offsets: Vec<usize>,
    correspondence: Correspondence,
    growth: GrowthPolicy,
}

impl<T: Copy> TryFrom<RawRaggedSet<T>> for RaggedSet<T> {
    type Error = Error;

    fn try_from(raw: RawRaggedSet<T>) -> Result<Self> {
        if raw.offsets.first() != Some(&0) {
            return Err(Error::InvalidData("run offsets must start with 0".to_string()));
        }
        if raw.offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidData("run offsets must be non-decreasing".to_string()));
        }
        let end = raw.offsets.last().copied().unwrap_or(0);
        if end > raw.values.len() {
            return Err(Error::InvalidData(format!(
                "run offsets end at {end}, past {} values",
                raw.values.len()
            )));
        }
        Ok(Self {
            values: raw.values,
            offsets: raw.offsets,
            correspondence: raw.correspondence,
            growth: raw.growth,
        })
    }
}
