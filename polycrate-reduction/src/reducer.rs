//! Template-driven reduction
//!
//! Reduces a dense *floater* mesh to the topology of a small *attractor*
//! template while taking every output position from the floater:
//!
//! 1. Build the dual of the attractor (one dual vertex per attractor face).
//! 2. Normalize the attractor vertices and the dual vertices into the
//!    floater's bounding box.
//! 3. Keep, for every attractor vertex, the floater vertex nearest to it
//!    within its partition.
//! 4. Keep, for every dual vertex, the floater vertex farthest from it within
//!    its partition. Both passes mark one shared indicator.
//! 5. Gather the marked floater vertices, in floater order, into the reduced
//!    ("magic") vertex set together with their original indices.
//! 6. Snap every floater vertex to its nearest magic vertex, for remapping
//!    per-vertex attributes onto the new topology.
//!
//! Faces are rebuilt lazily by [`FaceGenerators`](crate::FaceGenerators).

use itertools::Itertools;
use log::debug;
use polycrate_core::{scale_to, Bounded, Error, IndexedMesh, Result, TriangleMesh, VertexSet};
use serde::{Deserialize, Serialize};

use crate::attractor::CoordinateAttractor;
use crate::config::ReductionConfig;
use crate::faces::FaceGenerators;
use crate::selection::SelectionPolicy;
use crate::MeshReducer;

/// Summary counts of one reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReductionStats {
    pub attractor_vertices: usize,
    pub attractor_faces: usize,
    pub floater_vertices: usize,
    /// Number of preserved ("magic") floater vertices
    pub preserved_vertices: usize,
    pub empty_vertex_partitions: usize,
    pub empty_dual_partitions: usize,
    /// Fan triangles generated, valid or not (one per attractor polygon corner)
    pub fan_triangles: usize,
    pub valid_triangles: usize,
}

/// Output of a reduction
#[derive(Debug, Clone)]
pub struct Reduction {
    magic: VertexSet,
    new_to_old: Vec<usize>,
    preserved: Vec<bool>,
    snap: Vec<usize>,
    attractor_faces: polycrate_core::FaceSet,
    nearest: CoordinateAttractor,
    farthest: CoordinateAttractor,
    stats: ReductionStats,
}

impl Reduction {
    /// Reduced vertex set: the preserved floater positions, in floater order
    pub fn new_coords(&self) -> &VertexSet {
        &self.magic
    }

    /// Original floater index of every reduced vertex (strictly increasing)
    pub fn new_to_old_mapping(&self) -> &[usize] {
        &self.new_to_old
    }

    /// One flag per floater vertex, set when the vertex was preserved
    pub fn preserved_floaters(&self) -> &[bool] {
        &self.preserved
    }

    /// Index of the nearest reduced vertex for every floater vertex
    pub fn snap_table(&self) -> &[usize] {
        &self.snap
    }

    /// Reduced index of every floater vertex, `None` for dropped ones
    pub fn old_to_new(&self) -> Vec<Option<usize>> {
        let mut table = vec![None; self.preserved.len()];
        for (new, &old) in self.new_to_old.iter().enumerate() {
            table[old] = Some(new);
        }
        table
    }

    /// Fan generators, one per attractor polygon, in attractor face order
    pub fn enumerate_faces(&self) -> FaceGenerators<'_> {
        FaceGenerators::new(&self.attractor_faces, &self.nearest, &self.farthest)
    }

    /// The nearest-preserving pass over attractor vertices
    pub fn nearest_pass(&self) -> &CoordinateAttractor {
        &self.nearest
    }

    /// The farthest-preserving pass over dual vertices
    pub fn farthest_pass(&self) -> &CoordinateAttractor {
        &self.farthest
    }

    pub fn stats(&self) -> &ReductionStats {
        &self.stats
    }

    /// Pick the value of every preserved vertex out of a per-floater-vertex attribute
    pub fn remap_attribute<T: Clone>(&self, per_floater: &[T]) -> Result<Vec<T>> {
        if per_floater.len() != self.preserved.len() {
            return Err(Error::InvalidData(format!(
                "attribute has {} entries for {} floater vertices",
                per_floater.len(),
                self.preserved.len()
            )));
        }
        Ok(self
            .new_to_old
            .iter()
            .map(|&old| per_floater[old].clone())
            .collect())
    }

    /// Assemble the valid fan triangles into a mesh over the reduced vertices
    pub fn to_triangle_mesh(&self) -> TriangleMesh {
        let old_to_new = self.old_to_new();
        let faces = self
            .enumerate_faces()
            .flat_map(|generator| generator.valid_triangles())
            .filter_map(|[a, b, c]| Some([old_to_new[a]?, old_to_new[b]?, old_to_new[c]?]))
            .collect();
        TriangleMesh::from_vertices_and_faces(self.magic.to_points(), faces)
    }
}

/// Reduce `floater` to the topology of `attractor`.
///
/// Both meshes must have at least one vertex and the attractor's faces must
/// reference existing vertices. The floater's faces are not consulted.
pub fn reduce(
    attractor: &IndexedMesh,
    floater: &IndexedMesh,
    config: &ReductionConfig,
) -> Result<Reduction> {
    if attractor.vertices.is_empty() {
        return Err(Error::InvalidData("attractor mesh has no vertices".to_string()));
    }
    let Some(target) = floater.vertices.bounding_box() else {
        return Err(Error::InvalidData("floater mesh has no vertices".to_string()));
    };

    let dual = attractor.dual()?;

    let mut attractor_vertices = attractor.vertices.clone();
    let mut dual_vertices = dual.vertices;
    scale_to(&mut attractor_vertices, &target, config.degenerate_axis)?;
    scale_to(&mut dual_vertices, &target, config.degenerate_axis)?;

    let mut preserved = vec![false; floater.vertex_count()];

    let mut nearest =
        CoordinateAttractor::new(&attractor_vertices, SelectionPolicy::NearestPreserving);
    nearest.attract_into(&floater.vertices, &mut preserved, config)?;

    let mut farthest =
        CoordinateAttractor::new(&dual_vertices, SelectionPolicy::FarthestPreserving);
    farthest.attract_into(&floater.vertices, &mut preserved, config)?;

    let new_to_old: Vec<usize> = preserved.iter().positions(|&p| p).collect();
    let mut magic =
        VertexSet::with_capacity_and_policy(new_to_old.len(), floater.vertices.growth_policy());
    magic.set_correspondence(floater.vertices.correspondence());
    for &old in &new_to_old {
        if let Some(p) = floater.vertices.point(old) {
            magic.push(p);
        }
    }

    let snap = CoordinateAttractor::new(&magic, SelectionPolicy::NearestPreserving)
        .assign_nearest(&floater.vertices, config)?;

    let mut reduction = Reduction {
        magic,
        new_to_old,
        preserved,
        snap,
        attractor_faces: attractor.faces.clone(),
        stats: ReductionStats {
            attractor_vertices: attractor.vertex_count(),
            attractor_faces: attractor.face_count(),
            floater_vertices: floater.vertex_count(),
            preserved_vertices: 0,
            empty_vertex_partitions: nearest.empty_partitions(),
            empty_dual_partitions: farthest.empty_partitions(),
            fan_triangles: attractor.faces.corner_count(),
            valid_triangles: 0,
        },
        nearest,
        farthest,
    };
    reduction.stats.preserved_vertices = reduction.magic.len();
    reduction.stats.valid_triangles = reduction
        .enumerate_faces()
        .map(|generator| generator.valid_triangles().count())
        .sum();

    debug!(
        "reduced {} floater vertices to {} ({} of {} fan triangles valid)",
        reduction.stats.floater_vertices,
        reduction.stats.preserved_vertices,
        reduction.stats.valid_triangles,
        reduction.stats.fan_triangles
    );

    Ok(reduction)
}

/// [`MeshReducer`] running [`reduce`] with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct AttractorReducer {
    pub config: ReductionConfig,
}

impl AttractorReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReductionConfig) -> Self {
        Self { config }
    }
}

impl MeshReducer for AttractorReducer {
    fn reduce(&self, attractor: &IndexedMesh, floater: &IndexedMesh) -> Result<Reduction> {
        reduce(attractor, floater, &self.config)
    }
}

/// Incremental front end to [`reduce`].
///
/// The attractor and the floater can be supplied separately (the floater may
/// be streamed in through [`floater_mut`](Self::floater_mut)). [`run`](Self::run)
/// fails with [`Error::IncompleteInput`] until both are present, computes the
/// reduction once, and returns the cached result on later calls. Supplying a
/// new input discards the cached result.
#[derive(Debug, Default)]
pub struct ReductionBuilder {
    attractor: Option<IndexedMesh>,
    floater: Option<IndexedMesh>,
    config: ReductionConfig,
    result: Option<Reduction>,
}

impl ReductionBuilder {
    pub fn new(config: ReductionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn attractor(&mut self, mesh: IndexedMesh) -> &mut Self {
        self.attractor = Some(mesh);
        self.result = None;
        self
    }

    pub fn floater(&mut self, mesh: IndexedMesh) -> &mut Self {
        self.floater = Some(mesh);
        self.result = None;
        self
    }

    /// Floater mesh for incremental loading, created empty on first access
    pub fn floater_mut(&mut self) -> &mut IndexedMesh {
        self.result = None;
        self.floater.get_or_insert_with(IndexedMesh::new)
    }

    pub fn has_attractor(&self) -> bool {
        self.attractor.is_some()
    }

    pub fn has_floater(&self) -> bool {
        self.floater.is_some()
    }

    pub fn has_run(&self) -> bool {
        self.result.is_some()
    }

    /// Run the reduction if it has not run yet
    pub fn run(&mut self) -> Result<&Reduction> {
        if self.result.is_none() {
            let attractor = self.attractor.as_ref().ok_or(Error::IncompleteInput("attractor"))?;
            let floater = self.floater.as_ref().ok_or(Error::IncompleteInput("floater"))?;
            self.result = Some(reduce(attractor, floater, &self.config)?);
        }
        self.result
            .as_ref()
            .ok_or_else(|| Error::Algorithm("reduction result missing after run".to_string()))
    }

    /// The cached reduction, if [`run`](Self::run) has succeeded
    pub fn reduction(&self) -> Option<&Reduction> {
        self.result.as_ref()
    }
}
