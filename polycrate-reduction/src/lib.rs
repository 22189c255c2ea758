//! Template-driven mesh reduction
//!
//! This crate reduces a dense floater mesh to the connectivity of a coarse
//! attractor mesh:
//! - Coordinate attraction with nearest- and farthest-preserving selection
//! - The reduction orchestrator, as a function and as an incremental builder
//! - Lazy fan-triangle reconstruction of the reduced faces

pub mod attractor;
pub mod config;
pub mod faces;
pub mod reducer;
pub mod selection;

pub use attractor::*;
pub use config::*;
pub use faces::*;
pub use reducer::*;
pub use selection::*;

use polycrate_core::{IndexedMesh, Result};

/// Reduce a floater mesh against an attractor template
pub trait MeshReducer {
    /// Keep the floater vertices selected by `attractor` and describe the reduced faces
    fn reduce(&self, attractor: &IndexedMesh, floater: &IndexedMesh) -> Result<Reduction>;
}
