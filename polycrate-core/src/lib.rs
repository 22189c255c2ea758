//! Core data structures and traits for polycrate
//!
//! This crate provides the indexed entity sets that back every mesh
//! (fixed-arity tuple sets and variable-arity run sets), vertex and face sets
//! built on them, the polygonal mesh with its topological dual, and the
//! bounding-box normalization used to bring two meshes into one frame.

pub mod bounds;
pub mod dual;
pub mod entity_set;
pub mod error;
pub mod face_set;
pub mod mesh;
pub mod point;
pub mod traits;
pub mod transform;
pub mod vertex_set;

pub use bounds::*;
pub use entity_set::*;
pub use error::*;
pub use face_set::*;
pub use mesh::*;
pub use point::*;
pub use traits::*;
pub use transform::*;
pub use vertex_set::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point3, Vector3};
