//! # polycrate
//!
//! Template-driven polygon count reduction for indexed face sets.
//!
//! This is the umbrella crate that provides convenient access to all polycrate
//! functionality. Use the individual crates for more granular control over
//! dependencies.
//!
//! ## Features
//!
//! - **Core**: Entity sets, vertex and face sets, polygonal meshes, the mesh
//!   dual and bounding-box normalization
//! - **Reduction**: Coordinate attraction and fan-triangle face reconstruction
//!
//! ## Quick Start
//!
//! ```rust
//! use polycrate::prelude::*;
//!
//! let attractor = IndexedMesh::from_triangles(
//!     &[
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.5, 1.0, 0.5),
//!     ],
//!     &[[0, 1, 2]],
//! )?;
//!
//! let mut floater = IndexedMesh::new();
//! for i in 0..10 {
//!     let t = i as f32 * 0.7;
//!     floater.add_vertex(t.cos(), t.sin(), t * 0.1);
//! }
//!
//! let reduction = reduce(&attractor, &floater, &ReductionConfig::new())?;
//! assert!(reduction.new_to_old_mapping().len() <= 4);
//! for generator in reduction.enumerate_faces() {
//!     for triangle in generator.valid_triangles() {
//!         println!("{:?}", triangle);
//!     }
//! }
//! # Ok::<(), polycrate::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables core and reduction
//! - `reduction`: Template-driven reduction
//! - `all`: Enables all features

// Re-export core functionality
pub use polycrate_core::*;

// Re-export sub-crates
#[cfg(feature = "reduction")]
pub use polycrate_reduction as reduction;

/// Convenient imports for common use cases
pub mod prelude {
    pub use polycrate_core::*;

    #[cfg(feature = "reduction")]
    pub use polycrate_reduction::*;
}
