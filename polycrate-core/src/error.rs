//! Error types for polycrate

use thiserror::Error;

/// Main error type for polycrate operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    /// A reduction was started before both of its inputs were supplied.
    #[error("Incomplete input: no {0} mesh was supplied")]
    IncompleteInput(&'static str),

    /// A source bounding box has zero extent on `axis` (0 = x, 1 = y, 2 = z).
    #[error("Degenerate bounding box: zero extent on axis {axis}")]
    DegenerateBounds { axis: usize },

    #[error("Operation cancelled")]
    Cancelled,
}

/// Result type alias for polycrate operations
pub type Result<T> = std::result::Result<T, Error>;
