//! Error types for grid construction and problem loading
//!
//! The relaxation engine itself cannot fail on validated input, so the only
//! fallible surfaces are geometry validation (shared by the loader and the C
//! ABI) and reading a problem description.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid grid geometry or run parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// One of the grid dimensions is zero
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },

    /// A source coordinate lies outside the grid
    #[error("source ({row}, {col}) lies outside the {rows}x{cols} grid")]
    SourceOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Threshold is negative or not finite
    #[error("termination threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),

    /// Iteration cap of zero would never terminate a block
    #[error("iteration cap must be positive")]
    ZeroIterationCap,
}

/// Failure to read or parse a problem description
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file could not be opened or read
    #[error("Problem with File '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of the description is missing or malformed
    #[error("Bad File Format (line {line}): {reason}")]
    BadFormat { line: usize, reason: String },

    /// The description parsed but describes an invalid geometry
    #[error("Bad File Format: {0}")]
    Geometry(#[from] GeometryError),
}

impl LoadError {
    pub(crate) fn bad_format(line: usize, reason: impl Into<String>) -> Self {
        Self::BadFormat {
            line,
            reason: reason.into(),
        }
    }
}
