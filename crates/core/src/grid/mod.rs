//! Grid model: cell storage and pinned sources

pub mod lattice;
pub mod sources;

pub use lattice::{GridShape, HeatGrid};
pub use sources::{SourcePoint, SourceSet};
