//! Problem loading and snapshot output

pub mod loader;
pub mod render;

pub use loader::ProblemDescription;
pub use render::{render_text_block, write_block, write_grid, write_text_block, SnapshotFormat};
