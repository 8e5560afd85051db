//! Stitch single-channel (DAPI) microscopy tile stacks into annotated mosaic
//! previews.
//!
//! Per (sample, batch, round) dataset: tile stage positions are read from the
//! acquisition's `*_Properties.xml`, distinct X/Y values are rank-ordered into
//! a row/column grid, each tile's z-planes are max-projected, overlap margins
//! are cropped, and the blocks are pasted into one canvas that is flipped,
//! colormapped, annotated with grid lines and tile indices, and saved as PNG.

pub mod batch;
pub mod config;
pub mod error;
pub mod grid;
pub mod metadata;
pub mod render;
pub mod stack;
pub mod stitch;

pub use crate::batch::{BatchSummary, prepare_output_dir, run_batch, stitch_dataset};
pub use crate::config::{DatasetId, StitchConfig, load_config};
pub use crate::error::StitchError;
pub use crate::grid::{GridCell, TileGrid};
pub use crate::metadata::{TilePosition, parse_tile_positions, parse_tile_positions_str};
pub use crate::stack::{TileStack, load_stack};
pub use crate::stitch::{Mosaic, StitchParams, stitch, stitch_with_progress};
