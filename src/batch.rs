//! Sequential batch runner with per-dataset failure isolation.
//!
//! One missing or malformed dataset must not abort the run: each
//! (sample, batch, round) iteration is attempted independently and the
//! outcome collected into a [`BatchSummary`] for end-of-run reporting.

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};

use crate::config::{DatasetId, StitchConfig};
use crate::error::StitchError;
use crate::grid::TileGrid;
use crate::metadata::parse_tile_positions;
use crate::render::{render_annotated, save_png};
use crate::stack::load_stack;
use crate::stitch::{StitchParams, stitch_with_progress};

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl BatchSummary {
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Create the output directory. Explicit setup step, called once by the
/// binary before the run rather than as a side effect of anything else.
pub fn prepare_output_dir(config: &StitchConfig) -> Result<(), StitchError> {
    std::fs::create_dir_all(&config.output_dir).map_err(|source| StitchError::Io {
        path: config.output_dir.clone(),
        source,
    })
}

/// Stitch and render one dataset, returning the written preview path.
pub fn stitch_dataset(
    config: &StitchConfig,
    dataset: &DatasetId,
) -> Result<PathBuf, StitchError> {
    let tiles = parse_tile_positions(&config.metadata_path(dataset))?;
    let grid = TileGrid::resolve(&tiles)?;
    info!(
        "{dataset}: {} tiles in a {}x{} grid",
        tiles.len(),
        grid.rows(),
        grid.cols()
    );

    let stack = load_stack(&config.stack_path(dataset))?;
    if stack.width() != config.tile_size || stack.height() != config.tile_size {
        warn!(
            "{dataset}: stack pages are {}x{}, configured tile size is {}",
            stack.width(),
            stack.height(),
            config.tile_size
        );
    }

    let params = StitchParams {
        overlap: config.overlap,
        flip_vertical: config.flip_vertical,
    };

    let bar = ProgressBar::new(grid.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} tiles") {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar.set_message(dataset.label());

    let mosaic = stitch_with_progress(&stack, &grid, &params, |_| bar.inc(1))?;
    bar.finish_and_clear();

    let preview = render_annotated(&mosaic, &grid, config.display_clamp)?;
    let out = config.output_path(dataset);
    save_png(&preview, &out)?;
    Ok(out)
}

/// Run every configured dataset in order, isolating failures.
pub fn run_batch(config: &StitchConfig) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for dataset in config.datasets() {
        info!("stitching {dataset}");
        match stitch_dataset(config, &dataset) {
            Ok(path) => {
                info!("{dataset}: wrote {}", path.display());
                summary.succeeded.push(dataset.label());
            }
            Err(err) => {
                error!("{dataset}: {err}");
                summary.failed.push((dataset.label(), err.to_string()));
            }
        }
    }

    summary
}
