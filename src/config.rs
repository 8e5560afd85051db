//! Run configuration.
//!
//! Everything the original workflow hardcoded lives here: the dataset root,
//! the per-round acquisition subfolders, the identifier lists whose
//! cross-product defines the batch, and the stitch parameters. Loaded from a
//! JSON file; every field has a default so a minimal config only names the
//! paths and identifiers it actually uses.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::StitchError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    /// Root folder holding one subfolder per imaging round.
    pub dataset_root: PathBuf,
    /// Round name to acquisition subfolder. Rounds not listed here are
    /// assumed to live in a subfolder named after the round itself.
    pub round_dirs: BTreeMap<String, String>,
    pub samples: Vec<String>,
    pub batches: Vec<String>,
    pub rounds: Vec<String>,
    /// Tile edge length in pixels, used to cross-check the decoded stack.
    pub tile_size: usize,
    /// Overlap margin cropped from every tile edge, in pixels.
    pub overlap: usize,
    /// Intensity mapped to the darkest colormap value; higher values saturate.
    pub display_clamp: u8,
    /// Reverse canvas row order before rendering (stage Y runs against the
    /// image row axis in the observed setup).
    pub flip_vertical: bool,
    pub output_dir: PathBuf,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            dataset_root: PathBuf::new(),
            round_dirs: BTreeMap::new(),
            samples: Vec::new(),
            batches: Vec::new(),
            rounds: Vec::new(),
            tile_size: 512,
            overlap: 27,
            display_clamp: 75,
            flip_vertical: true,
            output_dir: PathBuf::from("dapi_images/with_tiles"),
        }
    }
}

/// One (sample, batch, round) dataset in the batch cross-product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetId {
    pub sample: String,
    pub batch: String,
    pub round: String,
}

impl DatasetId {
    /// The `{sample}_{batch}_{round}` label used in every dataset path.
    pub fn label(&self) -> String {
        format!("{}_{}_{}", self.sample, self.batch, self.round)
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.sample, self.batch, self.round)
    }
}

impl StitchConfig {
    /// The full sample x batch x round cross-product, in run order.
    pub fn datasets(&self) -> Vec<DatasetId> {
        let mut out = Vec::new();
        for sample in &self.samples {
            for batch in &self.batches {
                for round in &self.rounds {
                    out.push(DatasetId {
                        sample: sample.clone(),
                        batch: batch.clone(),
                        round: round.clone(),
                    });
                }
            }
        }
        out
    }

    fn dataset_dir(&self, dataset: &DatasetId) -> PathBuf {
        let round_dir = self
            .round_dirs
            .get(&dataset.round)
            .map(String::as_str)
            .unwrap_or(&dataset.round);
        self.dataset_root.join(round_dir).join(dataset.label())
    }

    pub fn metadata_path(&self, dataset: &DatasetId) -> PathBuf {
        self.dataset_dir(dataset)
            .join("MetaData")
            .join(format!("{}_Properties.xml", dataset.label()))
    }

    pub fn stack_path(&self, dataset: &DatasetId) -> PathBuf {
        self.dataset_dir(dataset)
            .join(format!("{}_RAW_ch00.tif", dataset.label()))
    }

    pub fn output_path(&self, dataset: &DatasetId) -> PathBuf {
        self.output_dir
            .join(format!("{}_dapi_all_v3.png", dataset.label()))
    }
}

/// Load a [`StitchConfig`] from a JSON file.
pub fn load_config(path: &Path) -> Result<StitchConfig, StitchError> {
    let text = fs::read_to_string(path).map_err(|source| StitchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| StitchError::Config {
        path: path.to_path_buf(),
        source,
    })
}
