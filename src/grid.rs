//! Tile-index to grid-coordinate resolution.
//!
//! Stage positions cluster into a small set of distinct X values (the grid's
//! columns) and distinct Y values (the rows). Ranking the sorted distinct
//! values gives each tile a zero-based (row, col) without ever comparing
//! positions with a tolerance: the values come bit-exact from one parse of the
//! metadata, so equal positions are equal bits.

use std::collections::{BTreeMap, HashMap};

use crate::error::StitchError;
use crate::metadata::TilePosition;

/// A tile's block coordinates in the mosaic. Rows increase with stage Y,
/// columns with stage X.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

/// Total mapping from 1-based tile index to grid cell.
///
/// Keyed by the 1-based index (`FieldX + 1`) used for on-image labels,
/// ordered so iteration always walks tiles in acquisition order.
#[derive(Debug, Clone)]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    cells: BTreeMap<u32, GridCell>,
}

impl TileGrid {
    /// Resolve grid coordinates for every tile.
    ///
    /// Fails on duplicate (X, Y) pairs and on the (structurally impossible,
    /// still checked) case of a position missing from its own ranked set.
    pub fn resolve(tiles: &[TilePosition]) -> Result<Self, StitchError> {
        if tiles.is_empty() {
            return Err(StitchError::EmptyGrid);
        }

        let mut seen: HashMap<(u64, u64), u32> = HashMap::new();
        for tile in tiles {
            let key = (tile.pos_x.to_bits(), tile.pos_y.to_bits());
            if let Some(&first) = seen.get(&key) {
                return Err(StitchError::DuplicatePosition {
                    first: first + 1,
                    second: tile.field + 1,
                    x: tile.pos_x,
                    y: tile.pos_y,
                });
            }
            seen.insert(key, tile.field);
        }

        let xs = ranked_values(tiles.iter().map(|t| t.pos_x));
        let ys = ranked_values(tiles.iter().map(|t| t.pos_y));

        let mut cells = BTreeMap::new();
        for tile in tiles {
            let index = tile.field + 1;
            let col = rank_of(&xs, tile.pos_x).ok_or(StitchError::PositionLookup { index })?;
            let row = rank_of(&ys, tile.pos_y).ok_or(StitchError::PositionLookup { index })?;
            cells.insert(index, GridCell { row, col });
        }

        Ok(Self {
            rows: ys.len(),
            cols: xs.len(),
            cells,
        })
    }

    /// Number of grid rows (distinct Y positions).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of grid columns (distinct X positions).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of mapped tiles.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell for a 1-based tile index.
    pub fn cell(&self, index: u32) -> Option<GridCell> {
        self.cells.get(&index).copied()
    }

    /// Iterate (1-based tile index, cell) in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, GridCell)> + '_ {
        self.cells.iter().map(|(&index, &cell)| (index, cell))
    }
}

fn ranked_values(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup_by(|a, b| a.to_bits() == b.to_bits());
    sorted
}

fn rank_of(sorted: &[f64], value: f64) -> Option<usize> {
    sorted.binary_search_by(|probe| probe.total_cmp(&value)).ok()
}
