//! Mosaic assembly: project, crop, paste, flip.
//!
//! Overlap margins are discarded, not registered or blended. Neighboring
//! tiles duplicate each other's margins, so dropping `overlap` pixels per
//! edge leaves abutting blocks that tile the canvas exactly.

use crate::error::StitchError;
use crate::grid::TileGrid;
use crate::stack::TileStack;

/// Stitch-time knobs. Tile dimensions come from the stack pages themselves.
#[derive(Debug, Clone, Copy)]
pub struct StitchParams {
    /// Pixels cropped from every tile edge.
    pub overlap: usize,
    /// Reverse canvas row order before rendering. The stage Y axis and the
    /// image row axis run in opposite directions in the observed setup; keep
    /// this on unless the acquisition says otherwise.
    pub flip_vertical: bool,
}

/// The assembled composite canvas.
#[derive(Debug, Clone)]
pub struct Mosaic {
    width: usize,
    height: usize,
    tile_width: usize,
    tile_height: usize,
    data: Vec<u8>,
}

impl Mosaic {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Effective (post-crop) tile width, the horizontal block pitch.
    pub fn tile_width(&self) -> usize {
        self.tile_width
    }

    /// Effective (post-crop) tile height, the vertical block pitch.
    pub fn tile_height(&self) -> usize {
        self.tile_height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }
}

/// Assemble the mosaic for a fully mapped grid.
pub fn stitch(
    stack: &TileStack,
    grid: &TileGrid,
    params: &StitchParams,
) -> Result<Mosaic, StitchError> {
    stitch_with_progress(stack, grid, params, |_| {})
}

/// [`stitch`] with a per-tile callback, invoked with each 1-based tile index
/// as its block lands on the canvas.
pub fn stitch_with_progress(
    stack: &TileStack,
    grid: &TileGrid,
    params: &StitchParams,
    mut on_tile: impl FnMut(u32),
) -> Result<Mosaic, StitchError> {
    if grid.is_empty() {
        return Err(StitchError::EmptyGrid);
    }
    // Every grid cell must receive exactly one tile; a sparse mapping would
    // leave zero-filled holes that render as valid-looking background.
    if grid.rows() * grid.cols() != grid.len() {
        return Err(StitchError::GridCoverage {
            rows: grid.rows(),
            cols: grid.cols(),
            tiles: grid.len(),
        });
    }

    let planes_per_tile = stack.planes_per_tile(grid.len())?;

    let overlap = params.overlap;
    let (tile_w, tile_h) = (stack.width(), stack.height());
    if tile_w <= 2 * overlap || tile_h <= 2 * overlap {
        return Err(StitchError::TileTooSmall {
            width: tile_w,
            height: tile_h,
            overlap,
        });
    }
    let effective_w = tile_w - 2 * overlap;
    let effective_h = tile_h - 2 * overlap;

    let width = grid.cols() * effective_w;
    let height = grid.rows() * effective_h;
    let mut data = vec![0u8; width * height];

    for (index, cell) in grid.iter() {
        let tile_no = (index - 1) as usize;
        let projection = stack.max_projection(tile_no * planes_per_tile, planes_per_tile);

        for y in 0..effective_h {
            let src = (y + overlap) * tile_w + overlap;
            let dst = (cell.row * effective_h + y) * width + cell.col * effective_w;
            data[dst..dst + effective_w].copy_from_slice(&projection[src..src + effective_w]);
        }
        on_tile(index);
    }

    if params.flip_vertical {
        data = flip_rows(&data, width, height);
    }

    Ok(Mosaic {
        width,
        height,
        tile_width: effective_w,
        tile_height: effective_h,
        data,
    })
}

fn flip_rows(data: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut flipped = vec![0u8; data.len()];
    for y in 0..height {
        let src = (height - 1 - y) * width;
        flipped[y * width..(y + 1) * width].copy_from_slice(&data[src..src + width]);
    }
    flipped
}
