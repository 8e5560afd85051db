//! Annotated preview rendering.
//!
//! The mosaic is mapped through a white-to-blue colormap with a fixed display
//! clamp, grid lines are drawn at every tile boundary with plotters' bitmap
//! backend, and each tile's 1-based index is stamped near the top-left corner
//! of its block with a scaled bitmap digit font (no font-file asset needed).

use std::fs;
use std::path::Path;

use image::RgbImage;
use plotters::prelude::*;

use crate::error::StitchError;
use crate::grid::TileGrid;
use crate::stitch::Mosaic;

/// Label placement within a tile block, in pixels from the block corner.
const LABEL_OFFSET_X: usize = 10;
const LABEL_OFFSET_Y: usize = 35;

/// Integer upscale applied to the 3x5 digit glyphs.
const LABEL_SCALE: usize = 4;

/// Map an intensity through the white-to-blue ramp, saturating at `clamp`.
///
/// Endpoints match the matplotlib "Blues" colormap the previews were
/// originally rendered with: near-white at zero, dark blue at the clamp.
pub fn blues(value: u8, clamp: u8) -> [u8; 3] {
    const LOW: [f32; 3] = [247.0, 251.0, 255.0];
    const HIGH: [f32; 3] = [8.0, 48.0, 107.0];
    let clamp = clamp.max(1) as f32;
    let t = (value as f32 / clamp).min(1.0);
    [
        (LOW[0] + (HIGH[0] - LOW[0]) * t).round() as u8,
        (LOW[1] + (HIGH[1] - LOW[1]) * t).round() as u8,
        (LOW[2] + (HIGH[2] - LOW[2]) * t).round() as u8,
    ]
}

/// Render the annotated preview: colormap, tile-boundary grid lines, labels.
///
/// Labels are placed by grid coordinates on the (possibly flipped) canvas,
/// matching the acquisition software's numbering convention.
pub fn render_annotated(
    mosaic: &Mosaic,
    grid: &TileGrid,
    display_clamp: u8,
) -> Result<RgbImage, StitchError> {
    let (width, height) = (mosaic.width(), mosaic.height());

    let mut rgb = vec![0u8; width * height * 3];
    for (i, &v) in mosaic.data().iter().enumerate() {
        rgb[i * 3..i * 3 + 3].copy_from_slice(&blues(v, display_clamp));
    }

    draw_grid_lines(&mut rgb, width, height, grid, mosaic)?;

    for (index, cell) in grid.iter() {
        let x = cell.col * mosaic.tile_width() + LABEL_OFFSET_X;
        let y = cell.row * mosaic.tile_height() + LABEL_OFFSET_Y;
        draw_label(&mut rgb, width, height, x, y, index, [0, 0, 0]);
    }

    RgbImage::from_raw(width as u32, height as u32, rgb)
        .ok_or_else(|| StitchError::Render("failed to assemble RGB buffer".to_string()))
}

/// Save a rendered preview, creating parent directories.
pub fn save_png(img: &RgbImage, path: &Path) -> Result<(), StitchError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| StitchError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    img.save(path).map_err(|source| StitchError::Image {
        path: path.to_path_buf(),
        source,
    })
}

fn draw_grid_lines(
    rgb: &mut [u8],
    width: usize,
    height: usize,
    grid: &TileGrid,
    mosaic: &Mosaic,
) -> Result<(), StitchError> {
    let root =
        BitMapBackend::with_buffer(rgb, (width as u32, height as u32)).into_drawing_area();
    let line = RGBColor(0, 0, 0);

    for row in 0..grid.rows() {
        let y = (row * mosaic.tile_height()) as i32;
        root.draw(&PathElement::new([(0, y), (width as i32 - 1, y)], line))
            .map_err(|e| StitchError::Render(e.to_string()))?;
    }
    for col in 0..grid.cols() {
        let x = (col * mosaic.tile_width()) as i32;
        root.draw(&PathElement::new([(x, 0), (x, height as i32 - 1)], line))
            .map_err(|e| StitchError::Render(e.to_string()))?;
    }

    root.present().map_err(|e| StitchError::Render(e.to_string()))
}

// 3x5 digit glyphs, row-major.
const DIGITS: [[u8; 15]; 10] = [
    [1, 1, 1, 1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 1, 1], // 0
    [0, 1, 0, 1, 1, 0, 0, 1, 0, 0, 1, 0, 1, 1, 1], // 1
    [1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1], // 2
    [1, 1, 1, 0, 0, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1], // 3
    [1, 0, 1, 1, 0, 1, 1, 1, 1, 0, 0, 1, 0, 0, 1], // 4
    [1, 1, 1, 1, 0, 0, 1, 1, 1, 0, 0, 1, 1, 1, 1], // 5
    [1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 0, 1, 1, 1, 1], // 6
    [1, 1, 1, 0, 0, 1, 0, 0, 1, 0, 0, 1, 0, 0, 1], // 7
    [1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1], // 8
    [1, 1, 1, 1, 0, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1], // 9
];

/// Stamp a decimal label into the RGB buffer, clipping at the edges.
fn draw_label(
    rgb: &mut [u8],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    label: u32,
    color: [u8; 3],
) {
    let digits = decimal_digits(label);

    for (pos, &digit) in digits.iter().enumerate() {
        // One glyph column of padding between digits.
        let glyph_x = x + pos * 4 * LABEL_SCALE;
        for row in 0..5 {
            for col in 0..3 {
                if DIGITS[digit][row * 3 + col] == 0 {
                    continue;
                }
                for sy in 0..LABEL_SCALE {
                    for sx in 0..LABEL_SCALE {
                        let px = glyph_x + col * LABEL_SCALE + sx;
                        let py = y + row * LABEL_SCALE + sy;
                        if px < width && py < height {
                            let idx = (py * width + px) * 3;
                            rgb[idx..idx + 3].copy_from_slice(&color);
                        }
                    }
                }
            }
        }
    }
}

fn decimal_digits(mut n: u32) -> Vec<usize> {
    if n == 0 {
        return vec![0];
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push((n % 10) as usize);
        n /= 10;
    }
    digits.reverse();
    digits
}
