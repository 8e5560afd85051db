//! Multi-page grayscale TIFF stacks.
//!
//! A raw acquisition file holds `num_tiles * planes_per_tile` focal planes,
//! laid out contiguously in acquisition order: tile 0's z-planes first, then
//! tile 1's, and so on. Pages must all be 8-bit grayscale with identical
//! dimensions.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult, Limits};

use crate::error::StitchError;

/// An owned z-stack: `plane_count` pages of `width * height` bytes.
#[derive(Debug, Clone)]
pub struct TileStack {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl TileStack {
    /// Wrap a flat plane buffer, validating it holds whole pages.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, StitchError> {
        let page = width * height;
        if page == 0 || data.len() % page != 0 || data.is_empty() {
            return Err(StitchError::TruncatedStack {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn plane_count(&self) -> usize {
        self.data.len() / (self.width * self.height)
    }

    /// Borrow one page.
    pub fn plane(&self, index: usize) -> &[u8] {
        let page = self.width * self.height;
        &self.data[index * page..(index + 1) * page]
    }

    /// Planes per tile, validated for exact divisibility. Silent truncation
    /// here would misalign every tile after the first, so a remainder is a
    /// hard error.
    pub fn planes_per_tile(&self, num_tiles: usize) -> Result<usize, StitchError> {
        let planes = self.plane_count();
        if num_tiles == 0 || planes % num_tiles != 0 {
            return Err(StitchError::PlaneCountMismatch {
                planes,
                tiles: num_tiles,
            });
        }
        Ok(planes / num_tiles)
    }

    /// Per-pixel maximum across `count` planes starting at `first`.
    pub fn max_projection(&self, first: usize, count: usize) -> Vec<u8> {
        let mut out = self.plane(first).to_vec();
        for plane in first + 1..first + count {
            for (dst, &src) in out.iter_mut().zip(self.plane(plane)) {
                if src > *dst {
                    *dst = src;
                }
            }
        }
        out
    }
}

/// Decode every page of a grayscale TIFF into a [`TileStack`].
pub fn load_stack(path: &Path) -> Result<TileStack, StitchError> {
    let file = File::open(path).map_err(|source| StitchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut decoder = Decoder::new(BufReader::new(file))?.with_limits(Limits::unlimited());

    let mut width = 0usize;
    let mut height = 0usize;
    let mut data = Vec::new();
    let mut page = 0usize;

    loop {
        let (w, h) = decoder.dimensions()?;
        let (w, h) = (w as usize, h as usize);
        if page == 0 {
            width = w;
            height = h;
        } else if (w, h) != (width, height) {
            return Err(StitchError::PageSizeMismatch {
                path: path.to_path_buf(),
                page,
                got_width: w,
                got_height: h,
                want_width: width,
                want_height: height,
            });
        }

        if decoder.colortype()? != ColorType::Gray(8) {
            return Err(StitchError::UnsupportedPixelFormat {
                path: path.to_path_buf(),
            });
        }
        match decoder.read_image()? {
            DecodingResult::U8(planes) => data.extend_from_slice(&planes),
            _ => {
                return Err(StitchError::UnsupportedPixelFormat {
                    path: path.to_path_buf(),
                });
            }
        }

        page += 1;
        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
    }

    TileStack::new(width, height, data)
}
