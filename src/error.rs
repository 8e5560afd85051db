use std::path::PathBuf;

/// Errors produced while resolving, loading, stitching, or rendering a dataset.
///
/// The batch runner logs these per dataset and keeps going; nothing here is
/// recoverable within a single dataset.
#[derive(Debug, thiserror::Error)]
pub enum StitchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("XML metadata error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("no Tile elements found in metadata")]
    NoTiles,

    #[error("tile {tile}: missing attribute {attr}")]
    MissingAttribute { tile: String, attr: &'static str },

    #[error("tile {tile}: attribute {attr} has invalid value {value:?}")]
    BadAttribute {
        tile: String,
        attr: &'static str,
        value: String,
    },

    #[error("no Tile element with FieldX={field}")]
    MissingTile { field: u32 },

    #[error("TIFF decode error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("{path}: unsupported pixel format, expected 8-bit grayscale pages")]
    UnsupportedPixelFormat { path: PathBuf },

    #[error("{path}: page {page} is {got_width}x{got_height}, expected {want_width}x{want_height}")]
    PageSizeMismatch {
        path: PathBuf,
        page: usize,
        got_width: usize,
        got_height: usize,
        want_width: usize,
        want_height: usize,
    },

    #[error("plane buffer of {len} bytes is not a whole number of {width}x{height} pages")]
    TruncatedStack {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("{planes} planes cannot be divided evenly among {tiles} tiles")]
    PlaneCountMismatch { planes: usize, tiles: usize },

    #[error("tiles {first} and {second} share position ({x}, {y})")]
    DuplicatePosition {
        first: u32,
        second: u32,
        x: f64,
        y: f64,
    },

    #[error("tile {index}: position missing from the ranked coordinate set")]
    PositionLookup { index: u32 },

    #[error("grid is {rows}x{cols} but only {tiles} tiles are mapped")]
    GridCoverage {
        rows: usize,
        cols: usize,
        tiles: usize,
    },

    #[error("tile pages of {width}x{height} leave no content after cropping {overlap}px per edge")]
    TileTooSmall {
        width: usize,
        height: usize,
        overlap: usize,
    },

    #[error("tile position metadata is empty")]
    EmptyGrid,

    #[error("failed to render mosaic: {0}")]
    Render(String),

    #[error("failed to write {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
