//! Tile layout metadata from Leica-style `*_Properties.xml` files.
//!
//! Every `Tile` element carries a `FieldX` ordinal (0-based acquisition order)
//! and a `PosX`/`PosY` stage position in device units. Positions are kept
//! bit-exact from a single parse so the grid resolver can bucket identical
//! values without any rounding tolerance.

use std::fs;
use std::path::Path;

use crate::error::StitchError;

/// One tile's stage position as recorded by the microscope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePosition {
    /// 0-based acquisition ordinal (`FieldX` attribute).
    pub field: u32,
    pub pos_x: f64,
    pub pos_y: f64,
}

/// Parse tile positions from a metadata file on disk.
pub fn parse_tile_positions(path: &Path) -> Result<Vec<TilePosition>, StitchError> {
    let text = fs::read_to_string(path).map_err(|source| StitchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tile_positions_str(&text)
}

/// Parse tile positions from XML text.
///
/// Returns tiles sorted by `FieldX`, validated to be contiguous from 0: a gap
/// means the stack's plane layout cannot be trusted, so it is an error rather
/// than a hole to skip over.
pub fn parse_tile_positions_str(xml: &str) -> Result<Vec<TilePosition>, StitchError> {
    let doc = roxmltree::Document::parse(xml)?;

    let mut tiles = Vec::new();
    for (ordinal, node) in doc
        .descendants()
        .filter(|n| n.has_tag_name("Tile"))
        .enumerate()
    {
        let tile = tile_desc(&node, ordinal);
        let field: u32 = parse_attr(&node, &tile, "FieldX")?;
        let pos_x: f64 = parse_attr(&node, &tile, "PosX")?;
        let pos_y: f64 = parse_attr(&node, &tile, "PosY")?;
        tiles.push(TilePosition {
            field,
            pos_x,
            pos_y,
        });
    }

    if tiles.is_empty() {
        return Err(StitchError::NoTiles);
    }

    tiles.sort_by_key(|t| t.field);
    for (i, tile) in tiles.iter().enumerate() {
        if tile.field != i as u32 {
            return Err(StitchError::MissingTile { field: i as u32 });
        }
    }

    Ok(tiles)
}

/// Human-readable tile name for error messages: the `FieldX` value when
/// present, otherwise the element's position in document order.
fn tile_desc(node: &roxmltree::Node<'_, '_>, ordinal: usize) -> String {
    match node.attribute("FieldX") {
        Some(v) => format!("FieldX={v}"),
        None => format!("#{ordinal}"),
    }
}

fn parse_attr<T: std::str::FromStr>(
    node: &roxmltree::Node<'_, '_>,
    tile: &str,
    attr: &'static str,
) -> Result<T, StitchError> {
    let raw = node
        .attribute(attr)
        .ok_or_else(|| StitchError::MissingAttribute {
            tile: tile.to_string(),
            attr,
        })?;
    raw.trim().parse().map_err(|_| StitchError::BadAttribute {
        tile: tile.to_string(),
        attr,
        value: raw.to_string(),
    })
}
