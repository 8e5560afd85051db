use dapi_stitcher::StitchError;
use dapi_stitcher::grid::TileGrid;
use dapi_stitcher::metadata::TilePosition;
use dapi_stitcher::render::{blues, render_annotated};
use dapi_stitcher::stack::TileStack;
use dapi_stitcher::stitch::{StitchParams, stitch};

fn tile(field: u32, x: f64, y: f64) -> TilePosition {
    TilePosition {
        field,
        pos_x: x,
        pos_y: y,
    }
}

fn unit_grid_2x2() -> TileGrid {
    let tiles = [
        tile(0, 0.0, 0.0),
        tile(1, 1.0, 0.0),
        tile(2, 0.0, 1.0),
        tile(3, 1.0, 1.0),
    ];
    TileGrid::resolve(&tiles).expect("resolve failed")
}

/// 4 tiles of 10x10, two z-planes each. Tile t's projection is the constant
/// t+1 (one plane holds t, the other t+1, so the maximum is exercised too).
fn constant_stack() -> TileStack {
    let mut data = Vec::new();
    for t in 0..4u8 {
        data.extend(std::iter::repeat_n(t, 100));
        data.extend(std::iter::repeat_n(t + 1, 100));
    }
    TileStack::new(10, 10, data).expect("stack")
}

fn assert_block(
    mosaic: &dapi_stitcher::Mosaic,
    block_row: usize,
    block_col: usize,
    expected: u8,
) {
    for y in 0..6 {
        for x in 0..6 {
            let got = mosaic.pixel(block_col * 6 + x, block_row * 6 + y);
            assert_eq!(
                got, expected,
                "block ({block_row},{block_col}) at ({x},{y}): got {got}, want {expected}"
            );
        }
    }
}

#[test]
fn four_constant_tiles_stitch_into_flipped_quadrants() {
    let grid = unit_grid_2x2();
    let stack = constant_stack();
    let params = StitchParams {
        overlap: 2,
        flip_vertical: true,
    };

    let mosaic = stitch(&stack, &grid, &params).expect("stitch failed");
    assert_eq!((mosaic.width(), mosaic.height()), (12, 12));
    assert_eq!((mosaic.tile_width(), mosaic.tile_height()), (6, 6));

    // Grid rows [1|2] over [3|4]; the vertical flip puts [3|4] on top.
    assert_block(&mosaic, 0, 0, 3);
    assert_block(&mosaic, 0, 1, 4);
    assert_block(&mosaic, 1, 0, 1);
    assert_block(&mosaic, 1, 1, 2);
}

#[test]
fn without_flip_quadrants_follow_grid_order() {
    let mosaic = stitch(
        &constant_stack(),
        &unit_grid_2x2(),
        &StitchParams {
            overlap: 2,
            flip_vertical: false,
        },
    )
    .expect("stitch failed");

    assert_block(&mosaic, 0, 0, 1);
    assert_block(&mosaic, 0, 1, 2);
    assert_block(&mosaic, 1, 0, 3);
    assert_block(&mosaic, 1, 1, 4);
}

#[test]
fn cropping_discards_exactly_the_overlap_margin() {
    // One tile whose border ring is bright and interior dim: after a 2px
    // crop only interior values may remain.
    let grid = TileGrid::resolve(&[tile(0, 0.0, 0.0)]).expect("resolve failed");
    let mut data = vec![255u8; 100];
    for y in 2..8 {
        for x in 2..8 {
            data[y * 10 + x] = 7;
        }
    }
    let stack = TileStack::new(10, 10, data).expect("stack");
    let mosaic = stitch(
        &stack,
        &grid,
        &StitchParams {
            overlap: 2,
            flip_vertical: true,
        },
    )
    .expect("stitch failed");

    assert_eq!((mosaic.width(), mosaic.height()), (6, 6));
    assert!(mosaic.data().iter().all(|&v| v == 7));
}

#[test]
fn uneven_plane_count_fails_validation() {
    // 10 planes cannot be split across 4 tiles.
    let stack = TileStack::new(10, 10, vec![0; 100 * 10]).expect("stack");
    let err = stitch(
        &stack,
        &unit_grid_2x2(),
        &StitchParams {
            overlap: 2,
            flip_vertical: true,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        StitchError::PlaneCountMismatch {
            planes: 10,
            tiles: 4
        }
    ));
}

#[test]
fn sparse_grid_fails_coverage_check() {
    // 3 tiles spanning a 2x2 grid leave one cell empty.
    let tiles = [
        tile(0, 0.0, 0.0),
        tile(1, 1.0, 0.0),
        tile(2, 0.0, 1.0),
    ];
    let grid = TileGrid::resolve(&tiles).expect("resolve failed");
    let stack = TileStack::new(10, 10, vec![0; 100 * 3]).expect("stack");
    let err = stitch(
        &stack,
        &grid,
        &StitchParams {
            overlap: 2,
            flip_vertical: true,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        StitchError::GridCoverage {
            rows: 2,
            cols: 2,
            tiles: 3
        }
    ));
}

#[test]
fn overlap_consuming_whole_tile_is_rejected() {
    let grid = TileGrid::resolve(&[tile(0, 0.0, 0.0)]).expect("resolve failed");
    let stack = TileStack::new(4, 4, vec![0; 16]).expect("stack");
    let err = stitch(
        &stack,
        &grid,
        &StitchParams {
            overlap: 2,
            flip_vertical: true,
        },
    )
    .unwrap_err();
    assert!(matches!(err, StitchError::TileTooSmall { .. }));
}

#[test]
fn rendered_preview_has_mosaic_dimensions_and_colormap() {
    let grid = unit_grid_2x2();
    let mosaic = stitch(
        &constant_stack(),
        &grid,
        &StitchParams {
            overlap: 2,
            flip_vertical: true,
        },
    )
    .expect("stitch failed");

    let preview = render_annotated(&mosaic, &grid, 75).expect("render failed");
    assert_eq!((preview.width(), preview.height()), (12, 12));

    // Interior pixel of the flipped top-left block (constant 3).
    let px = preview.get_pixel(3, 3);
    assert_eq!(px.0, blues(3, 75));

    // Tile boundaries carry black grid lines.
    assert_eq!(preview.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(preview.get_pixel(6, 3).0, [0, 0, 0]);
    assert_eq!(preview.get_pixel(3, 6).0, [0, 0, 0]);
}
