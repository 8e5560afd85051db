//! End-to-end: synthetic dataset on disk, through metadata, TIFF decode,
//! stitch, render, and batch isolation.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tiff::encoder::{TiffEncoder, colortype::Gray8};

use dapi_stitcher::batch::{prepare_output_dir, run_batch, stitch_dataset};
use dapi_stitcher::config::{DatasetId, StitchConfig};

const METADATA: &str = r#"
<Properties>
  <Tile FieldX="0" PosX="0.0" PosY="0.0"/>
  <Tile FieldX="1" PosX="1.0" PosY="0.0"/>
  <Tile FieldX="2" PosX="0.0" PosY="1.0"/>
  <Tile FieldX="3" PosX="1.0" PosY="1.0"/>
</Properties>
"#;

fn temp_root(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dapi_stitcher_{tag}_{}", std::process::id()))
}

/// Write a 4-tile, 2-planes-per-tile grayscale stack; tile t projects to t+1.
fn write_stack(path: &Path) {
    let mut file = File::create(path).expect("create tif");
    let mut encoder = TiffEncoder::new(&mut file).expect("tiff encoder");
    for t in 0..4u8 {
        encoder
            .write_image::<Gray8>(10, 10, &[t; 100])
            .expect("write plane");
        encoder
            .write_image::<Gray8>(10, 10, &[t + 1; 100])
            .expect("write plane");
    }
}

fn write_dataset(config: &StitchConfig, dataset: &DatasetId) {
    let meta_path = config.metadata_path(dataset);
    fs::create_dir_all(meta_path.parent().expect("meta dir")).expect("create meta dir");
    fs::write(&meta_path, METADATA).expect("write metadata");
    write_stack(&config.stack_path(dataset));
}

fn test_config(root: &Path, samples: &[&str]) -> StitchConfig {
    StitchConfig {
        dataset_root: root.to_path_buf(),
        samples: samples.iter().map(|s| s.to_string()).collect(),
        batches: vec!["G1".to_string()],
        rounds: vec!["Round1".to_string()],
        tile_size: 10,
        overlap: 2,
        output_dir: root.join("out"),
        ..StitchConfig::default()
    }
}

#[test]
fn stitches_a_synthetic_dataset_from_disk() {
    let root = temp_root("e2e");
    let config = test_config(&root, &["JS36"]);
    let dataset = config.datasets().remove(0);
    write_dataset(&config, &dataset);
    prepare_output_dir(&config).expect("output dir");

    let out = stitch_dataset(&config, &dataset).expect("stitch_dataset failed");
    assert_eq!(
        out,
        root.join("out").join("JS36_G1_Round1_dapi_all_v3.png")
    );

    let preview = image::open(&out).expect("open preview").into_rgb8();
    // 2x2 grid of (10 - 2*2) effective tiles.
    assert_eq!((preview.width(), preview.height()), (12, 12));

    fs::remove_dir_all(&root).ok();
}

#[test]
fn one_missing_dataset_does_not_abort_the_batch() {
    let root = temp_root("isolation");
    let config = test_config(&root, &["JS36", "JS40"]);
    // Only JS36 exists on disk; JS40 must fail in isolation.
    write_dataset(&config, &config.datasets()[0]);
    prepare_output_dir(&config).expect("output dir");

    let summary = run_batch(&config);
    assert_eq!(summary.succeeded, vec!["JS36_G1_Round1".to_string()]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "JS40_G1_Round1");
    assert!(!summary.all_ok());

    assert!(
        root.join("out")
            .join("JS36_G1_Round1_dapi_all_v3.png")
            .exists()
    );

    fs::remove_dir_all(&root).ok();
}
