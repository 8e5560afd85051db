use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use dapi_stitcher::batch::{prepare_output_dir, run_batch};
use dapi_stitcher::config::load_config;

#[derive(Parser, Debug)]
#[command(
    name = "stitch",
    about = "Stitch DAPI tile stacks into annotated mosaic previews",
    version
)]
struct Cli {
    /// JSON config with dataset root, identifier lists, and stitch parameters
    #[arg(short, long)]
    config: PathBuf,

    /// Override the configured output directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Disable the vertical flip applied before rendering
    #[arg(long)]
    no_flip: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();
    let mut config = load_config(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if cli.no_flip {
        config.flip_vertical = false;
    }

    if config.datasets().is_empty() {
        anyhow::bail!("config names no datasets (samples x batches x rounds is empty)");
    }

    prepare_output_dir(&config).context("creating output directory")?;
    let summary = run_batch(&config);

    println!(
        "stitched {} dataset(s), {} failed",
        summary.succeeded.len(),
        summary.failed.len()
    );
    for (label, err) in &summary.failed {
        eprintln!("  {label}: {err}");
    }
    if !summary.all_ok() {
        anyhow::bail!("{} dataset(s) failed", summary.failed.len());
    }
    Ok(())
}
