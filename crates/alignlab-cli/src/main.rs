//! Alignlab CLI — Command-line interface for aligning and cropping image sets.
//!
//! Usage:
//!   alignlab info <SOURCE_DIR>                          List discovered images
//!   alignlab preview --base F --source D --out P        Render a comparison preview
//!   alignlab align --base F --source D --out-dir D      Render aligned images
//!   alignlab crop --base F --source D --out-dir D --roi X,Y,WxH
//!   alignlab score --base F --source D [--index N]      Score an alignment

use std::path::PathBuf;

use alignlab_core::{AlignmentParams, RegionOfInterest, DEFAULT_PREVIEW_EDGE};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "alignlab",
    about = "Manual image alignment and batch cropping",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Alignment parameters shared by the rendering subcommands.
#[derive(Args)]
struct TransformArgs {
    /// Horizontal offset in preview pixels
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    dx: f64,

    /// Vertical offset in preview pixels
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    dy: f64,

    /// Counter-clockwise rotation in degrees
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    rotation: f64,

    /// Uniform zoom factor
    #[arg(long, default_value = "1.0")]
    zoom: f64,

    /// Micro-zoom fine adjustment factor
    #[arg(long, default_value = "1.0")]
    micro_zoom: f64,

    /// Longest preview edge in pixels
    #[arg(long, default_value_t = DEFAULT_PREVIEW_EDGE)]
    preview_edge: u32,
}

impl TransformArgs {
    fn params(&self) -> AlignmentParams {
        AlignmentParams {
            dx: self.dx,
            dy: self.dy,
            rotation: self.rotation,
            zoom: self.zoom,
            micro_zoom: self.micro_zoom,
        }
        .clamped()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the images in a source directory
    Info {
        /// Source directory to scan
        source: PathBuf,

        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a comparison preview to a PNG
    Preview {
        /// Path to the base image
        #[arg(long)]
        base: PathBuf,

        /// Source directory of moving images
        #[arg(long)]
        source: PathBuf,

        /// Zero-based index of the moving image
        #[arg(long, default_value = "0")]
        index: usize,

        #[command(flatten)]
        transform: TransformArgs,

        /// Blend the warped image over the base instead of showing it on black
        #[arg(long)]
        overlay: bool,

        /// Overlay blend weight [0.0, 1.0]
        #[arg(long, default_value = "0.5")]
        alpha: f64,

        /// Grid spacing in preview pixels
        #[arg(long, default_value = "40")]
        grid_step: u32,

        /// Disable the reference grid
        #[arg(long)]
        no_grid: bool,

        /// Disable the warped corner outline
        #[arg(long)]
        no_outline: bool,

        /// Output PNG path
        #[arg(short, long, default_value = "preview.png")]
        out: PathBuf,
    },

    /// Render aligned full-resolution images into the base frame
    Align {
        /// Path to the base image
        #[arg(long)]
        base: PathBuf,

        /// Source directory of moving images
        #[arg(long)]
        source: PathBuf,

        /// Output directory for aligned PNGs
        #[arg(long)]
        out_dir: PathBuf,

        /// Align only the image at this index instead of the whole set
        #[arg(long)]
        index: Option<usize>,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Crop the base and every moving image to a common region
    Crop {
        /// Path to the base image
        #[arg(long)]
        base: PathBuf,

        /// Source directory of moving images
        #[arg(long)]
        source: PathBuf,

        /// Output directory for cropped PNGs
        #[arg(long)]
        out_dir: PathBuf,

        /// Region on the base image as X,Y,WxH (e.g. 100,100,400x300)
        #[arg(long)]
        roi: RegionOfInterest,

        /// Crop previously aligned outputs from this directory instead of
        /// resampling the source images
        #[arg(long)]
        aligned_dir: Option<PathBuf>,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Score how well one aligned image matches the base
    Score {
        /// Path to the base image
        #[arg(long)]
        base: PathBuf,

        /// Source directory of moving images
        #[arg(long)]
        source: PathBuf,

        /// Zero-based index of the moving image
        #[arg(long, default_value = "0")]
        index: usize,

        #[command(flatten)]
        transform: TransformArgs,

        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Info { source, json } => commands::info::run(source, json),
        Commands::Preview {
            base,
            source,
            index,
            transform,
            overlay,
            alpha,
            grid_step,
            no_grid,
            no_outline,
            out,
        } => commands::preview::run(
            base,
            source,
            index,
            &transform,
            overlay,
            alpha,
            grid_step,
            no_grid,
            no_outline,
            out,
        ),
        Commands::Align {
            base,
            source,
            out_dir,
            index,
            transform,
        } => commands::align::run(base, source, out_dir, index, &transform),
        Commands::Crop {
            base,
            source,
            out_dir,
            roi,
            aligned_dir,
            transform,
        } => commands::crop::run(base, source, out_dir, roi, aligned_dir, &transform),
        Commands::Score {
            base,
            source,
            index,
            transform,
            json,
        } => commands::score::run(base, source, index, &transform, json),
    }
}
