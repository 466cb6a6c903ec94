//! Batch operations over an image set: rendering aligned full-resolution
//! images and cropping every image to a common region.
//!
//! Per-image failures inside a batch are recorded and skipped so one bad
//! file cannot abort a long run; structural problems (missing output
//! directory, invalid region, unreadable base) fail the whole operation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::codec::{load_frame, save_png, LoadError, SaveError};
use crate::compose::{crop_frame, crop_through, warp_into};
use crate::geometry::{AlignModel, AlignmentParams, RegionError, RegionOfInterest};
use crate::imageset::ImageSet;
use crate::raster::SampleFilter;

/// Errors that abort a batch operation outright.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The image set has no moving images.
    #[error("image set is empty")]
    EmptyImageSet,

    /// An image index outside the set was requested.
    #[error("image index {index} out of range (set has {len} images)")]
    IndexOutOfRange { index: usize, len: usize },

    /// One parameter set per moving image is required.
    #[error("expected {expected} parameter sets, got {actual}")]
    ParamsLengthMismatch { expected: usize, actual: usize },

    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The base image could not be reloaded at full resolution.
    #[error("failed to load base image: {0}")]
    Base(LoadError),

    /// A single requested image could not be loaded.
    #[error("failed to load image: {0}")]
    Load(LoadError),

    /// The crop region is invalid for the base image.
    #[error(transparent)]
    Region(#[from] RegionError),

    /// An output file could not be written.
    #[error(transparent)]
    Save(#[from] SaveError),

    /// The aligned directory held no PNG outputs to crop.
    #[error("no aligned outputs found in {0}")]
    NoAlignedOutputs(PathBuf),

    /// The aligned directory could not be read.
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One skipped item in a batch run.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub message: String,
}

/// What a batch run produced and what it skipped.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    fn record_failure(&mut self, path: &Path, message: String) {
        warn!(path = %path.display(), error = %message, "skipping image");
        self.failures.push(BatchFailure {
            path: path.to_path_buf(),
            message,
        });
    }
}

/// Progress callback: `(completed, total)` after each item, including
/// skipped ones.
pub type ProgressFn<'a> = &'a mut dyn FnMut(usize, usize);

fn ensure_out_dir(out_dir: &Path) -> Result<(), BatchError> {
    fs::create_dir_all(out_dir).map_err(|source| BatchError::OutputDir {
        path: out_dir.to_path_buf(),
        source,
    })
}

/// Render one moving image aligned into the base frame at full
/// resolution and save it as `<stem>.png` under `out_dir`.
pub fn save_aligned(
    set: &ImageSet,
    index: usize,
    params: &AlignmentParams,
    out_dir: &Path,
) -> Result<PathBuf, BatchError> {
    if set.is_empty() {
        return Err(BatchError::EmptyImageSet);
    }
    if index >= set.len() {
        return Err(BatchError::IndexOutOfRange {
            index,
            len: set.len(),
        });
    }
    ensure_out_dir(out_dir)?;

    let image = &set.images[index];
    let full = load_frame(&image.path).map_err(BatchError::Load)?;
    let model = AlignModel::new(params, full.width, full.height, set.preview_scale);
    let aligned = warp_into(
        &full,
        &model.full_transform(),
        set.base_width,
        set.base_height,
        SampleFilter::Lanczos3,
    );

    let out_path = out_dir.join(format!("{}.png", image.stem()));
    save_png(&aligned, &out_path)?;
    info!(path = %out_path.display(), "wrote aligned image");
    Ok(out_path)
}

/// Render every moving image aligned into the base frame at full
/// resolution. Unreadable images are skipped and reported.
pub fn save_aligned_all(
    set: &ImageSet,
    params: &[AlignmentParams],
    out_dir: &Path,
    progress: ProgressFn<'_>,
) -> Result<BatchReport, BatchError> {
    if set.is_empty() {
        return Err(BatchError::EmptyImageSet);
    }
    if params.len() != set.len() {
        return Err(BatchError::ParamsLengthMismatch {
            expected: set.len(),
            actual: params.len(),
        });
    }
    ensure_out_dir(out_dir)?;

    let total = set.len();
    let mut report = BatchReport::default();
    for (i, (image, p)) in set.images.iter().zip(params.iter()).enumerate() {
        match save_aligned(set, i, p, out_dir) {
            Ok(path) => report.written.push(path),
            Err(e) => report.record_failure(&image.path, e.to_string()),
        }
        progress(i + 1, total);
    }
    info!(
        written = report.written.len(),
        skipped = report.failures.len(),
        "aligned batch complete"
    );
    Ok(report)
}

/// Crop the base and every moving image to a common region.
///
/// The region is given in base-image coordinates and validated against
/// the base dimensions. The base is cropped directly; each moving image
/// is cropped through its full-resolution transform in one resampling
/// pass, so every output has exactly the region's dimensions.
pub fn crop_all(
    set: &ImageSet,
    params: &[AlignmentParams],
    roi: &RegionOfInterest,
    out_dir: &Path,
    progress: ProgressFn<'_>,
) -> Result<BatchReport, BatchError> {
    if set.is_empty() {
        return Err(BatchError::EmptyImageSet);
    }
    if params.len() != set.len() {
        return Err(BatchError::ParamsLengthMismatch {
            expected: set.len(),
            actual: params.len(),
        });
    }
    roi.validate(set.base_width, set.base_height)?;
    ensure_out_dir(out_dir)?;

    // Base plus moving images.
    let total = set.len() + 1;
    let mut report = BatchReport::default();

    let base_full = load_frame(&set.base_path).map_err(BatchError::Base)?;
    let base_crop = crop_frame(&base_full, roi)?;
    let base_out = out_dir.join(format!("{}.png", set.base_stem()));
    save_png(&base_crop, &base_out)?;
    report.written.push(base_out);
    progress(1, total);

    for (i, (image, p)) in set.images.iter().zip(params.iter()).enumerate() {
        match crop_one(set, image.path.as_path(), p, roi, out_dir) {
            Ok(path) => report.written.push(path),
            Err(e) => report.record_failure(&image.path, e.to_string()),
        }
        progress(i + 2, total);
    }
    info!(
        written = report.written.len(),
        skipped = report.failures.len(),
        roi = %roi,
        "crop batch complete"
    );
    Ok(report)
}

fn crop_one(
    set: &ImageSet,
    path: &Path,
    params: &AlignmentParams,
    roi: &RegionOfInterest,
    out_dir: &Path,
) -> Result<PathBuf, BatchError> {
    let full = load_frame(path).map_err(BatchError::Load)?;
    let model = AlignModel::new(params, full.width, full.height, set.preview_scale);
    let cropped = crop_through(&full, &model.full_transform(), roi);

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let out_path = out_dir.join(format!("{stem}.png"));
    save_png(&cropped, &out_path)?;
    Ok(out_path)
}

/// Crop previously rendered aligned outputs with a plain rectangle.
///
/// Aligned outputs already live in base-image coordinates, so no
/// transform is involved; every `*.png` directly inside `aligned_dir` is
/// cropped and written under `out_dir` with the same file name.
pub fn crop_aligned_all(
    aligned_dir: &Path,
    roi: &RegionOfInterest,
    out_dir: &Path,
    progress: ProgressFn<'_>,
) -> Result<BatchReport, BatchError> {
    let mut files: Vec<PathBuf> = fs::read_dir(aligned_dir)
        .map_err(|source| BatchError::ReadDir {
            path: aligned_dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("png"))
                    .unwrap_or(false)
        })
        .collect();
    files.sort_by_key(|p| p.to_string_lossy().to_lowercase());
    if files.is_empty() {
        return Err(BatchError::NoAlignedOutputs(aligned_dir.to_path_buf()));
    }
    ensure_out_dir(out_dir)?;

    let total = files.len();
    let mut report = BatchReport::default();
    for (i, path) in files.iter().enumerate() {
        match crop_aligned_one(path, roi, out_dir) {
            Ok(out_path) => report.written.push(out_path),
            Err(e) => report.record_failure(path, e.to_string()),
        }
        progress(i + 1, total);
    }
    info!(
        written = report.written.len(),
        skipped = report.failures.len(),
        "aligned-crop batch complete"
    );
    Ok(report)
}

fn crop_aligned_one(
    path: &Path,
    roi: &RegionOfInterest,
    out_dir: &Path,
) -> Result<PathBuf, BatchError> {
    let frame = load_frame(path).map_err(BatchError::Load)?;
    let cropped = crop_frame(&frame, roi)?;

    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.png".to_string());
    let out_path = out_dir.join(name);
    save_png(&cropped, &out_path)?;
    Ok(out_path)
}
