//! Crop the base and every moving image to a common region.

use std::path::PathBuf;

use alignlab_core::codec::load_frame;
use alignlab_core::{crop_aligned_all, crop_all, BatchReport, ImageSet, RegionOfInterest};

use crate::TransformArgs;

pub fn run(
    base: PathBuf,
    source: PathBuf,
    out_dir: PathBuf,
    roi: RegionOfInterest,
    aligned_dir: Option<PathBuf>,
    transform: &TransformArgs,
) -> anyhow::Result<()> {
    let report = if let Some(aligned_dir) = aligned_dir {
        // Aligned outputs already live in base coordinates; validate the
        // region against the base and crop plain rectangles.
        let base_frame = load_frame(&base)
            .map_err(|e| anyhow::anyhow!("Failed to load base image: {e}"))?;
        roi.validate(base_frame.width, base_frame.height)?;
        crop_aligned_all(&aligned_dir, &roi, &out_dir, &mut |done, total| {
            println!("[{done}/{total}] cropped");
        })?
    } else {
        let set = ImageSet::open(&base, &source, transform.preview_edge)
            .map_err(|e| anyhow::anyhow!("Failed to open image set: {e}"))?;
        let params = vec![transform.params(); set.len()];
        crop_all(&set, &params, &roi, &out_dir, &mut |done, total| {
            println!("[{done}/{total}] cropped");
        })?
    };

    summarize(&report, &roi, &out_dir);
    Ok(())
}

fn summarize(report: &BatchReport, roi: &RegionOfInterest, out_dir: &std::path::Path) {
    println!(
        "Cropped {} image(s) to {} in {}",
        report.written.len(),
        roi,
        out_dir.display()
    );
    for failure in &report.failures {
        eprintln!("Skipped {}: {}", failure.path.display(), failure.message);
    }
}
