//! Render aligned full-resolution images into the base frame.

use std::path::PathBuf;

use alignlab_core::{save_aligned, save_aligned_all, ImageSet};

use crate::TransformArgs;

pub fn run(
    base: PathBuf,
    source: PathBuf,
    out_dir: PathBuf,
    index: Option<usize>,
    transform: &TransformArgs,
) -> anyhow::Result<()> {
    let set = ImageSet::open(&base, &source, transform.preview_edge)
        .map_err(|e| anyhow::anyhow!("Failed to open image set: {e}"))?;
    let params = transform.params();

    if let Some(index) = index {
        let path = save_aligned(&set, index, &params, &out_dir)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let all_params = vec![params; set.len()];
    let report = save_aligned_all(&set, &all_params, &out_dir, &mut |done, total| {
        println!("[{done}/{total}] aligned");
    })?;

    println!(
        "Aligned {} image(s) into {}",
        report.written.len(),
        out_dir.display()
    );
    for failure in &report.failures {
        eprintln!("Skipped {}: {}", failure.path.display(), failure.message);
    }
    Ok(())
}
