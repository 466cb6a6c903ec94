//! Score how well one aligned image matches the base.

use std::path::PathBuf;

use alignlab_core::{
    coverage_mask, score_alignment, warp_into, AlignModel, ImageSet, SampleFilter,
};

use crate::TransformArgs;

pub fn run(
    base: PathBuf,
    source: PathBuf,
    index: usize,
    transform: &TransformArgs,
    json: bool,
) -> anyhow::Result<()> {
    let set = ImageSet::open(&base, &source, transform.preview_edge)
        .map_err(|e| anyhow::anyhow!("Failed to open image set: {e}"))?;
    anyhow::ensure!(
        index < set.len(),
        "image index {index} out of range (set has {} images)",
        set.len()
    );

    let image = &set.images[index];
    let model = AlignModel::new(
        &transform.params(),
        image.full_width,
        image.full_height,
        set.preview_scale,
    );
    let t = model.preview_transform();
    let (pw, ph) = (set.base_preview.width, set.base_preview.height);

    let composed = warp_into(&image.preview, &t, pw, ph, SampleFilter::Bilinear);
    let mask = coverage_mask(image.preview.width, image.preview.height, &t, pw, ph);
    let score = score_alignment(&set.base_preview, &composed, &mask);

    if json {
        println!("{}", serde_json::to_string_pretty(&score)?);
        return Ok(());
    }

    println!("Alignment of {}:", image.path.display());
    println!("  SSIM:  {:.4}", score.ssim);
    println!("  Corr:  {:.4}", score.corr);
    println!("  PSNR:  {:.4}", score.psnr);
    println!("  Score: {:.4}", score.score);
    Ok(())
}
