//! Render a comparison preview to a PNG.

use std::path::PathBuf;

use alignlab_core::codec::save_png;
use alignlab_core::{ImageSet, Session, ViewOptions};

use crate::TransformArgs;

#[allow(clippy::too_many_arguments)]
pub fn run(
    base: PathBuf,
    source: PathBuf,
    index: usize,
    transform: &TransformArgs,
    overlay: bool,
    alpha: f64,
    grid_step: u32,
    no_grid: bool,
    no_outline: bool,
    out: PathBuf,
) -> anyhow::Result<()> {
    let set = ImageSet::open(&base, &source, transform.preview_edge)
        .map_err(|e| anyhow::anyhow!("Failed to open image set: {e}"))?;
    anyhow::ensure!(
        index < set.len(),
        "image index {index} out of range (set has {} images)",
        set.len()
    );

    let mut session = Session::new(set);
    session.select(index);
    session.set_current_params(transform.params());
    session.view = ViewOptions {
        overlay,
        alpha,
        grid: !no_grid,
        grid_step,
        outline: !no_outline,
    }
    .clamped();

    let frame = session.compose();
    save_png(&frame, &out)?;

    println!(
        "Preview of {} written to {} ({}x{})",
        session.current().path.display(),
        out.display(),
        frame.width,
        frame.height
    );
    Ok(())
}
