//! List the images in a source directory.

use std::path::PathBuf;

use alignlab_core::codec::{discover_images, load_frame};
use serde::Serialize;

#[derive(Serialize)]
struct ImageInfo {
    path: String,
    width: u32,
    height: u32,
}

pub fn run(source: PathBuf, json: bool) -> anyhow::Result<()> {
    let files = discover_images(&source)
        .map_err(|e| anyhow::anyhow!("Failed to scan {}: {e}", source.display()))?;

    let mut infos = Vec::new();
    let mut skipped = 0usize;
    for path in files {
        match load_frame(&path) {
            Ok(frame) => infos.push(ImageInfo {
                path: path.display().to_string(),
                width: frame.width,
                height: frame.height,
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable image");
                skipped += 1;
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    println!("Source: {}", source.display());
    println!("  Images: {}", infos.len());
    if skipped > 0 {
        println!("  Skipped: {skipped}");
    }
    for info in &infos {
        println!("  {} ({}x{})", info.path, info.width, info.height);
    }

    Ok(())
}
