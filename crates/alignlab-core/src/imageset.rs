//! The base image plus the moving images discovered from a source
//! directory, with previews decoded once at open time.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::codec::{discover_images, load_frame, LoadError};
use crate::raster::{fit_scale, preview_of, Frame, ResizeError};

/// Default longest preview edge in pixels.
pub const DEFAULT_PREVIEW_EDGE: u32 = 1600;

/// Errors from assembling an image set.
#[derive(Debug, Error)]
pub enum ImageSetError {
    /// The base image could not be loaded.
    #[error("failed to load base image: {0}")]
    Base(LoadError),

    /// The source directory could not be scanned.
    #[error("failed to scan source directory: {0}")]
    Scan(LoadError),

    /// Preview generation failed.
    #[error(transparent)]
    Resize(#[from] ResizeError),

    /// No file in the source directory decoded as an image.
    #[error("no readable images in {0}")]
    NoReadableImages(PathBuf),
}

/// One moving image: its path, full-resolution dimensions, and cached
/// preview at the session's uniform scale.
#[derive(Debug, Clone)]
pub struct MovingImage {
    pub path: PathBuf,
    pub full_width: u32,
    pub full_height: u32,
    pub preview: Frame,
}

impl MovingImage {
    /// File stem used for output naming, `image` when absent.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string())
    }
}

/// The base image plus the ordered moving images of one session.
///
/// The base is fixed for the session; moving images are the supported
/// files found recursively under the source directory, sorted
/// case-insensitively. Unreadable files are reported and skipped.
#[derive(Debug, Clone)]
pub struct ImageSet {
    pub base_path: PathBuf,
    pub base_width: u32,
    pub base_height: u32,
    pub base_preview: Frame,
    pub preview_scale: f64,
    pub images: Vec<MovingImage>,
}

impl ImageSet {
    /// Open a session: load the base, derive the uniform preview scale
    /// from its longest edge and `preview_edge`, then discover and
    /// preview every readable moving image under `source_dir`.
    pub fn open(
        base_path: &Path,
        source_dir: &Path,
        preview_edge: u32,
    ) -> Result<Self, ImageSetError> {
        let base = load_frame(base_path).map_err(ImageSetError::Base)?;
        let preview_scale = fit_scale(base.width, base.height, preview_edge);
        let base_preview = preview_of(&base, preview_scale)?;

        let files = discover_images(source_dir).map_err(ImageSetError::Scan)?;
        let mut images = Vec::with_capacity(files.len());
        for path in files {
            match load_frame(&path) {
                Ok(full) => {
                    let preview = preview_of(&full, preview_scale)?;
                    images.push(MovingImage {
                        path,
                        full_width: full.width,
                        full_height: full.height,
                        preview,
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable image");
                }
            }
        }
        if images.is_empty() {
            return Err(ImageSetError::NoReadableImages(source_dir.to_path_buf()));
        }

        info!(
            base = %base_path.display(),
            images = images.len(),
            preview_scale,
            "opened image set"
        );
        Ok(Self {
            base_path: base_path.to_path_buf(),
            base_width: base.width,
            base_height: base.height,
            base_preview,
            preview_scale,
            images,
        })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// File stem of the base image, `base` when absent.
    pub fn base_stem(&self) -> String {
        self.base_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "base".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::save_png;
    use std::fs;

    fn write_png(path: &Path, width: u32, height: u32) {
        let mut f = Frame::black(width, height);
        if width > 1 && height > 1 {
            f.set(1, 1, [120, 60, 30]);
        }
        save_png(&f, path).unwrap();
    }

    #[test]
    fn test_open_builds_previews_at_uniform_scale() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.png");
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        write_png(&base, 80, 40);
        write_png(&src.join("a.png"), 80, 40);
        write_png(&src.join("b.png"), 40, 20);

        let set = ImageSet::open(&base, &src, 40).unwrap();
        assert_eq!(set.preview_scale, 0.5);
        assert_eq!(
            (set.base_preview.width, set.base_preview.height),
            (40, 20)
        );
        assert_eq!(set.len(), 2);
        assert_eq!(
            (set.images[0].preview.width, set.images[0].preview.height),
            (40, 20)
        );
        // The smaller image is scaled by the same factor, not refit.
        assert_eq!(
            (set.images[1].preview.width, set.images[1].preview.height),
            (20, 10)
        );
        assert_eq!(set.images[1].full_width, 40);
    }

    #[test]
    fn test_open_scale_one_when_base_fits() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.png");
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        write_png(&base, 30, 20);
        write_png(&src.join("a.png"), 30, 20);

        let set = ImageSet::open(&base, &src, 1600).unwrap();
        assert_eq!(set.preview_scale, 1.0);
        assert_eq!(set.base_preview.width, 30);
    }

    #[test]
    fn test_open_skips_unreadable_and_keeps_rest() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.png");
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        write_png(&base, 20, 20);
        write_png(&src.join("good.png"), 20, 20);
        fs::write(src.join("bad.jpg"), b"not a jpeg").unwrap();

        let set = ImageSet::open(&base, &src, 1600).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.images[0].stem(), "good");
    }

    #[test]
    fn test_open_errors_when_nothing_readable() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.png");
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        write_png(&base, 20, 20);
        fs::write(src.join("bad.png"), b"garbage").unwrap();

        let result = ImageSet::open(&base, &src, 1600);
        assert!(matches!(result, Err(ImageSetError::NoReadableImages(_))));
    }

    #[test]
    fn test_open_errors_on_missing_base() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();

        let result = ImageSet::open(&dir.path().join("nope.png"), &src, 1600);
        assert!(matches!(result, Err(ImageSetError::Base(_))));
    }
}
