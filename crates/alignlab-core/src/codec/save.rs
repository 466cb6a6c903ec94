//! PNG encoding for aligned and cropped outputs.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::raster::Frame;

/// Errors that can occur while writing output images.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Pixel data length doesn't match the frame dimensions.
    #[error("invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero.
    #[error("invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),

    /// I/O error writing the output file.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Encode a frame to PNG bytes.
pub fn encode_png(frame: &Frame) -> Result<Vec<u8>, SaveError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(SaveError::InvalidDimensions {
            width: frame.width,
            height: frame.height,
        });
    }
    let expected = frame.width as usize * frame.height as usize * 3;
    if frame.pixels.len() != expected {
        return Err(SaveError::InvalidPixelData {
            expected,
            actual: frame.pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(
            &frame.pixels,
            frame.width,
            frame.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| SaveError::EncodingFailed(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Encode a frame and write it to `path` as PNG.
pub fn save_png(frame: &Frame, path: &Path) -> Result<(), SaveError> {
    let bytes = encode_png(frame)?;
    fs::write(path, bytes).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_magic_bytes() {
        let f = Frame::black(10, 10);
        let bytes = encode_png(&f).unwrap();
        assert_eq!(&bytes[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_rejects_zero_dimensions() {
        let f = Frame {
            width: 0,
            height: 10,
            pixels: vec![],
        };
        assert!(matches!(
            encode_png(&f),
            Err(SaveError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_encode_rejects_mismatched_buffer() {
        let f = Frame {
            width: 10,
            height: 10,
            pixels: vec![0u8; 10],
        };
        assert!(matches!(
            encode_png(&f),
            Err(SaveError::InvalidPixelData { .. })
        ));
    }

    #[test]
    fn test_save_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut f = Frame::black(4, 3);
        f.set(0, 0, [1, 2, 3]);
        save_png(&f, &path).unwrap();

        let loaded = crate::codec::load_frame(&path).unwrap();
        assert_eq!(loaded, f);
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let f = Frame::black(2, 2);
        let result = save_png(&f, Path::new("/nonexistent/dir/out.png"));
        assert!(matches!(result, Err(SaveError::Io { .. })));
    }
}
