//! Preview downscaling.
//!
//! The session works at one uniform preview scale: the base image's
//! longest edge fitted into a preview budget, with every moving image
//! downscaled by the same factor so preview-pixel translations mean the
//! same thing everywhere.

use thiserror::Error;

use super::frame::Frame;

/// Errors from frame resizing.
#[derive(Debug, Error)]
pub enum ResizeError {
    /// Target width or height is zero.
    #[error("invalid target dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The frame's buffer does not match its dimensions.
    #[error("frame buffer does not match its dimensions")]
    MalformedFrame,
}

/// Uniform scale that fits the longest edge into `max_edge` pixels.
/// Returns 1.0 when the image already fits.
pub fn fit_scale(width: u32, height: u32, max_edge: u32) -> f64 {
    let longest = width.max(height);
    if longest <= max_edge || longest == 0 {
        1.0
    } else {
        max_edge as f64 / longest as f64
    }
}

/// Preview dimensions for an image at the given uniform scale.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let w = (width as f64 * scale).round().max(1.0) as u32;
    let h = (height as f64 * scale).round().max(1.0) as u32;
    (w, h)
}

/// Resize a frame to exact dimensions with Lanczos3.
pub fn resize_frame(frame: &Frame, width: u32, height: u32) -> Result<Frame, ResizeError> {
    if width == 0 || height == 0 {
        return Err(ResizeError::InvalidDimensions { width, height });
    }
    if frame.width == width && frame.height == height {
        return Ok(frame.clone());
    }
    let rgb = frame.to_rgb_image().ok_or(ResizeError::MalformedFrame)?;
    let resized = image::imageops::resize(&rgb, width, height, image::imageops::FilterType::Lanczos3);
    Ok(Frame::from_rgb_image(resized))
}

/// Downscale a frame by the uniform preview scale.
pub fn preview_of(frame: &Frame, scale: f64) -> Result<Frame, ResizeError> {
    let (w, h) = scaled_dimensions(frame.width, frame.height, scale);
    resize_frame(frame, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_scale_identity_when_small() {
        assert_eq!(fit_scale(800, 600, 1600), 1.0);
        assert_eq!(fit_scale(1600, 1200, 1600), 1.0);
    }

    #[test]
    fn test_fit_scale_shrinks_longest_edge() {
        let s = fit_scale(3200, 2400, 1600);
        assert!((s - 0.5).abs() < 1e-12);
        let s = fit_scale(1000, 4000, 1600);
        assert!((s - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_fit_scale_zero_dims() {
        assert_eq!(fit_scale(0, 0, 1600), 1.0);
    }

    #[test]
    fn test_scaled_dimensions_round_and_floor_at_one() {
        assert_eq!(scaled_dimensions(1000, 800, 0.5), (500, 400));
        assert_eq!(scaled_dimensions(3, 3, 0.1), (1, 1));
    }

    #[test]
    fn test_resize_same_dims_is_clone() {
        let f = Frame::black(20, 10);
        let r = resize_frame(&f, 20, 10).unwrap();
        assert_eq!(r, f);
    }

    #[test]
    fn test_resize_to_target() {
        let f = Frame::black(40, 20);
        let r = resize_frame(&f, 10, 5).unwrap();
        assert_eq!((r.width, r.height), (10, 5));
        assert_eq!(r.pixels.len(), 10 * 5 * 3);
    }

    #[test]
    fn test_resize_zero_target_rejected() {
        let f = Frame::black(10, 10);
        assert!(matches!(
            resize_frame(&f, 0, 10),
            Err(ResizeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_preview_of_uses_uniform_scale() {
        let f = Frame::black(1000, 800);
        let p = preview_of(&f, 0.25).unwrap();
        assert_eq!((p.width, p.height), (250, 200));
    }
}
