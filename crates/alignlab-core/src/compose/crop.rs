//! Region cropping: direct crops of the base and transform-aware crops
//! of moving images.
//!
//! A moving image is cropped in a single resampling pass: every output
//! pixel of the ROI-sized result is inverse-mapped through the image's
//! full-resolution transform into the moving image's own coordinates and
//! sampled there. This equals warping the whole image into the base frame
//! and then cropping, without materializing the intermediate, so batch
//! crops keep full-resolution quality and identical output dimensions.

use crate::geometry::{AffineTransform, RegionError, RegionOfInterest};
use crate::raster::{sample, Frame, SampleFilter};

/// Crop a frame with a plain rectangle. The region is validated against
/// the frame's own dimensions.
pub fn crop_frame(frame: &Frame, roi: &RegionOfInterest) -> Result<Frame, RegionError> {
    roi.validate(frame.width, frame.height)?;

    let mut out = Frame::black(roi.width, roi.height);
    for y in 0..roi.height {
        let src_row = frame.index(roi.x, roi.y + y);
        let dst_row = out.index(0, y);
        let len = roi.width as usize * 3;
        out.pixels[dst_row..dst_row + len]
            .copy_from_slice(&frame.pixels[src_row..src_row + len]);
    }
    Ok(out)
}

/// Crop a moving image through its full-resolution transform.
///
/// `roi` is in base-image coordinates and must already be validated
/// against the base dimensions; the output is always exactly
/// `roi.width` x `roi.height`. Output pixel `(u, v)` samples the moving
/// image at `T^-1 * (roi.x + u, roi.y + v)`; positions without coverage
/// are black.
pub fn crop_through(
    moving_full: &Frame,
    transform: &AffineTransform,
    roi: &RegionOfInterest,
) -> Frame {
    let Some(inv) = transform.invert() else {
        return Frame::black(roi.width, roi.height);
    };

    let mut out = Frame::black(roi.width, roi.height);
    for v in 0..roi.height {
        for u in 0..roi.width {
            let bx = (roi.x + u) as f64;
            let by = (roi.y + v) as f64;
            let (sx, sy) = inv.apply(bx, by);
            if let Some(pixel) = sample(moving_full, sx, sy, SampleFilter::Lanczos3) {
                out.set(u, v, pixel);
            }
        }
    }
    out
}


// ============================================================================
// Property-Based Tests
// ============================================================================
