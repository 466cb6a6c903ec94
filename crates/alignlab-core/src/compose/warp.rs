//! Inverse-mapping affine warps.
//!
//! For every destination pixel the transform is inverted and the source
//! is sampled at the mapped position; pixels whose source position falls
//! outside the image are black. Coverage is that same geometric test,
//! exposed as a mask for overlay blending and metrics.

use crate::geometry::AffineTransform;
use crate::raster::{sample, Frame, SampleFilter};

/// Warp `src` through `transform` into a `dst_width` x `dst_height`
/// canvas. Out-of-coverage pixels are black.
pub fn warp_into(
    src: &Frame,
    transform: &AffineTransform,
    dst_width: u32,
    dst_height: u32,
    filter: SampleFilter,
) -> Frame {
    // A degenerate transform has no usable coverage.
    let Some(inv) = transform.invert() else {
        return Frame::black(dst_width, dst_height);
    };

    let mut out = Frame::black(dst_width, dst_height);
    for dst_y in 0..dst_height {
        for dst_x in 0..dst_width {
            let (sx, sy) = inv.apply(dst_x as f64, dst_y as f64);
            if let Some(pixel) = sample(src, sx, sy, filter) {
                out.set(dst_x, dst_y, pixel);
            }
        }
    }
    out
}

/// Per-pixel coverage of a warp: `true` where the inverse-mapped source
/// position of the destination pixel lands inside the source bounds.
/// Row-major, `dst_width * dst_height` entries.
pub fn coverage_mask(
    src_width: u32,
    src_height: u32,
    transform: &AffineTransform,
    dst_width: u32,
    dst_height: u32,
) -> Vec<bool> {
    let len = dst_width as usize * dst_height as usize;
    let Some(inv) = transform.invert() else {
        return vec![false; len];
    };

    let max_x = src_width.saturating_sub(1) as f64;
    let max_y = src_height.saturating_sub(1) as f64;
    let mut mask = vec![false; len];
    for dst_y in 0..dst_height {
        for dst_x in 0..dst_width {
            let (sx, sy) = inv.apply(dst_x as f64, dst_y as f64);
            if sx >= 0.0 && sx <= max_x && sy >= 0.0 && sy <= max_y {
                mask[dst_y as usize * dst_width as usize + dst_x as usize] = true;
            }
        }
    }
    mask
}
