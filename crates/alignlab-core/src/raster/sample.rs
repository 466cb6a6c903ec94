//! Point sampling at fractional coordinates.
//!
//! Two filters: bilinear for interactive preview warps, Lanczos3 for
//! export-quality resampling. Both return `None` outside the valid
//! domain `[0, w-1] x [0, h-1]`, which is how warp loops decide coverage.
//!
//! The bilinear neighbor index clamps at the right/bottom edge so the
//! last row and column resolve to the edge texel; an identity warp must
//! reproduce the image exactly, including its final row and column.

use super::frame::Frame;

/// Interpolation filter for warp and crop resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleFilter {
    /// Fast bilinear interpolation - good for preview rendering.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation - good for export.
    Lanczos3,
}

/// True when `(x, y)` lies in the sampleable domain of the frame.
#[inline]
pub fn in_bounds(frame: &Frame, x: f64, y: f64) -> bool {
    x >= 0.0
        && y >= 0.0
        && x <= (frame.width.saturating_sub(1)) as f64
        && y <= (frame.height.saturating_sub(1)) as f64
        && !frame.is_empty()
}

/// Sample the frame at a fractional position with the given filter.
pub fn sample(frame: &Frame, x: f64, y: f64, filter: SampleFilter) -> Option<[u8; 3]> {
    match filter {
        SampleFilter::Bilinear => sample_bilinear(frame, x, y),
        SampleFilter::Lanczos3 => sample_lanczos3(frame, x, y),
    }
}

#[inline]
fn get_pixel_f64(frame: &Frame, px: u32, py: u32) -> [f64; 3] {
    let p = frame.get(px, py);
    [p[0] as f64, p[1] as f64, p[2] as f64]
}

/// Bilinear sample: the 4 nearest pixels weighted by distance.
pub fn sample_bilinear(frame: &Frame, x: f64, y: f64) -> Option<[u8; 3]> {
    if !in_bounds(frame, x, y) {
        return None;
    }

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(frame.width - 1);
    let y1 = (y0 + 1).min(frame.height - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(frame, x0, y0);
    let p10 = get_pixel_f64(frame, x1, y0);
    let p01 = get_pixel_f64(frame, x0, y1);
    let p11 = get_pixel_f64(frame, x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    Some(result)
}

/// Lanczos3 sample: a 6x6 windowed-sinc neighborhood, normalized by the
/// weight sum. Falls back to bilinear within the kernel radius of the
/// image border, where the full window is unavailable.
pub fn sample_lanczos3(frame: &Frame, x: f64, y: f64) -> Option<[u8; 3]> {
    if !in_bounds(frame, x, y) {
        return None;
    }

    let (w, h) = (frame.width as i64, frame.height as i64);
    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(frame, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            if px >= 0 && px < w && py >= 0 && py < h {
                let weight =
                    lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
                let pixel = get_pixel_f64(frame, px as u32, py as u32);
                sum[0] += pixel[0] * weight;
                sum[1] += pixel[1] * weight;
                sum[2] += pixel[2] * weight;
                weight_sum += weight;
            }
        }
    }

    let mut result = [0u8; 3];
    if weight_sum > 0.0 {
        for i in 0..3 {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }
    Some(result)
}

/// Lanczos kernel: `L(x) = sinc(x) * sinc(x/a)` for `|x| < a`, else 0.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }
    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
