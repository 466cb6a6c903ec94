//! Alignment quality metrics over the covered portion of the frame.
//!
//! All three component metrics run on normalized luminance and are
//! restricted to the coverage mask, so border pixels the moving image
//! never reaches cannot drag the score down.

use serde::Serialize;

use crate::raster::Frame;

const C1: f64 = 0.01 * 0.01;
const C2: f64 = 0.03 * 0.03;

// Pearson correlation over fewer samples than this is noise.
const MIN_CORR_SAMPLES: usize = 16;

// PSNR is normalized against this ceiling in dB.
const PSNR_CEILING_DB: f64 = 60.0;

/// Component metrics and their weighted combination, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignmentScore {
    /// Mean structural similarity over the mask.
    pub ssim: f64,
    /// Pearson correlation remapped from [-1, 1] to [0, 1].
    pub corr: f64,
    /// Peak signal-to-noise ratio normalized against 60 dB.
    pub psnr: f64,
    /// `0.60 * ssim + 0.25 * corr + 0.15 * psnr`.
    pub score: f64,
}

impl AlignmentScore {
    const ZERO: Self = Self {
        ssim: 0.0,
        corr: 0.0,
        psnr: 0.0,
        score: 0.0,
    };
}

/// Score how well `composed` matches `base` over the masked pixels.
///
/// The frames must share dimensions and the mask must have one entry per
/// pixel. An empty mask scores zero across the board.
pub fn score_alignment(base: &Frame, composed: &Frame, mask: &[bool]) -> AlignmentScore {
    debug_assert_eq!(
        (base.width, base.height),
        (composed.width, composed.height),
        "Frame dimensions must match"
    );
    debug_assert_eq!(mask.len(), base.pixel_count(), "Mask size mismatch");

    if !mask.iter().any(|&m| m) {
        return AlignmentScore::ZERO;
    }

    let x = luminance(base);
    let y = luminance(composed);
    let (w, h) = (base.width as usize, base.height as usize);

    let ssim = masked_ssim(&x, &y, w, h, mask);
    let corr = masked_corr(&x, &y, mask);
    let psnr = masked_psnr(&x, &y, mask);
    let score = (0.60 * ssim + 0.25 * corr + 0.15 * psnr).clamp(0.0, 1.0);

    AlignmentScore {
        ssim,
        corr,
        psnr,
        score,
    }
}

/// Rec. 601 luminance normalized to [0, 1].
fn luminance(frame: &Frame) -> Vec<f64> {
    frame
        .pixels
        .chunks_exact(3)
        .map(|px| {
            (0.299 * px[0] as f64 + 0.587 * px[1] as f64 + 0.114 * px[2] as f64) / 255.0
        })
        .collect()
}

/// Mean SSIM over the mask, Gaussian-windowed (11x11, sigma 1.5).
fn masked_ssim(x: &[f64], y: &[f64], w: usize, h: usize, mask: &[bool]) -> f64 {
    let mu_x = gaussian_blur(x, w, h);
    let mu_y = gaussian_blur(y, w, h);
    let xx = gaussian_blur(&elementwise(x, x), w, h);
    let yy = gaussian_blur(&elementwise(y, y), w, h);
    let xy = gaussian_blur(&elementwise(x, y), w, h);

    let mut sum = 0.0;
    let mut count = 0usize;
    for i in 0..x.len() {
        if !mask[i] {
            continue;
        }
        let (mx, my) = (mu_x[i], mu_y[i]);
        let var_x = (xx[i] - mx * mx).max(0.0);
        let var_y = (yy[i] - my * my).max(0.0);
        let cov = xy[i] - mx * my;
        let s = ((2.0 * mx * my + C1) * (2.0 * cov + C2))
            / ((mx * mx + my * my + C1) * (var_x + var_y + C2));
        sum += s;
        count += 1;
    }
    if count == 0 {
        return 0.0;
    }
    (sum / count as f64).clamp(0.0, 1.0)
}

/// Pearson correlation remapped to [0, 1]. Too few samples or a flat
/// signal scores zero.
fn masked_corr(x: &[f64], y: &[f64], mask: &[bool]) -> f64 {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for i in 0..x.len() {
        if mask[i] {
            xs.push(x[i]);
            ys.push(y[i]);
        }
    }
    let n = xs.len();
    if n < MIN_CORR_SAMPLES {
        return 0.0;
    }
    let nf = n as f64;
    let mean_x = xs.iter().sum::<f64>() / nf;
    let mean_y = ys.iter().sum::<f64>() / nf;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mean_x;
        let dy = ys[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return 0.0;
    }
    let r = (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0);
    (r + 1.0) / 2.0
}

/// PSNR over the mask, normalized against a 60 dB ceiling. A perfect
/// match saturates at 1.
fn masked_psnr(x: &[f64], y: &[f64], mask: &[bool]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for i in 0..x.len() {
        if mask[i] {
            let d = x[i] - y[i];
            sum += d * d;
            count += 1;
        }
    }
    if count == 0 {
        return 0.0;
    }
    let mse = sum / count as f64;
    if mse <= 1e-10 {
        return 1.0;
    }
    let db = -10.0 * mse.log10();
    (db / PSNR_CEILING_DB).clamp(0.0, 1.0)
}

fn elementwise(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b.iter()).map(|(&x, &y)| x * y).collect()
}

/// Separable Gaussian blur with clamped borders, 11-tap kernel.
fn gaussian_blur(src: &[f64], w: usize, h: usize) -> Vec<f64> {
    const RADIUS: i64 = 5;
    let kernel = gaussian_kernel();

    let mut horizontal = vec![0.0; src.len()];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sx = (x as i64 + k as i64 - RADIUS).clamp(0, w as i64 - 1) as usize;
                acc += weight * src[y * w + sx];
            }
            horizontal[y * w + x] = acc;
        }
    }

    let mut out = vec![0.0; src.len()];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = (y as i64 + k as i64 - RADIUS).clamp(0, h as i64 - 1) as usize;
                acc += weight * horizontal[sy * w + x];
            }
            out[y * w + x] = acc;
        }
    }
    out
}

fn gaussian_kernel() -> [f64; 11] {
    const SIGMA: f64 = 1.5;
    let mut kernel = [0.0; 11];
    let mut sum = 0.0;
    for (i, k) in kernel.iter_mut().enumerate() {
        let d = i as f64 - 5.0;
        *k = (-d * d / (2.0 * SIGMA * SIGMA)).exp();
        sum += *k;
    }
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_frame(width: u32, height: u32) -> Frame {
        let mut f = Frame::black(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 5 + y * 11) % 256) as u8;
                f.set(x, y, [v, v, v]);
            }
        }
        f
    }

    fn full_mask(frame: &Frame) -> Vec<bool> {
        vec![true; frame.pixel_count()]
    }

    #[test]
    fn test_identical_frames_score_near_one() {
        let f = gradient_frame(32, 32);
        let s = score_alignment(&f, &f, &full_mask(&f));
        assert!(s.ssim > 0.999, "ssim = {}", s.ssim);
        assert!(s.corr > 0.999, "corr = {}", s.corr);
        assert_eq!(s.psnr, 1.0);
        assert!(s.score > 0.999, "score = {}", s.score);
    }

    #[test]
    fn test_empty_mask_scores_zero() {
        let f = gradient_frame(16, 16);
        let mask = vec![false; f.pixel_count()];
        let s = score_alignment(&f, &f, &mask);
        assert_eq!(s, AlignmentScore::ZERO);
    }

    #[test]
    fn test_mismatched_frames_score_lower() {
        let a = gradient_frame(32, 32);
        let mut b = gradient_frame(32, 32);
        // Scramble half the frame.
        for y in 0..16 {
            for x in 0..32 {
                b.set(x, y, [255 - b.get(x, y)[0], 0, 128]);
            }
        }
        let matched = score_alignment(&a, &a, &full_mask(&a));
        let mismatched = score_alignment(&a, &b, &full_mask(&a));
        assert!(mismatched.score < matched.score);
        assert!(mismatched.psnr < 1.0);
    }

    #[test]
    fn test_flat_frames_have_zero_correlation() {
        let a = Frame::black(16, 16);
        let b = Frame::black(16, 16);
        let s = score_alignment(&a, &b, &full_mask(&a));
        assert_eq!(s.corr, 0.0);
        // Identical flat frames are still a perfect pixel match.
        assert_eq!(s.psnr, 1.0);
    }

    #[test]
    fn test_tiny_mask_zeroes_correlation() {
        let f = gradient_frame(16, 16);
        let mut mask = vec![false; f.pixel_count()];
        for m in mask.iter_mut().take(8) {
            *m = true;
        }
        let s = score_alignment(&f, &f, &mask);
        assert_eq!(s.corr, 0.0);
        assert_eq!(s.psnr, 1.0);
    }

    #[test]
    fn test_mask_excludes_mismatched_region() {
        let a = gradient_frame(32, 32);
        let mut b = gradient_frame(32, 32);
        // Corrupt the left half, then mask it out.
        for y in 0..32 {
            for x in 0..16 {
                b.set(x, y, [0, 0, 0]);
            }
        }
        let mut mask = vec![false; a.pixel_count()];
        for y in 0..32usize {
            for x in 16..32usize {
                mask[y * 32 + x] = true;
            }
        }
        let s = score_alignment(&a, &b, &mask);
        assert_eq!(s.psnr, 1.0);
        assert!(s.corr > 0.999);
    }

    #[test]
    fn test_score_is_weighted_combination() {
        let f = gradient_frame(24, 24);
        let s = score_alignment(&f, &f, &full_mask(&f));
        let expected = (0.60 * s.ssim + 0.25 * s.corr + 0.15 * s.psnr).clamp(0.0, 1.0);
        assert!((s.score - expected).abs() < 1e-12);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Every component and the combined score stay in [0, 1]
        /// for arbitrary frame contents and masks.
        #[test]
        fn prop_scores_bounded(
            pixels in proptest::collection::vec(any::<u8>(), 16 * 16 * 3),
            other in proptest::collection::vec(any::<u8>(), 16 * 16 * 3),
            mask in proptest::collection::vec(any::<bool>(), 16 * 16),
        ) {
            let a = Frame::new(16, 16, pixels);
            let b = Frame::new(16, 16, other);
            let s = score_alignment(&a, &b, &mask);
            for v in [s.ssim, s.corr, s.psnr, s.score] {
                prop_assert!((0.0..=1.0).contains(&v), "out of range: {}", v);
            }
        }
    }
}
