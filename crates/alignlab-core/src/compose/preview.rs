//! Preview compositing: warped view, alpha overlay, grid, and outline.

use serde::{Deserialize, Serialize};

use crate::geometry::AffineTransform;
use crate::raster::{Frame, SampleFilter};

use super::warp::{coverage_mask, warp_into};

const GRID_GRAY: [u8; 3] = [128, 128, 128];
const OUTLINE_YELLOW: [u8; 3] = [255, 255, 0];

/// How the comparison view is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewOptions {
    /// Blend the warped moving image over the base instead of showing it
    /// on black.
    pub overlay: bool,
    /// Overlay blend weight in [0, 1]; 0 shows only the base.
    pub alpha: f64,
    /// Draw the reference grid.
    pub grid: bool,
    /// Grid spacing in preview pixels.
    pub grid_step: u32,
    /// Draw the warped image's corner outline.
    pub outline: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            overlay: false,
            alpha: 0.5,
            grid: true,
            grid_step: 40,
            outline: true,
        }
    }
}

impl ViewOptions {
    /// Valid grid spacing range in preview pixels.
    pub const GRID_STEP_RANGE: (u32, u32) = (5, 400);

    /// A copy with alpha and grid step forced into their valid ranges.
    pub fn clamped(&self) -> Self {
        Self {
            alpha: if self.alpha.is_finite() {
                self.alpha.clamp(0.0, 1.0)
            } else {
                0.5
            },
            grid_step: self
                .grid_step
                .clamp(Self::GRID_STEP_RANGE.0, Self::GRID_STEP_RANGE.1),
            ..*self
        }
    }
}

/// Render the comparison view at base-preview dimensions.
///
/// The moving preview is warped through the preview transform; in overlay
/// mode it is alpha-blended over the base only where the warp has
/// coverage, base pixels kept verbatim elsewhere. Plain mode shows the
/// warped image on black. Grid and outline are drawn on top.
pub fn compose_preview(
    base_preview: &Frame,
    moving_preview: &Frame,
    transform: &AffineTransform,
    options: &ViewOptions,
) -> Frame {
    let options = options.clamped();
    let (pw, ph) = (base_preview.width, base_preview.height);
    let warped = warp_into(moving_preview, transform, pw, ph, SampleFilter::Bilinear);

    let mut out = if options.overlay {
        let mask = coverage_mask(moving_preview.width, moving_preview.height, transform, pw, ph);
        blend_over(base_preview, &warped, &mask, options.alpha)
    } else {
        warped
    };

    if options.grid {
        draw_grid(&mut out, options.grid_step);
    }
    if options.outline {
        draw_outline(&mut out, moving_preview, transform);
    }
    out
}

/// Alpha-blend `warped` over `base` where the mask is set; elsewhere the
/// base pixel passes through untouched.
fn blend_over(base: &Frame, warped: &Frame, mask: &[bool], alpha: f64) -> Frame {
    debug_assert_eq!(mask.len(), base.pixel_count(), "Coverage mask size mismatch");
    let mut out = base.clone();
    for (i, &covered) in mask.iter().enumerate() {
        if !covered {
            continue;
        }
        let idx = i * 3;
        for c in 0..3 {
            let b = base.pixels[idx + c] as f64;
            let w = warped.pixels[idx + c] as f64;
            out.pixels[idx + c] = ((1.0 - alpha) * b + alpha * w).round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// 1-px gray lines every `step` pixels from the top-left origin.
fn draw_grid(frame: &mut Frame, step: u32) {
    let step = step.max(1);
    for x in (0..frame.width).step_by(step as usize) {
        for y in 0..frame.height {
            frame.set(x, y, GRID_GRAY);
        }
    }
    for y in (0..frame.height).step_by(step as usize) {
        for x in 0..frame.width {
            frame.set(x, y, GRID_GRAY);
        }
    }
}

/// The moving image's corner quadrilateral mapped through the transform,
/// drawn as 1-px yellow segments.
fn draw_outline(frame: &mut Frame, moving: &Frame, transform: &AffineTransform) {
    if moving.is_empty() {
        return;
    }
    let w = (moving.width - 1) as f64;
    let h = (moving.height - 1) as f64;
    let corners = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];
    let mapped: Vec<(i64, i64)> = corners
        .iter()
        .map(|&(x, y)| {
            let (tx, ty) = transform.apply(x, y);
            (tx.round() as i64, ty.round() as i64)
        })
        .collect();
    for i in 0..4 {
        let (x0, y0) = mapped[i];
        let (x1, y1) = mapped[(i + 1) % 4];
        draw_line(frame, x0, y0, x1, y1, OUTLINE_YELLOW);
    }
}

/// Bresenham segment clipped to the frame.
fn draw_line(frame: &mut Frame, x0: i64, y0: i64, x1: i64, y1: i64, color: [u8; 3]) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    loop {
        if x >= 0 && y >= 0 && (x as u64) < frame.width as u64 && (y as u64) < frame.height as u64 {
            frame.set(x as u32, y as u32, color);
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let mut f = Frame::black(width, height);
        for y in 0..height {
            for x in 0..width {
                f.set(x, y, rgb);
            }
        }
        f
    }

    fn no_decoration() -> ViewOptions {
        ViewOptions {
            overlay: false,
            alpha: 0.5,
            grid: false,
            grid_step: 40,
            outline: false,
        }
    }

    #[test]
    fn test_plain_mode_shows_warped_on_black() {
        let base = solid_frame(10, 10, [50, 50, 50]);
        let moving = solid_frame(10, 10, [200, 200, 200]);
        let t = AffineTransform::translation(5.0, 0.0);
        let out = compose_preview(&base, &moving, &t, &no_decoration());
        assert_eq!(out.get(0, 0), [0, 0, 0]);
        assert_eq!(out.get(7, 5), [200, 200, 200]);
    }

    #[test]
    fn test_overlay_alpha_zero_reproduces_base() {
        let base = solid_frame(12, 12, [40, 80, 120]);
        let moving = solid_frame(12, 12, [250, 250, 250]);
        let t = AffineTransform::translation(3.0, 2.0);
        let options = ViewOptions {
            overlay: true,
            alpha: 0.0,
            ..no_decoration()
        };
        let out = compose_preview(&base, &moving, &t, &options);
        assert_eq!(out, base);
    }

    #[test]
    fn test_overlay_alpha_one_replaces_covered_pixels() {
        let base = solid_frame(12, 12, [40, 80, 120]);
        let moving = solid_frame(12, 12, [250, 250, 250]);
        let t = AffineTransform::translation(3.0, 0.0);
        let options = ViewOptions {
            overlay: true,
            alpha: 1.0,
            ..no_decoration()
        };
        let out = compose_preview(&base, &moving, &t, &options);
        // Covered pixels take the warped value.
        assert_eq!(out.get(5, 5), [250, 250, 250]);
        // Uncovered pixels keep the base verbatim.
        assert_eq!(out.get(0, 5), [40, 80, 120]);
    }

    #[test]
    fn test_overlay_blends_midway() {
        let base = solid_frame(8, 8, [0, 0, 0]);
        let moving = solid_frame(8, 8, [200, 200, 200]);
        let options = ViewOptions {
            overlay: true,
            alpha: 0.5,
            ..no_decoration()
        };
        let out = compose_preview(&base, &moving, &AffineTransform::IDENTITY, &options);
        assert_eq!(out.get(4, 4), [100, 100, 100]);
    }

    #[test]
    fn test_grid_lines_at_step() {
        let base = solid_frame(20, 20, [10, 10, 10]);
        let moving = solid_frame(20, 20, [10, 10, 10]);
        let options = ViewOptions {
            grid: true,
            grid_step: 5,
            ..no_decoration()
        };
        let out = compose_preview(&base, &moving, &AffineTransform::IDENTITY, &options);
        assert_eq!(out.get(0, 3), GRID_GRAY);
        assert_eq!(out.get(5, 3), GRID_GRAY);
        assert_eq!(out.get(3, 10), GRID_GRAY);
        assert_eq!(out.get(3, 3), [10, 10, 10]);
    }

    #[test]
    fn test_outline_marks_corners() {
        let base = solid_frame(16, 16, [0, 0, 0]);
        let moving = solid_frame(16, 16, [30, 30, 30]);
        let options = ViewOptions {
            outline: true,
            ..no_decoration()
        };
        let out = compose_preview(&base, &moving, &AffineTransform::IDENTITY, &options);
        assert_eq!(out.get(0, 0), OUTLINE_YELLOW);
        assert_eq!(out.get(15, 15), OUTLINE_YELLOW);
        assert_eq!(out.get(8, 0), OUTLINE_YELLOW);
    }

    #[test]
    fn test_options_clamp() {
        let o = ViewOptions {
            alpha: 3.0,
            grid_step: 1,
            ..Default::default()
        };
        let c = o.clamped();
        assert_eq!(c.alpha, 1.0);
        assert_eq!(c.grid_step, ViewOptions::GRID_STEP_RANGE.0);
    }
}
