//! Alignment parameters and the transform model derived from them.
//!
//! `AlignmentParams` is the explicit, passable state of one moving image:
//! translation in preview pixels, a small rotation, and a coarse zoom with
//! a fine micro-zoom multiplier. `AlignModel` binds a parameter set to a
//! moving image's full-resolution dimensions and the session's preview
//! scale, and derives the preview and full-resolution transforms from one
//! construction so the on-screen composite and the saved output can never
//! disagree.

use serde::{Deserialize, Serialize};

use super::affine::AffineTransform;

/// Translation, rotation, and zoom for one moving image.
///
/// Translation is expressed in preview pixels because that is the space the
/// user nudges in; the model divides by the preview scale when building the
/// full-resolution transform. Out-of-range values are clamped before any
/// transform is built, so a zero or negative zoom can never produce a
/// degenerate matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentParams {
    /// Horizontal translation in preview pixels.
    pub dx: f64,
    /// Vertical translation in preview pixels.
    pub dy: f64,
    /// Rotation in degrees, positive = counter-clockwise.
    pub rotation: f64,
    /// Coarse zoom factor.
    pub zoom: f64,
    /// Fine zoom multiplier layered on top of `zoom`.
    pub micro_zoom: f64,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            rotation: 0.0,
            zoom: 1.0,
            micro_zoom: 1.0,
        }
    }
}

impl AlignmentParams {
    /// Valid coarse zoom range.
    pub const ZOOM_RANGE: (f64, f64) = (0.8, 1.2);
    /// Valid micro-zoom range: fine corrections only.
    pub const MICRO_ZOOM_RANGE: (f64, f64) = (0.98, 1.02);
    /// Valid rotation range in degrees.
    pub const ROTATION_RANGE: (f64, f64) = (-45.0, 45.0);

    /// Identity parameters: no translation, rotation, or zoom.
    pub fn identity() -> Self {
        Self::default()
    }

    /// A copy with every field forced into its valid range.
    ///
    /// Non-finite values fall back to the identity value for that field;
    /// finite values clamp to the documented ranges.
    pub fn clamped(&self) -> Self {
        fn field(value: f64, fallback: f64) -> f64 {
            if value.is_finite() {
                value
            } else {
                fallback
            }
        }
        Self {
            dx: field(self.dx, 0.0),
            dy: field(self.dy, 0.0),
            rotation: field(self.rotation, 0.0)
                .clamp(Self::ROTATION_RANGE.0, Self::ROTATION_RANGE.1),
            zoom: field(self.zoom, 1.0).clamp(Self::ZOOM_RANGE.0, Self::ZOOM_RANGE.1),
            micro_zoom: field(self.micro_zoom, 1.0)
                .clamp(Self::MICRO_ZOOM_RANGE.0, Self::MICRO_ZOOM_RANGE.1),
        }
    }

    /// Combined zoom: coarse and micro compose multiplicatively.
    pub fn effective_zoom(&self) -> f64 {
        self.zoom * self.micro_zoom
    }

    /// True when applying these parameters leaves an image unchanged.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Binds clamped parameters to a moving image and the session preview
/// scale, deriving both resolution variants of the alignment transform.
///
/// The canonical construction is the full-resolution transform: rotation
/// and effective zoom about the moving image's center, plus a translation
/// of `(dx / s, dy / s)` where `s` is the preview scale. The preview
/// transform is the same matrix with its translation rescaled by `s`
/// (conjugation by a uniform scale leaves the linear part untouched), so
/// lifting the preview transform back to full resolution reproduces the
/// full transform exactly up to floating-point rounding.
#[derive(Debug, Clone, Copy)]
pub struct AlignModel {
    params: AlignmentParams,
    full_width: u32,
    full_height: u32,
    preview_scale: f64,
}

impl AlignModel {
    /// Bind `params` to a moving image of `full_width` x `full_height`
    /// pixels at the given preview scale. Parameters are clamped here; a
    /// non-positive or non-finite preview scale falls back to 1.0.
    pub fn new(
        params: &AlignmentParams,
        full_width: u32,
        full_height: u32,
        preview_scale: f64,
    ) -> Self {
        let preview_scale = if preview_scale.is_finite() && preview_scale > 0.0 {
            preview_scale
        } else {
            1.0
        };
        Self {
            params: params.clamped(),
            full_width,
            full_height,
            preview_scale,
        }
    }

    /// The clamped parameters the transforms are built from.
    pub fn params(&self) -> &AlignmentParams {
        &self.params
    }

    pub fn preview_scale(&self) -> f64 {
        self.preview_scale
    }

    /// Transform mapping the full-resolution moving image into the
    /// full-resolution base frame.
    pub fn full_transform(&self) -> AffineTransform {
        let cx = self.full_width as f64 / 2.0;
        let cy = self.full_height as f64 / 2.0;
        AffineTransform::rotation_scale_about(
            cx,
            cy,
            self.params.rotation,
            self.params.effective_zoom(),
        )
        .translated(
            self.params.dx / self.preview_scale,
            self.params.dy / self.preview_scale,
        )
    }

    /// Transform mapping the preview-resolution moving image into the
    /// preview-resolution base frame.
    pub fn preview_transform(&self) -> AffineTransform {
        self.full_transform()
            .with_translation_scaled(self.preview_scale)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
