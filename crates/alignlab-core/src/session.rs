//! The interactive editing session.
//!
//! `Session` owns the image set, a cursor over the moving images,
//! per-image alignment parameters, view options, and adjustment step
//! sizes. `SessionEvent` enumerates the discrete inputs a front end can
//! deliver; `apply` is the explicit event-to-parameter-update mapping,
//! so any GUI shell, the CLI, and the tests all drive the same state
//! machine.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compose::{compose_preview, ViewOptions};
use crate::geometry::{AlignModel, AlignmentParams};
use crate::imageset::{ImageSet, MovingImage};
use crate::raster::Frame;

/// Adjustment increments for the keyboard-driven micro-adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepSizes {
    /// Translation step in preview pixels.
    pub move_step: f64,
    /// Rotation step in degrees.
    pub rotate_step: f64,
    /// Coarse zoom step: zoom multiplies by `1 ± zoom_step`.
    pub zoom_step: f64,
    /// Micro-zoom step: micro-zoom multiplies by `1 ± micro_zoom_step`.
    pub micro_zoom_step: f64,
}

impl Default for StepSizes {
    fn default() -> Self {
        Self {
            move_step: 1.0,
            rotate_step: 0.10,
            zoom_step: 0.005,
            micro_zoom_step: 0.001,
        }
    }
}

impl StepSizes {
    /// Valid translation step range in preview pixels.
    pub const MOVE_STEP_RANGE: (f64, f64) = (0.5, 50.0);
    /// Valid rotation step range in degrees.
    pub const ROTATE_STEP_RANGE: (f64, f64) = (0.01, 5.0);
    /// Valid coarse zoom step range.
    pub const ZOOM_STEP_RANGE: (f64, f64) = (0.001, 0.05);
    /// Valid micro-zoom step range.
    pub const MICRO_ZOOM_STEP_RANGE: (f64, f64) = (0.0005, 0.02);
}

/// A discrete input event mapped onto session state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// Nudge the current image left by one move step.
    NudgeLeft,
    NudgeRight,
    NudgeUp,
    NudgeDown,
    /// Drag-style translation by an explicit preview-pixel delta.
    NudgeBy { dx: f64, dy: f64 },
    /// Rotate counter-clockwise by one rotate step.
    RotateCcw,
    RotateCw,
    /// Multiply coarse zoom by `1 + zoom_step`.
    ZoomIn,
    ZoomOut,
    /// Multiply micro-zoom by `1 + micro_zoom_step`.
    MicroZoomIn,
    MicroZoomOut,
    /// Grow the move step by 1 px (clamped).
    StepUp,
    /// Shrink the move step by 0.5 px (clamped).
    StepDown,
    /// Reset the current image's parameters to identity.
    Reset,
    NextImage,
    PrevImage,
    ToggleOverlay,
    ToggleGrid,
    ToggleOutline,
    SetAlpha(f64),
}

/// One interactive alignment session over an image set.
#[derive(Debug)]
pub struct Session {
    set: ImageSet,
    index: usize,
    params: Vec<AlignmentParams>,
    pub view: ViewOptions,
    pub steps: StepSizes,
}

impl Session {
    /// Start a session over an opened image set. Every moving image
    /// starts at identity parameters.
    pub fn new(set: ImageSet) -> Self {
        let params = vec![AlignmentParams::identity(); set.len()];
        Self {
            set,
            index: 0,
            params,
            view: ViewOptions::default(),
            steps: StepSizes::default(),
        }
    }

    pub fn set(&self) -> &ImageSet {
        &self.set
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move the cursor to `index`, clamped to the image range.
    pub fn select(&mut self, index: usize) {
        self.index = index.min(self.set.len().saturating_sub(1));
    }

    pub fn current(&self) -> &MovingImage {
        &self.set.images[self.index]
    }

    pub fn current_params(&self) -> &AlignmentParams {
        &self.params[self.index]
    }

    pub fn params(&self) -> &[AlignmentParams] {
        &self.params
    }

    /// Replace the current image's parameters wholesale, e.g. from CLI
    /// flags.
    pub fn set_current_params(&mut self, params: AlignmentParams) {
        self.params[self.index] = params.clamped();
    }

    /// The transform model for the image at `index`.
    pub fn model_for(&self, index: usize) -> AlignModel {
        let img = &self.set.images[index];
        AlignModel::new(
            &self.params[index],
            img.full_width,
            img.full_height,
            self.set.preview_scale,
        )
    }

    /// The transform model for the current image.
    pub fn model(&self) -> AlignModel {
        self.model_for(self.index)
    }

    /// Render the comparison view for the current image at preview
    /// resolution.
    pub fn compose(&self) -> Frame {
        compose_preview(
            &self.set.base_preview,
            &self.current().preview,
            &self.model().preview_transform(),
            &self.view,
        )
    }

    /// Apply one input event. Returns whether the view needs a redraw.
    pub fn apply(&mut self, event: SessionEvent) -> bool {
        use SessionEvent::*;
        match event {
            NudgeLeft => self.nudge(-self.steps.move_step, 0.0),
            NudgeRight => self.nudge(self.steps.move_step, 0.0),
            NudgeUp => self.nudge(0.0, -self.steps.move_step),
            NudgeDown => self.nudge(0.0, self.steps.move_step),
            NudgeBy { dx, dy } => self.nudge(dx, dy),
            RotateCcw => self.rotate(self.steps.rotate_step),
            RotateCw => self.rotate(-self.steps.rotate_step),
            ZoomIn => self.zoom_by(1.0 + self.steps.zoom_step),
            ZoomOut => self.zoom_by(1.0 - self.steps.zoom_step),
            MicroZoomIn => self.micro_zoom_by(1.0 + self.steps.micro_zoom_step),
            MicroZoomOut => self.micro_zoom_by(1.0 - self.steps.micro_zoom_step),
            StepUp => {
                let next = (self.steps.move_step + 1.0).min(StepSizes::MOVE_STEP_RANGE.1);
                let changed = next != self.steps.move_step;
                self.steps.move_step = next;
                changed
            }
            StepDown => {
                let next = (self.steps.move_step - 0.5).max(StepSizes::MOVE_STEP_RANGE.0);
                let changed = next != self.steps.move_step;
                self.steps.move_step = next;
                changed
            }
            Reset => {
                debug!(index = self.index, "reset alignment parameters");
                let changed = !self.params[self.index].is_identity();
                self.params[self.index] = AlignmentParams::identity();
                changed
            }
            NextImage => {
                if self.index + 1 < self.set.len() {
                    self.index += 1;
                    debug!(index = self.index, "next image");
                    true
                } else {
                    false
                }
            }
            PrevImage => {
                if self.index > 0 {
                    self.index -= 1;
                    debug!(index = self.index, "previous image");
                    true
                } else {
                    false
                }
            }
            ToggleOverlay => {
                self.view.overlay = !self.view.overlay;
                true
            }
            ToggleGrid => {
                self.view.grid = !self.view.grid;
                true
            }
            ToggleOutline => {
                self.view.outline = !self.view.outline;
                true
            }
            SetAlpha(alpha) => {
                let clamped = if alpha.is_finite() {
                    alpha.clamp(0.0, 1.0)
                } else {
                    self.view.alpha
                };
                let changed = clamped != self.view.alpha;
                self.view.alpha = clamped;
                changed
            }
        }
    }

    fn nudge(&mut self, dx: f64, dy: f64) -> bool {
        let p = &mut self.params[self.index];
        p.dx += dx;
        p.dy += dy;
        dx != 0.0 || dy != 0.0
    }

    fn rotate(&mut self, degrees: f64) -> bool {
        let p = &mut self.params[self.index];
        let next = (p.rotation + degrees).clamp(
            AlignmentParams::ROTATION_RANGE.0,
            AlignmentParams::ROTATION_RANGE.1,
        );
        let changed = next != p.rotation;
        p.rotation = next;
        changed
    }

    fn zoom_by(&mut self, factor: f64) -> bool {
        let p = &mut self.params[self.index];
        let next = (p.zoom * factor).clamp(
            AlignmentParams::ZOOM_RANGE.0,
            AlignmentParams::ZOOM_RANGE.1,
        );
        let changed = next != p.zoom;
        p.zoom = next;
        changed
    }

    fn micro_zoom_by(&mut self, factor: f64) -> bool {
        let p = &mut self.params[self.index];
        let next = (p.micro_zoom * factor).clamp(
            AlignmentParams::MICRO_ZOOM_RANGE.0,
            AlignmentParams::MICRO_ZOOM_RANGE.1,
        );
        let changed = next != p.micro_zoom;
        p.micro_zoom = next;
        changed
    }
}
