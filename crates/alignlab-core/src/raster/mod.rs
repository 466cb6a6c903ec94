//! Pixel buffers and resampling primitives.

mod frame;
mod resize;
mod sample;

pub use frame::Frame;
pub use resize::{fit_scale, preview_of, resize_frame, scaled_dimensions, ResizeError};
pub use sample::{in_bounds, sample, sample_bilinear, sample_lanczos3, SampleFilter};
