//! Compositing: warps, preview rendering, and region crops.

mod crop;
mod preview;
mod warp;

pub use crop::{crop_frame, crop_through};
pub use preview::{compose_preview, ViewOptions};
pub use warp::{coverage_mask, warp_into};
