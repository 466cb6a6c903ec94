//! Alignlab Core - Image alignment library
//!
//! This crate provides the core functionality for aligning image pairs
//! and batch-cropping aligned sets to a common region: affine transform
//! modeling, preview compositing, interactive session state, batch
//! rendering and cropping, and alignment quality metrics.

pub mod batch;
pub mod codec;
pub mod compose;
pub mod geometry;
pub mod imageset;
pub mod metrics;
pub mod raster;
pub mod session;

pub use batch::{
    crop_aligned_all, crop_all, save_aligned, save_aligned_all, BatchError, BatchFailure,
    BatchReport,
};
pub use codec::{LoadError, SaveError};
pub use compose::{
    compose_preview, coverage_mask, crop_frame, crop_through, warp_into, ViewOptions,
};
pub use geometry::{
    AffineTransform, AlignModel, AlignmentParams, RegionError, RegionOfInterest,
};
pub use imageset::{ImageSet, ImageSetError, MovingImage, DEFAULT_PREVIEW_EDGE};
pub use metrics::{score_alignment, AlignmentScore};
pub use raster::{Frame, SampleFilter};
pub use session::{Session, SessionEvent, StepSizes};
