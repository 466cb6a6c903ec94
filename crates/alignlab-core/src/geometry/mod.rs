//! Alignment geometry: affine transforms, parameters, and regions.

mod affine;
mod model;
mod region;

pub use affine::AffineTransform;
pub use model::{AlignModel, AlignmentParams};
pub use region::{ParseRegionError, RegionError, RegionOfInterest};
