//! Region of interest selected on the base image.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when validating a region against image bounds.
#[derive(Debug, Error)]
pub enum RegionError {
    /// Width or height is zero.
    #[error("region is empty (width and height must be > 0)")]
    Empty,

    /// The region extends past the image edges.
    #[error("region {x},{y} {width}x{height} exceeds image bounds {image_width}x{image_height}")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },
}

/// Failed to parse a region from its `X,Y,WxH` text form.
#[derive(Debug, Error)]
#[error("invalid region syntax (expected X,Y,WxH): {0}")]
pub struct ParseRegionError(String);

/// A rectangle on the base image, propagated to every moving image when
/// batch cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    /// Left edge in base-image pixels.
    pub x: u32,
    /// Top edge in base-image pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RegionOfInterest {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a region from two drag corners in any order. Coordinates are
    /// rounded to whole pixels and clamped at zero.
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let left = x0.min(x1).max(0.0);
        let top = y0.min(y1).max(0.0);
        let right = x0.max(x1).max(0.0);
        let bottom = y0.max(y1).max(0.0);
        Self {
            x: left.round() as u32,
            y: top.round() as u32,
            width: (right - left).round() as u32,
            height: (bottom - top).round() as u32,
        }
    }

    /// Check the region is non-empty and lies inside an image of the given
    /// dimensions.
    pub fn validate(&self, image_width: u32, image_height: u32) -> Result<(), RegionError> {
        if self.width == 0 || self.height == 0 {
            return Err(RegionError::Empty);
        }
        let right = self.x as u64 + self.width as u64;
        let bottom = self.y as u64 + self.height as u64;
        if right > image_width as u64 || bottom > image_height as u64 {
            return Err(RegionError::OutOfBounds {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                image_width,
                image_height,
            });
        }
        Ok(())
    }
}

impl fmt::Display for RegionOfInterest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}x{}", self.x, self.y, self.width, self.height)
    }
}

impl FromStr for RegionOfInterest {
    type Err = ParseRegionError;

    /// Parse the `X,Y,WxH` form used on the command line, e.g. `100,100,400x300`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRegionError(s.to_string());
        let mut parts = s.split(',');
        let x = parts.next().ok_or_else(err)?.trim();
        let y = parts.next().ok_or_else(err)?.trim();
        let size = parts.next().ok_or_else(err)?.trim();
        if parts.next().is_some() {
            return Err(err());
        }
        let (w, h) = size.split_once(['x', 'X']).ok_or_else(err)?;
        Ok(Self {
            x: x.parse().map_err(|_| err())?,
            y: y.parse().map_err(|_| err())?,
            width: w.trim().parse().map_err(|_| err())?,
            height: h.trim().parse().map_err(|_| err())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes_order() {
        let a = RegionOfInterest::from_corners(500.0, 400.0, 100.0, 100.0);
        let b = RegionOfInterest::from_corners(100.0, 100.0, 500.0, 400.0);
        assert_eq!(a, b);
        assert_eq!(a, RegionOfInterest::new(100, 100, 400, 300));
    }

    #[test]
    fn test_from_corners_clamps_negative() {
        let r = RegionOfInterest::from_corners(-20.0, -10.0, 50.0, 30.0);
        assert_eq!(r.x, 0);
        assert_eq!(r.y, 0);
        assert_eq!(r.width, 50);
        assert_eq!(r.height, 30);
    }

    #[test]
    fn test_validate_inside_bounds() {
        let r = RegionOfInterest::new(100, 100, 400, 300);
        assert!(r.validate(1000, 800).is_ok());
        // Touching the far edges is still valid.
        assert!(RegionOfInterest::new(600, 500, 400, 300)
            .validate(1000, 800)
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        let r = RegionOfInterest::new(700, 100, 400, 300);
        assert!(matches!(
            r.validate(1000, 800),
            Err(RegionError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(matches!(
            RegionOfInterest::new(10, 10, 0, 5).validate(100, 100),
            Err(RegionError::Empty)
        ));
        assert!(matches!(
            RegionOfInterest::new(10, 10, 5, 0).validate(100, 100),
            Err(RegionError::Empty)
        ));
    }

    #[test]
    fn test_parse_round_trip() {
        let r: RegionOfInterest = "100,100,400x300".parse().unwrap();
        assert_eq!(r, RegionOfInterest::new(100, 100, 400, 300));
        assert_eq!(r.to_string().parse::<RegionOfInterest>().unwrap(), r);
    }

    #[test]
    fn test_parse_with_spaces() {
        let r: RegionOfInterest = " 5, 6, 7x8 ".parse().unwrap();
        assert_eq!(r, RegionOfInterest::new(5, 6, 7, 8));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("100,100".parse::<RegionOfInterest>().is_err());
        assert!("100,100,400".parse::<RegionOfInterest>().is_err());
        assert!("a,b,cxd".parse::<RegionOfInterest>().is_err());
        assert!("1,2,3x4,5".parse::<RegionOfInterest>().is_err());
    }
}
