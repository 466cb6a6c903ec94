//! Owned RGB pixel buffer, the interchange type of the pipeline.

/// A decoded image: RGB8, row-major, 3 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length is width * height * 3.
    pub pixels: Vec<u8>,
}

impl Frame {
    /// Create a frame from an existing buffer.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// An all-black frame of the given dimensions.
    pub fn black(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 3],
        }
    }

    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an `image::RgbImage` for encoding or resizing.
    ///
    /// Returns `None` only if the buffer length does not match the
    /// dimensions, which a correctly constructed frame never hits.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Byte offset of the pixel at `(x, y)`.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Read the pixel at `(x, y)`. Caller guarantees bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.index(x, y);
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Write the pixel at `(x, y)`. Caller guarantees bounds.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = self.index(x, y);
        self.pixels[i] = rgb[0];
        self.pixels[i + 1] = rgb[1];
        self.pixels[i + 2] = rgb[2];
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_frame_dimensions() {
        let f = Frame::black(10, 4);
        assert_eq!(f.width, 10);
        assert_eq!(f.height, 4);
        assert_eq!(f.pixels.len(), 10 * 4 * 3);
        assert!(f.pixels.iter().all(|&b| b == 0));
        assert!(!f.is_empty());
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut f = Frame::black(5, 5);
        f.set(2, 3, [10, 20, 30]);
        assert_eq!(f.get(2, 3), [10, 20, 30]);
        assert_eq!(f.get(3, 2), [0, 0, 0]);
    }

    #[test]
    fn test_rgb_image_round_trip() {
        let mut f = Frame::black(3, 2);
        f.set(0, 0, [255, 0, 0]);
        f.set(2, 1, [0, 0, 255]);
        let img = f.to_rgb_image().unwrap();
        let back = Frame::from_rgb_image(img);
        assert_eq!(back, f);
    }

    #[test]
    fn test_empty_frame() {
        let f = Frame::black(0, 0);
        assert!(f.is_empty());
        assert_eq!(f.pixel_count(), 0);
    }
}
