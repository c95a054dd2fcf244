//! Decoded image handed to detector backends.

use image::{Rgb, RgbImage};

use crate::select::FrameDimensions;

/// One decoded image in 8-bit RGB.
///
/// Frames are built by `ingest` and dropped once their image is reported;
/// nothing is retained across images.
pub struct Frame {
    pixels: RgbImage,
}

impl Frame {
    /// Wrap decoded pixels. Returns `None` for an image with a zero side.
    pub fn from_rgb(pixels: RgbImage) -> Option<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return None;
        }
        Some(Self { pixels })
    }

    /// Black frame of the given size (at least 1x1).
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbImage::from_pixel(width.max(1), height.max(1), Rgb([0, 0, 0])),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> FrameDimensions {
        FrameDimensions {
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_image_is_not_a_frame() {
        assert!(Frame::from_rgb(RgbImage::new(0, 10)).is_none());
    }

    #[test]
    fn dimensions_follow_pixels() {
        let frame = Frame::from_rgb(RgbImage::new(640, 480)).unwrap();
        assert_eq!(
            frame.dimensions(),
            FrameDimensions::new(640, 480).unwrap()
        );
        assert_eq!(Frame::blank(0, 0).dimensions().width, 1);
    }
}
