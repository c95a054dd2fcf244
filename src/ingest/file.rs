use std::path::Path;

use image::ImageReader;

use crate::error::{LocatorError, Result};
use crate::frame::Frame;

/// Decode one image file into an RGB frame.
///
/// The format is sniffed from the file contents, so extensions don't matter.
pub fn load_image(path: impl AsRef<Path>) -> Result<Frame> {
    let path = path.as_ref();
    let reader = ImageReader::open(path)
        .map_err(|e| LocatorError::io(path, e))?
        .with_guessed_format()
        .map_err(|e| LocatorError::io(path, e))?;
    let image = reader.decode().map_err(|source| LocatorError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "decoded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Frame::from_rgb(image.into_rgb8()).ok_or_else(|| LocatorError::ImageDecode {
        path: path.to_path_buf(),
        source: image::ImageError::Limits(image::error::LimitError::from_kind(
            image::error::LimitErrorKind::DimensionError,
        )),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn decodes_png_regardless_of_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portrait.dat");
        RgbImage::from_pixel(32, 24, Rgb([10, 20, 30]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();

        let frame = load_image(&path).unwrap();
        assert_eq!((frame.width(), frame.height()), (32, 24));
        assert_eq!(frame.pixels().get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"definitely not pixels").unwrap();
        let err = load_image(&path).err().unwrap();
        assert!(matches!(err, LocatorError::ImageDecode { .. }));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_image("/no/such/image.jpg").err().unwrap();
        assert!(matches!(err, LocatorError::NotFound(_)));
    }
}
