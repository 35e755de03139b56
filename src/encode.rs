//! Writing palettes as palette strip images.

use crate::{EncodeError, EncodeErrorKind, Palette, PALETTE_LEN};
use image::{ImageFormat, Rgba, RgbaImage};
use std::{
    fs::File,
    io::{Cursor, Write},
    path::Path,
};

impl Palette {
    /// Creates the palette strip: a [`PALETTE_LEN`] wide and 1 pixel tall image
    /// where pixel `k` is color `k` of the palette.
    ///
    /// Channels are copied as is, without premultiplying alpha.
    #[must_use]
    pub fn to_rgba_image(&self) -> RgbaImage {
        let colors = self.to_arrays();
        #[allow(clippy::cast_possible_truncation)]
        RgbaImage::from_fn(PALETTE_LEN as u32, 1, |x, _| Rgba(colors[x as usize]))
    }

    /// Encodes the palette strip as PNG into memory.
    ///
    /// # Errors
    /// Returns an error if the PNG encoder fails.
    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut png = Vec::new();
        self.to_rgba_image()
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    /// Saves the palette strip as a PNG file at `path`.
    ///
    /// The file must not exist yet.
    ///
    /// # Errors
    /// Returns an [`EncodeError`] if the file already exists, cannot be created, or cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EncodeError> {
        let path = path.as_ref();
        let io_error = |e| EncodeError::new(path, EncodeErrorKind::Io(e));

        let png = self
            .to_png()
            .map_err(|e| EncodeError::new(path, EncodeErrorKind::Image(e)))?;

        let mut file = File::create_new(path).map_err(io_error)?;
        file.write_all(&png).map_err(io_error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{reduce, tests::*, ColorSet};
    use palette::Srgba;

    fn test_palette() -> Palette {
        reduce::palette(&ColorSet::new(&test_data_1024())).unwrap()
    }

    #[test]
    fn strip_matches_palette() {
        let palette = test_palette();
        let image = palette.to_rgba_image();
        assert_eq!(image.dimensions(), (8, 1));

        for (x, color) in palette.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let pixel = image.get_pixel(x as u32, 0);
            assert_eq!(pixel.0, [color.red, color.green, color.blue, color.alpha]);
        }
    }

    #[test]
    fn translucent_channels_unchanged() {
        let color = Srgba::new(200, 100, 50, 1);
        let palette = reduce::palette(&ColorSet::new(&[color])).unwrap();
        let image = palette.to_rgba_image();
        assert!(image.pixels().all(|p| p.0 == [200, 100, 50, 1]));
    }

    #[test]
    fn save_and_decode() {
        let dir = temp_dir("save_and_decode");
        let path = dir.join("palette.png");
        let palette = test_palette();
        palette.save(&path).unwrap();

        let decoded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(decoded, palette.to_rgba_image());
    }

    #[test]
    fn save_existing_fails() {
        let dir = temp_dir("save_existing_fails");
        let path = dir.join("palette.png");
        std::fs::write(&path, b"taken").unwrap();

        let err = test_palette().save(&path).unwrap_err();
        assert!(err.already_exists());
        assert_eq!(err.path(), path.as_path());
        assert_eq!(std::fs::read(&path).unwrap(), b"taken");
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = temp_dir("save_into_missing_directory_fails");
        let path = dir.join("missing").join("palette.png");

        let err = test_palette().save(&path).unwrap_err();
        assert!(!err.already_exists());
        assert!(matches!(err.kind(), EncodeErrorKind::Io(_)));
    }
}
