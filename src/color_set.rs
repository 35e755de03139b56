//! Contains the code for extracting the unique visible colors of a texture.

use crate::types::components;
use palette::{cast, Srgba};
#[cfg(feature = "threads")]
use rayon::prelude::*;
use std::ops::Deref;
#[cfg(feature = "image")]
use {
    crate::DecodeError,
    image::RgbaImage,
    palette::cast::ComponentsAs,
    std::path::Path,
};

/// Packs a color into a `u32` whose ordering matches the `(R, G, B, A)` lexicographic ordering.
#[inline]
fn pack(color: Srgba<u8>) -> u32 {
    u32::from_be_bytes(components(color))
}

/// The inverse of [`pack`].
#[inline]
fn unpack(key: u32) -> Srgba<u8> {
    cast::from_array(key.to_be_bytes())
}

/// Returns the packed key of a color if the color is at least partially opaque.
#[inline]
fn visible_key(color: Srgba<u8>) -> Option<u32> {
    (color.alpha > 0).then(|| pack(color))
}

/// The set of unique colors with a non-zero alpha in a texture.
///
/// Fully transparent pixels are discarded, and each remaining color appears once.
/// The colors are stored sorted by their `(R, G, B, A)` components,
/// so the iteration order of a [`ColorSet`] does not depend on the order of the source pixels.
///
/// # Examples
/// ```
/// # use trim_palette::ColorSet;
/// # use palette::Srgba;
/// let pixels = [
///     Srgba::new(10, 20, 30, 255),
///     Srgba::new(0, 0, 0, 0),
///     Srgba::new(10, 20, 30, 255),
///     Srgba::new(1, 2, 3, 128),
/// ];
/// let colors = ColorSet::new(&pixels);
/// assert_eq!(colors.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorSet {
    /// The unique visible colors in increasing component order.
    colors: Vec<Srgba<u8>>,
}

impl ColorSet {
    /// Returns the slice of unique colors.
    #[must_use]
    pub fn colors(&self) -> &[Srgba<u8>] {
        &self.colors
    }

    /// Returns the number of unique colors.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_colors(&self) -> u32 {
        self.colors.len() as u32
    }

    /// Creates a new [`ColorSet`] from a slice of pixels.
    #[must_use]
    pub fn new(pixels: &[Srgba<u8>]) -> Self {
        pixels.iter().copied().collect()
    }

    /// Creates a new [`ColorSet`] from a slice of pixels in parallel.
    ///
    /// The result is identical to [`ColorSet::new`].
    #[must_use]
    #[cfg(feature = "threads")]
    pub fn new_par(pixels: &[Srgba<u8>]) -> Self {
        let mut keys = pixels
            .par_iter()
            .filter_map(|&color| visible_key(color))
            .collect::<Vec<_>>();
        keys.par_sort_unstable();
        keys.dedup();
        Self::from_sorted_keys(keys)
    }

    /// Unpacks sorted and deduplicated keys.
    fn from_sorted_keys(keys: Vec<u32>) -> Self {
        Self {
            colors: keys.into_iter().map(unpack).collect(),
        }
    }

    /// Returns the floor of the per-channel mean over all colors in the set.
    ///
    /// Every unique color counts once, regardless of how many pixels it covered.
    /// Returns `None` if the set is empty.
    ///
    /// # Examples
    /// ```
    /// # use trim_palette::ColorSet;
    /// # use palette::Srgba;
    /// let colors = ColorSet::new(&[Srgba::new(0, 0, 0, 255), Srgba::new(255, 255, 1, 255)]);
    /// assert_eq!(colors.average(), Some(Srgba::new(127, 127, 0, 255)));
    /// ```
    #[must_use]
    pub fn average(&self) -> Option<Srgba<u8>> {
        if self.colors.is_empty() {
            return None;
        }

        let mut sums = [0u64; 4];
        for &color in &self.colors {
            for (sum, c) in sums.iter_mut().zip(components(color)) {
                *sum += u64::from(c);
            }
        }

        let len = self.colors.len() as u64;
        #[allow(clippy::cast_possible_truncation)]
        let mean = sums.map(|sum| (sum / len) as u8);
        Some(cast::from_array(mean))
    }
}

#[cfg(feature = "image")]
impl ColorSet {
    /// The pixels of an image as a slice of colors.
    fn image_pixels(image: &RgbaImage) -> &[Srgba<u8>] {
        let pixels = image.pixels().len();
        let buf = &image.as_raw()[..(pixels * 4)];
        buf.components_as()
    }

    /// Creates a new [`ColorSet`] from the pixels of an [`RgbaImage`].
    #[must_use]
    pub fn from_rgba_image(image: &RgbaImage) -> Self {
        Self::new(Self::image_pixels(image))
    }

    /// Creates a new [`ColorSet`] from the pixels of an [`RgbaImage`] in parallel.
    #[must_use]
    #[cfg(feature = "threads")]
    pub fn from_rgba_image_par(image: &RgbaImage) -> Self {
        Self::new_par(Self::image_pixels(image))
    }

    /// Opens and decodes the image at the given path, and extracts its visible colors.
    ///
    /// Any format supported by the enabled `image` features is accepted
    /// and converted to 8-bit RGBA before extraction.
    ///
    /// # Errors
    /// Returns a [`DecodeError`] if the file cannot be opened or decoded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        Self::decode(path.as_ref()).map(|image| Self::from_rgba_image(&image))
    }

    /// Like [`ColorSet::open`], but extracts the colors in parallel.
    ///
    /// # Errors
    /// Returns a [`DecodeError`] if the file cannot be opened or decoded.
    #[cfg(feature = "threads")]
    pub fn open_par(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        Self::decode(path.as_ref()).map(|image| Self::from_rgba_image_par(&image))
    }

    /// Decodes the image at `path` as 8-bit RGBA.
    fn decode(path: &Path) -> Result<RgbaImage, DecodeError> {
        image::open(path)
            .map(image::DynamicImage::into_rgba8)
            .map_err(|e| DecodeError::new(path, e))
    }
}

impl Deref for ColorSet {
    type Target = [Srgba<u8>];

    fn deref(&self) -> &Self::Target {
        &self.colors
    }
}

impl AsRef<[Srgba<u8>]> for ColorSet {
    fn as_ref(&self) -> &[Srgba<u8>] {
        self
    }
}

impl FromIterator<Srgba<u8>> for ColorSet {
    fn from_iter<T: IntoIterator<Item = Srgba<u8>>>(iter: T) -> Self {
        let mut keys = iter.into_iter().filter_map(visible_key).collect::<Vec<_>>();
        keys.sort_unstable();
        keys.dedup();
        Self::from_sorted_keys(keys)
    }
}
