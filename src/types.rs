//! Contains the color and palette types needed across the crate.

use crate::PALETTE_LEN;
use palette::{cast, Srgba};
use std::{fmt::Display, ops::Deref};

/// Returns the brightness of a color: the plain sum of its four channels, alpha included.
///
/// This is the only ordering and distance metric used by the palette reducer.
/// No perceptual weighting is applied.
///
/// # Examples
/// ```
/// # use trim_palette::brightness;
/// # use palette::Srgba;
/// assert_eq!(brightness(Srgba::new(255, 255, 255, 255)), 1020);
/// assert_eq!(brightness(Srgba::new(10, 20, 30, 40)), 100);
/// ```
#[must_use]
pub fn brightness(color: Srgba<u8>) -> u16 {
    cast::into_array(color).into_iter().map(u16::from).sum()
}

/// The channels of a color as an `(R, G, B, A)` array.
///
/// Used as the total order for colors with equal [`brightness`].
#[inline]
pub(crate) fn components(color: Srgba<u8>) -> [u8; 4] {
    cast::into_array(color)
}

/// Formats the red, green, and blue channels of a color as an uppercase `#RRGGBB` string.
///
/// The alpha channel is ignored.
///
/// # Examples
/// ```
/// # use trim_palette::hex_rgb;
/// # use palette::Srgba;
/// assert_eq!(hex_rgb(Srgba::new(0x12, 0xAB, 0x05, 0x80)), "#12AB05");
/// ```
#[must_use]
pub fn hex_rgb(color: Srgba<u8>) -> String {
    let [r, g, b, _] = components(color);
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// A palette of exactly [`PALETTE_LEN`] colors, ordered from brightest to darkest.
///
/// The order is significant: color `k` becomes pixel `k` of the encoded palette strip.
///
/// Palettes are produced by [`reduce::palette`](crate::reduce::palette).
/// Note that the colors in a palette are not guaranteed to be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Palette([Srgba<u8>; PALETTE_LEN]);

impl Palette {
    /// Creates a [`Palette`] from the given colors without checking their order.
    pub(crate) const fn new_unchecked(colors: [Srgba<u8>; PALETTE_LEN]) -> Self {
        Self(colors)
    }

    /// Gets the inner array of colors.
    #[must_use]
    pub const fn into_inner(self) -> [Srgba<u8>; PALETTE_LEN] {
        self.0
    }

    /// Returns the colors of the palette as `(R, G, B, A)` arrays.
    #[must_use]
    pub fn to_arrays(&self) -> [[u8; 4]; PALETTE_LEN] {
        self.0.map(components)
    }
}

impl AsRef<[Srgba<u8>]> for Palette {
    fn as_ref(&self) -> &[Srgba<u8>] {
        self
    }
}

impl Deref for Palette {
    type Target = [Srgba<u8>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Palette> for [Srgba<u8>; PALETTE_LEN] {
    fn from(val: Palette) -> Self {
        val.0
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Srgba<u8>;
    type IntoIter = std::slice::Iter<'a, Srgba<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, &color) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            let [r, g, b, a] = components(color);
            write!(f, "#{r:02X}{g:02X}{b:02X}{a:02X}")?;
        }
        Ok(())
    }
}
