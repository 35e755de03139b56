//! A library for reducing the colors of a texture to a small, ordered palette strip.
//!
//! `trim_palette` turns the visible colors of a texture into exactly [`PALETTE_LEN`] colors,
//! ordered from brightest to darkest, and writes them as a `8x1` image.
//! Such palette strips drive palette-swapped textures like armor trim materials.
//!
//! The pipeline for a texture has three steps:
//! 1. [`ColorSet`] extracts the unique colors with a non-zero alpha.
//! 2. [`reduce::palette`] merges or splits those colors down or up to [`PALETTE_LEN`] colors.
//!    Colors are compared by the plain sum of their channels; there is no perceptual weighting.
//! 3. [`Palette::save`] writes the palette strip as a PNG.
//!
//! ```no_run
//! # use trim_palette::{reduce, ColorSet};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let colors = ColorSet::open("textures/item/diamond.png")?;
//! let palette = reduce::palette(&colors)?;
//! palette.save("color_palettes/diamond.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//! - `threads`: exposes parallel color extraction and parallel pack generation via [`rayon`].
//! - `image`: enables decoding textures and encoding palette strips with the [`image`] crate.
//! - `pack`: exposes the [`pack`] module for generating resource packs and data packs.
//! - `cli`: builds the `trim_palette` command line tool.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::wildcard_imports
)]

mod color_set;
mod error;
mod types;

#[cfg(feature = "image")]
mod encode;

pub mod reduce;

#[cfg(feature = "pack")]
pub mod pack;

pub use color_set::*;
pub use error::*;
pub use types::*;

#[cfg(feature = "image")]
use std::path::Path;

/// The number of colors in a [`Palette`].
pub const PALETTE_LEN: usize = 8;

/// Opens the texture at `path` and computes its palette.
///
/// # Errors
/// Returns an error if the texture cannot be decoded or has no visible pixels.
#[cfg(feature = "image")]
pub fn palette_from_path(path: impl AsRef<Path>) -> Result<Palette, PaletteError> {
    let colors = ColorSet::open(path)?;
    Ok(reduce::palette(&colors)?)
}

/// Opens the texture at `texture`, computes its palette, and saves the palette strip to `output`.
///
/// Returns the palette that was written.
///
/// # Errors
/// Returns an error if the texture cannot be decoded, has no visible pixels,
/// or if `output` already exists or cannot be written.
#[cfg(feature = "image")]
pub fn write_palette(
    texture: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<Palette, PaletteError> {
    let palette = palette_from_path(texture)?;
    palette.save(output)?;
    Ok(palette)
}
