//! Error types for extracting, reducing, and encoding palettes.

use std::{error::Error, fmt::Display};
#[cfg(feature = "image")]
use std::{
    io,
    path::{Path, PathBuf},
};

/// An error type for when a palette is requested for a color set with no colors,
/// e.g., a texture where every pixel is fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EmptyColorSet;

impl Display for EmptyColorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "the color set has no colors with a non-zero alpha")
    }
}

impl Error for EmptyColorSet {}

/// An error type for when a texture could not be opened or decoded.
#[cfg(feature = "image")]
#[derive(Debug)]
pub struct DecodeError {
    /// The path of the texture.
    path: PathBuf,
    /// The underlying decoding error.
    source: image::ImageError,
}

#[cfg(feature = "image")]
impl DecodeError {
    pub(crate) fn new(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self { path: path.into(), source }
    }

    /// The path of the texture that failed to decode.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(feature = "image")]
impl Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to decode {}", self.path.display())
    }
}

#[cfg(feature = "image")]
impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// The cause of an [`EncodeError`].
#[cfg(feature = "image")]
#[derive(Debug)]
pub enum EncodeErrorKind {
    /// The destination could not be created, e.g., because it already exists.
    Io(io::Error),
    /// The image encoder failed.
    Image(image::ImageError),
}

/// An error type for when a palette strip could not be written.
#[cfg(feature = "image")]
#[derive(Debug)]
pub struct EncodeError {
    /// The destination path.
    path: PathBuf,
    /// What went wrong.
    kind: EncodeErrorKind,
}

#[cfg(feature = "image")]
impl EncodeError {
    pub(crate) fn new(path: impl Into<PathBuf>, kind: EncodeErrorKind) -> Self {
        Self { path: path.into(), kind }
    }

    /// The destination path that could not be written.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cause of the error.
    #[must_use]
    pub fn kind(&self) -> &EncodeErrorKind {
        &self.kind
    }

    /// Whether the destination already existed.
    #[must_use]
    pub fn already_exists(&self) -> bool {
        matches!(&self.kind, EncodeErrorKind::Io(e) if e.kind() == io::ErrorKind::AlreadyExists)
    }
}

#[cfg(feature = "image")]
impl Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.already_exists() {
            write!(f, "{} already exists", self.path.display())
        } else {
            write!(f, "failed to write {}", self.path.display())
        }
    }
}

#[cfg(feature = "image")]
impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            EncodeErrorKind::Io(e) => Some(e),
            EncodeErrorKind::Image(e) => Some(e),
        }
    }
}

/// Any error from the decode, reduce, and encode pipeline of a single texture.
#[cfg(feature = "image")]
#[derive(Debug)]
pub enum PaletteError {
    /// The texture could not be decoded.
    Decode(DecodeError),
    /// The texture has no visible pixels.
    EmptyColorSet(EmptyColorSet),
    /// The palette strip could not be written.
    Encode(EncodeError),
}

#[cfg(feature = "image")]
impl Display for PaletteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaletteError::Decode(e) => write!(f, "{e}"),
            PaletteError::EmptyColorSet(e) => write!(f, "{e}"),
            PaletteError::Encode(e) => write!(f, "{e}"),
        }
    }
}

#[cfg(feature = "image")]
impl Error for PaletteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PaletteError::Decode(e) => e.source(),
            PaletteError::EmptyColorSet(_) => None,
            PaletteError::Encode(e) => e.source(),
        }
    }
}

#[cfg(feature = "image")]
impl From<DecodeError> for PaletteError {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

#[cfg(feature = "image")]
impl From<EmptyColorSet> for PaletteError {
    fn from(value: EmptyColorSet) -> Self {
        Self::EmptyColorSet(value)
    }
}

#[cfg(feature = "image")]
impl From<EncodeError> for PaletteError {
    fn from(value: EncodeError) -> Self {
        Self::Encode(value)
    }
}
