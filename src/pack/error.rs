use std::{
    error::Error,
    fmt::Display,
    io,
    path::{Path, PathBuf},
};

/// An error that stops the generation of a whole pack.
///
/// Errors for individual textures are not [`PackError`]s: those items are skipped
/// and reported through [`Progress::skipped`](super::Progress::skipped).
#[derive(Debug)]
pub enum PackError {
    /// A file or directory could not be read, created, or written.
    Io {
        /// The file or directory.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// A JSON file could not be parsed or serialized.
    Json {
        /// The JSON file.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },
    /// The atlas definition has no source object at the configured index.
    MissingAtlasSource {
        /// The atlas definition.
        path: PathBuf,
        /// The index into the `sources` array.
        index: usize,
    },
    /// No display name could be found for an item in the vanilla language file.
    MissingTranslation {
        /// The last translation key that was tried.
        key: String,
    },
}

impl PackError {
    /// Creates a closure that wraps an [`io::Error`] for the given path.
    pub(crate) fn io(path: &Path) -> impl Fn(io::Error) -> Self + '_ {
        move |source| Self::Io { path: path.to_path_buf(), source }
    }

    /// Creates a closure that wraps a [`serde_json::Error`] for the given path.
    pub(crate) fn json(path: &Path) -> impl Fn(serde_json::Error) -> Self + '_ {
        move |source| Self::Json { path: path.to_path_buf(), source }
    }
}

impl Display for PackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackError::Io { path, .. } => write!(f, "failed to access {}", path.display()),
            PackError::Json { path, .. } => write!(f, "invalid JSON in {}", path.display()),
            PackError::MissingAtlasSource { path, index } => {
                write!(f, "{} has no source at index {index}", path.display())
            }
            PackError::MissingTranslation { key } => write!(f, "no translation for {key}"),
        }
    }
}

impl Error for PackError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PackError::Io { source, .. } => Some(source),
            PackError::Json { source, .. } => Some(source),
            PackError::MissingAtlasSource { .. } | PackError::MissingTranslation { .. } => None,
        }
    }
}
