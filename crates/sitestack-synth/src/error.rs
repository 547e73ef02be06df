//! Synthesis error types.

use std::path::PathBuf;

use sitestack_template::TemplateError;

/// Errors raised while staging assets, building the stack, or writing the
/// cloud assembly.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    /// The asset directory does not exist or is not a directory.
    #[error("cannot find asset directory at {}", path.display())]
    AssetNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A Lambda handler bundle directory is missing or empty.
    #[error("handler bundle {name} not found at {}", path.display())]
    HandlerBundleMissing {
        /// Bundle name.
        name: &'static str,
        /// Where it was expected.
        path: PathBuf,
    },

    /// Filesystem I/O failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the asset archive failed.
    #[error("failed to package asset: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The template could not be assembled.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A manifest could not be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SynthError {
    /// Wrap an I/O error with the path it concerns.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience result type for synthesis.
pub type SynthResult<T> = Result<T, SynthError>;
