//! Error taxonomy for the matrix pipeline.

use std::path::PathBuf;

use crate::polygon::PolygonId;

/// Errors raised while resolving inputs, assembling, or persisting the XY data.
#[derive(Debug, thiserror::Error)]
pub enum CoproError {
    /// A driver, year range, or path cannot be resolved from the configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The same polygon id was registered twice.
    #[error("duplicate polygon id {0} in registry")]
    DuplicatePolygon(PolygonId),

    /// Missing-value filtering left nothing to train on.
    #[error("no data: zero rows survived missing-value filtering ({dropped} of {total} rows dropped)")]
    NoData {
        /// Rows assembled before filtering.
        total: usize,
        /// Rows removed because at least one value was missing.
        dropped: usize,
    },

    /// An input file exists but its content cannot be interpreted.
    #[error("invalid input {}: {message}", path.display())]
    Input {
        /// Offending file.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },

    /// The XY file could not be written.
    #[error("failed to write {}: {message}", path.display())]
    Cache {
        /// Target file.
        path: PathBuf,
        /// Underlying failure, with its cause chain.
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Shapefile(#[from] shapefile::Error),

    #[error(transparent)]
    Polars(#[from] polars::error::PolarsError),
}

impl CoproError {
    pub(crate) fn input(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Input { path: path.into(), message: message.into() }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = CoproError> = std::result::Result<T, E>;
