use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the analysis pipeline.
///
/// Problems with individual timing files are not errors: they are logged
/// and the file is skipped.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Plot rendering failed: {0}")]
    Plot(String),

    #[error("No timing data to analyze")]
    NoData,
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }
}
