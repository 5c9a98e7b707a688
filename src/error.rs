use std::path::PathBuf;

use thiserror::Error;

/// Terminal failures for a single input file.
///
/// Malformed rows, failed derivations and out-of-range interpolation queries
/// are not represented here: those degrade completeness silently.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("No valid wavelength n k data found in {}", path.display())]
    NoValidData { path: PathBuf },

    #[error("No recognized electrical fields in {}", path.display())]
    NoRecognizedFields { path: PathBuf },

    #[error("Unsupported file format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    /// The file this error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            IngestError::NoValidData { path }
            | IngestError::NoRecognizedFields { path }
            | IngestError::UnsupportedFormat { path }
            | IngestError::Io { path, .. } => path,
        }
    }
}
