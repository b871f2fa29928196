use std::path::PathBuf;

/// Errors raised while loading or filtering a notebook.
///
/// Every variant carries a self-contained message: the tool boundary
/// renders errors as plain text for the caller, so nothing here relies
/// on a wrapping context to be understandable.
#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    /// The notebook file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file exists but is not a valid notebook document.
    #[error("invalid notebook document {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The notebook declares a major format version we do not read.
    #[error("unsupported nbformat version {found} in {} (expected {expected})", .path.display())]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    /// A rendered block header did not contain a parseable cell index.
    /// Should not occur for blocks produced by this crate.
    #[error("malformed block header: {0:?}")]
    MalformedHeader(String),
}
