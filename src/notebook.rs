use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::NotebookError;

/// Major schema version of the notebook interchange format we read.
pub const NBFORMAT_MAJOR: u32 = 4;

/// An in-memory notebook document: an ordered sequence of cells.
///
/// Loaded once per tool invocation and dropped when the response is
/// built; nothing is cached across requests.
#[derive(Debug, Deserialize)]
pub struct Notebook {
    pub nbformat: u32,
    #[serde(default)]
    pub nbformat_minor: u32,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

/// One notebook cell. A cell has no stored index; its identity is its
/// position in [`Notebook::cells`].
///
/// Cell kinds we do not render (e.g. `raw`) deserialize to [`Cell::Other`]
/// rather than failing the whole document.
#[derive(Debug, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    Markdown {
        #[serde(default)]
        source: SourceText,
    },
    Code {
        #[serde(default)]
        source: SourceText,
        #[serde(default)]
        execution_count: Option<i64>,
        #[serde(default)]
        outputs: Vec<Output>,
    },
    #[serde(other)]
    Other,
}

/// One captured output of a code cell.
#[derive(Debug, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    Stream {
        #[serde(default)]
        text: SourceText,
    },
    ExecuteResult {
        #[serde(default)]
        data: MimeBundle,
    },
    DisplayData {
        #[serde(default)]
        data: MimeBundle,
    },
    Error {
        #[serde(default)]
        ename: String,
        #[serde(default)]
        evalue: String,
        #[serde(default)]
        traceback: Vec<String>,
    },
    #[serde(other)]
    Other,
}

/// Rich output payload: MIME type → value. Values are kept as raw JSON
/// since only `text/plain` entries are consumed downstream.
pub type MimeBundle = BTreeMap<String, serde_json::Value>;

/// Cell source or stream text as stored on disk: a single string, an
/// ordered list of fragments, or JSON null.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SourceText {
    Single(String),
    Fragments(Vec<String>),
    Absent,
}

impl Default for SourceText {
    fn default() -> Self {
        SourceText::Absent
    }
}

impl SourceText {
    /// Flatten to one string: fragments are concatenated in order with no
    /// separator, absent text becomes the empty string.
    pub fn flatten(&self) -> String {
        match self {
            SourceText::Single(text) => text.clone(),
            SourceText::Fragments(parts) => parts.concat(),
            SourceText::Absent => String::new(),
        }
    }
}

impl Notebook {
    /// Read and parse a notebook file.
    ///
    /// The file is read fully into memory and the handle released before
    /// this returns. Only nbformat major version 4 documents are accepted.
    pub fn from_path(path: &Path) -> Result<Self, NotebookError> {
        let raw = fs::read_to_string(path).map_err(|source| NotebookError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let notebook: Notebook =
            serde_json::from_str(&raw).map_err(|source| NotebookError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if notebook.nbformat != NBFORMAT_MAJOR {
            return Err(NotebookError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: notebook.nbformat,
                expected: NBFORMAT_MAJOR,
            });
        }

        log::debug!(
            "loaded notebook {} ({} cells, nbformat {}.{})",
            path.display(),
            notebook.cells.len(),
            notebook.nbformat,
            notebook.nbformat_minor
        );
        Ok(notebook)
    }
}
