use anyhow::Result;
use rmcp::schemars;
use serde::Deserialize;

use super::{Tool, ERROR_PREFIX};
use crate::config::Config;
use crate::filter;
use crate::notebook::Notebook;
use crate::render;

/// Sentinel returned when every block was filtered away.
pub const NO_MATCH_MESSAGE: &str = "No matching cells found with the specified filters.";

/// Arguments of the `read_notebook` tool.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct ReadNotebookRequest {
    /// Path to the .ipynb file. Relative paths resolve against the
    /// configured notebook root directory.
    pub path: String,
    /// Keywords to filter cells (e.g. ["fit", "model"]). A cell is kept
    /// when any keyword occurs in its rendered text, case-insensitively.
    pub keywords: Option<Vec<String>>,
    /// Start cell index (inclusive).
    pub start_cell: Option<usize>,
    /// End cell index (exclusive).
    pub end_cell: Option<usize>,
    /// If true, only returns cells that have execution errors; if false,
    /// only cells without.
    pub only_errors: Option<bool>,
}

/// Reads a notebook file and renders it as filtered, delimited text
/// blocks, one per cell.
pub struct NotebookReader {
    config: Config,
}

impl NotebookReader {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the pipeline and map any failure into the in-band error string.
    ///
    /// This is the single catch boundary of the tool surface: callers
    /// always get a text response, never an error channel.
    pub async fn respond(&self, request: ReadNotebookRequest) -> String {
        match self.run(request).await {
            Ok(text) => text,
            Err(e) => format!("{}{}", ERROR_PREFIX, e),
        }
    }
}

#[async_trait::async_trait]
impl Tool for NotebookReader {
    type Input = ReadNotebookRequest;
    type Output = String;

    fn name(&self) -> &str {
        "read_notebook"
    }

    /// Load → render → filter → join. Filters apply in a fixed order
    /// (keyword, index range, error presence), each only when its
    /// argument is present.
    async fn run(&self, request: ReadNotebookRequest) -> Result<String> {
        let path = self.config.resolve_path(&request.path);
        let notebook = Notebook::from_path(&path)?;
        let mut blocks = render::notebook_to_blocks(&notebook);
        let total = blocks.len();

        if let Some(keywords) = &request.keywords {
            if !keywords.is_empty() {
                blocks = filter::filter_by_keyword(blocks, keywords);
            }
        }

        if request.start_cell.is_some() || request.end_cell.is_some() {
            blocks = filter::filter_by_cell_index(blocks, request.start_cell, request.end_cell)?;
        }

        if let Some(target) = request.only_errors {
            blocks = filter::filter_has_error(blocks, target);
        }

        log::info!(
            "NotebookReader: {} of {} block(s) from {} after filtering",
            blocks.len(),
            total,
            path.display()
        );

        if blocks.is_empty() {
            return Ok(NO_MATCH_MESSAGE.to_string());
        }
        Ok(blocks.join("\n"))
    }
}
