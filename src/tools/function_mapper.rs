use anyhow::Result;
use regex::Regex;
use rmcp::schemars;
use serde::Deserialize;

use super::{Tool, ERROR_PREFIX};
use crate::config::Config;
use crate::filter::header_index;
use crate::notebook::Notebook;
use crate::render;

/// Sentinel returned when no function definitions were found.
pub const NO_FUNCTIONS_MESSAGE: &str = "No function definitions found in the notebook.";

/// Matches Python `def` statements at the start of a line, capturing the
/// function name.
const DEF_PATTERN: &str = r"(?m)^\s*def\s+([a-zA-Z_]\w*)\s*\(";

/// Arguments of the `map_functions` tool.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct MapFunctionsRequest {
    /// Path to the .ipynb file. Relative paths resolve against the
    /// configured notebook root directory.
    pub path: String,
}

/// Maps each function defined in a notebook to the cell that defines it,
/// so a caller can jump straight to a definition by cell index.
pub struct FunctionMapper {
    config: Config,
    pattern: Regex,
}

impl FunctionMapper {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pattern: Regex::new(DEF_PATTERN).expect("valid def pattern"),
        }
    }

    /// Scan rendered blocks for `def` statements. Returns `(name, index)`
    /// pairs in first-seen order; a function redefined in a later cell
    /// keeps its position but reports the later cell.
    fn build_map(&self, blocks: &[String]) -> Result<Vec<(String, usize)>> {
        let mut entries: Vec<(String, usize)> = Vec::new();

        for block in blocks {
            let index = match header_index(block)? {
                Some(index) => index,
                None => continue,
            };

            for captures in self.pattern.captures_iter(block) {
                let name = captures[1].to_string();
                match entries.iter_mut().find(|(existing, _)| *existing == name) {
                    Some(entry) => entry.1 = index,
                    None => entries.push((name, index)),
                }
            }
        }

        Ok(entries)
    }

    /// Run the scan and map any failure into the in-band error string.
    pub async fn respond(&self, request: MapFunctionsRequest) -> String {
        match self.run(request).await {
            Ok(text) => text,
            Err(e) => format!("{}{}", ERROR_PREFIX, e),
        }
    }
}

#[async_trait::async_trait]
impl Tool for FunctionMapper {
    type Input = MapFunctionsRequest;
    type Output = String;

    fn name(&self) -> &str {
        "map_functions"
    }

    async fn run(&self, request: MapFunctionsRequest) -> Result<String> {
        let path = self.config.resolve_path(&request.path);
        let notebook = Notebook::from_path(&path)?;
        let blocks = render::notebook_to_blocks(&notebook);
        let entries = self.build_map(&blocks)?;

        log::info!(
            "FunctionMapper: {} function(s) in {}",
            entries.len(),
            path.display()
        );

        if entries.is_empty() {
            return Ok(NO_FUNCTIONS_MESSAGE.to_string());
        }

        let lines: Vec<String> = entries
            .iter()
            .map(|(name, index)| format!("{}: cell {}", name, index))
            .collect();
        Ok(lines.join("\n"))
    }
}
