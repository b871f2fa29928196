use crate::notebook::{Cell, Notebook, Output};

/// Placeholder emitted when a code cell produced no renderable output.
pub const NO_OUTPUT: &str = "<NO OUTPUT>";

/// Turn a MIME bundle value into plain text. Values are normally strings
/// (or fragment lists in older writers); anything else falls back to its
/// JSON representation.
fn mime_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Array(parts) => parts
            .iter()
            .map(|part| match part {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Render a code cell's outputs into one text blob.
///
/// Returns the joined text and whether any output was an error. Stream
/// text and `text/plain` results are trimmed; error tracebacks are kept
/// verbatim. Unknown output kinds are skipped.
pub fn render_outputs(outputs: &[Output]) -> (String, bool) {
    let mut lines: Vec<String> = Vec::new();
    let mut has_error = false;

    for output in outputs {
        match output {
            Output::Stream { text } => {
                let text = text.flatten();
                let text = text.trim();
                if !text.is_empty() {
                    lines.push(text.to_string());
                }
            }
            Output::ExecuteResult { data } | Output::DisplayData { data } => {
                if let Some(value) = data.get("text/plain") {
                    lines.push(mime_text(value).trim().to_string());
                }
            }
            Output::Error {
                ename,
                evalue,
                traceback,
            } => {
                has_error = true;
                lines.push("ERROR:".to_string());
                lines.push(format!("{}: {}", ename, evalue));
                lines.extend(traceback.iter().cloned());
            }
            Output::Other => {}
        }
    }

    (lines.join("\n"), has_error)
}

/// Render one cell into its delimited text block.
///
/// The block's first line is always the `[CELL <n> | <KIND>]` header, and
/// the block ends with exactly one trailing newline. Unrecognized cell
/// kinds and markdown cells with blank sources render to the empty string
/// and are dropped by [`notebook_to_blocks`].
pub fn render_cell(cell: &Cell, index: usize) -> String {
    match cell {
        Cell::Markdown { source } => {
            let source = source.flatten();
            let source = source.trim();
            if source.is_empty() {
                return String::new();
            }
            format!("[CELL {} | MARKDOWN]\n{}\n", index, source)
        }
        Cell::Code {
            source,
            execution_count,
            outputs,
        } => {
            let source = source.flatten();
            let (output_text, has_error) = render_outputs(outputs);
            let execution_count = match execution_count {
                Some(count) => count.to_string(),
                None => "None".to_string(),
            };
            format!(
                "[CELL {} | CODE]\n[EXECUTION_COUNT] {}\n[HAS_ERROR] {}\n\n{}\n\n[OUTPUT]\n{}\n",
                index,
                execution_count,
                if has_error { "True" } else { "False" },
                source.trim(),
                if output_text.is_empty() {
                    NO_OUTPUT
                } else {
                    output_text.as_str()
                },
            )
        }
        Cell::Other => String::new(),
    }
}

/// Render every cell of a notebook in order, keeping only blocks with
/// visible content. Cell indices are positional and survive filtering
/// untouched, so a narrowed result still names the original cells.
pub fn notebook_to_blocks(notebook: &Notebook) -> Vec<String> {
    notebook
        .cells
        .iter()
        .enumerate()
        .map(|(index, cell)| render_cell(cell, index))
        .filter(|block| !block.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::SourceText;
    use std::collections::BTreeMap;

    fn markdown_cell(source: &str) -> Cell {
        Cell::Markdown {
            source: SourceText::Single(source.to_string()),
        }
    }

    fn code_cell(source: &str, execution_count: Option<i64>, outputs: Vec<Output>) -> Cell {
        Cell::Code {
            source: SourceText::Single(source.to_string()),
            execution_count,
            outputs,
        }
    }

    fn plain_bundle(text: &str) -> BTreeMap<String, serde_json::Value> {
        let mut data = BTreeMap::new();
        data.insert(
            "text/plain".to_string(),
            serde_json::Value::String(text.to_string()),
        );
        data
    }

    #[test]
    fn test_markdown_block_header_is_first_line() {
        let block = render_cell(&markdown_cell("# Intro\n"), 3);
        assert_eq!(block, "[CELL 3 | MARKDOWN]\n# Intro\n");
        assert_eq!(block.lines().next().unwrap(), "[CELL 3 | MARKDOWN]");
    }

    #[test]
    fn test_code_block_layout() {
        let outputs = vec![Output::Stream {
            text: SourceText::Single("42\n".to_string()),
        }];
        let block = render_cell(&code_cell("print(42)", Some(7), outputs), 5);
        assert_eq!(
            block,
            "[CELL 5 | CODE]\n[EXECUTION_COUNT] 7\n[HAS_ERROR] False\n\nprint(42)\n\n[OUTPUT]\n42\n"
        );

        let lines: Vec<&str> = block.lines().collect();
        assert!(lines[1].starts_with("[EXECUTION_COUNT]"));
        assert!(lines[2].starts_with("[HAS_ERROR]"));
    }

    #[test]
    fn test_code_block_without_output_uses_placeholder() {
        let block = render_cell(&code_cell("x = 1", None, vec![]), 0);
        assert!(block.contains("[EXECUTION_COUNT] None"));
        assert!(block.ends_with("[OUTPUT]\n<NO OUTPUT>\n"));
    }

    #[test]
    fn test_render_outputs_error_record() {
        let outputs = vec![Output::Error {
            ename: "ValueError".to_string(),
            evalue: "bad".to_string(),
            traceback: vec!["line1".to_string(), "line2".to_string()],
        }];
        let (text, has_error) = render_outputs(&outputs);
        assert_eq!(text, "ERROR:\nValueError: bad\nline1\nline2");
        assert!(has_error);
    }

    #[test]
    fn test_render_outputs_picks_text_plain_only() {
        let mut data = plain_bundle("  result  ");
        data.insert(
            "image/png".to_string(),
            serde_json::Value::String("base64...".to_string()),
        );
        let (text, has_error) = render_outputs(&[Output::ExecuteResult { data }]);
        assert_eq!(text, "result");
        assert!(!has_error);

        let mut image_only = BTreeMap::new();
        image_only.insert(
            "image/png".to_string(),
            serde_json::Value::String("base64...".to_string()),
        );
        let (text, _) = render_outputs(&[Output::DisplayData { data: image_only }]);
        assert_eq!(text, "");
    }

    #[test]
    fn test_render_outputs_skips_blank_stream_and_unknown() {
        let outputs = vec![
            Output::Stream {
                text: SourceText::Single("   \n".to_string()),
            },
            Output::Other,
            Output::Stream {
                text: SourceText::Fragments(vec!["hello ".to_string(), "world".to_string()]),
            },
        ];
        let (text, has_error) = render_outputs(&outputs);
        assert_eq!(text, "hello world");
        assert!(!has_error);
    }

    #[test]
    fn test_notebook_to_blocks_drops_unknown_cells() {
        let notebook = Notebook {
            nbformat: 4,
            nbformat_minor: 5,
            cells: vec![
                markdown_cell("intro"),
                Cell::Other,
                code_cell("pass", None, vec![]),
            ],
        };
        let blocks = notebook_to_blocks(&notebook);
        assert_eq!(blocks.len(), 2);
        // Indices are positional: the code cell keeps index 2.
        assert!(blocks[0].starts_with("[CELL 0 | MARKDOWN]"));
        assert!(blocks[1].starts_with("[CELL 2 | CODE]"));
    }

    #[test]
    fn test_blank_markdown_cell_is_excluded() {
        let blocks = notebook_to_blocks(&Notebook {
            nbformat: 4,
            nbformat_minor: 0,
            cells: vec![markdown_cell("   \n"), markdown_cell("kept")],
        });
        assert_eq!(blocks, vec!["[CELL 1 | MARKDOWN]\nkept\n".to_string()]);
    }
}
