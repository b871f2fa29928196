use crate::error::NotebookError;

/// Pull the cell index out of a block's `[CELL <n> | <KIND>]` header line.
///
/// Returns `Ok(None)` when the first line is not a cell header (such
/// blocks are skipped by the callers), and an error when the header is
/// present but its index slot does not parse.
pub fn header_index(block: &str) -> Result<Option<usize>, NotebookError> {
    let header = block.lines().next().unwrap_or("");
    let rest = match header.strip_prefix("[CELL") {
        Some(rest) => rest,
        None => return Ok(None),
    };
    let index = rest.split('|').next().unwrap_or("").trim();
    index
        .parse::<usize>()
        .map(Some)
        .map_err(|_| NotebookError::MalformedHeader(header.to_string()))
}

/// Keep blocks containing at least one keyword, case-insensitively,
/// anywhere in the block text (header, source, and output included).
pub fn filter_by_keyword(blocks: Vec<String>, keywords: &[String]) -> Vec<String> {
    let needles: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    blocks
        .into_iter()
        .filter(|block| {
            let haystack = block.to_lowercase();
            needles.iter().any(|needle| haystack.contains(needle.as_str()))
        })
        .collect()
}

/// Keep blocks whose cell index falls in the half-open range
/// `[start, end)`. Either bound may be omitted. Blocks without a cell
/// header are dropped.
pub fn filter_by_cell_index(
    blocks: Vec<String>,
    start: Option<usize>,
    end: Option<usize>,
) -> Result<Vec<String>, NotebookError> {
    let mut result = Vec::new();
    for block in blocks {
        let index = match header_index(&block)? {
            Some(index) => index,
            None => continue,
        };
        if let Some(start) = start {
            if index < start {
                continue;
            }
        }
        if let Some(end) = end {
            if index >= end {
                continue;
            }
        }
        result.push(block);
    }
    Ok(result)
}

/// Keep blocks whose `[HAS_ERROR]` tag equals `target`. Only the first
/// such line in a block counts; blocks without one (markdown) are never
/// kept.
pub fn filter_has_error(blocks: Vec<String>, target: bool) -> Vec<String> {
    blocks
        .into_iter()
        .filter(|block| {
            for line in block.lines() {
                if let Some(rest) = line.strip_prefix("[HAS_ERROR]") {
                    return rest.trim().eq_ignore_ascii_case("true") == target;
                }
            }
            false
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markdown_block(index: usize, body: &str) -> String {
        format!("[CELL {} | MARKDOWN]\n{}\n", index, body)
    }

    fn code_block(index: usize, has_error: bool, output: &str) -> String {
        format!(
            "[CELL {} | CODE]\n[EXECUTION_COUNT] {}\n[HAS_ERROR] {}\n\nx = 1\n\n[OUTPUT]\n{}\n",
            index,
            index,
            if has_error { "True" } else { "False" },
            output
        )
    }

    #[test]
    fn test_header_index() {
        assert_eq!(header_index("[CELL 12 | CODE]\n...").unwrap(), Some(12));
        assert_eq!(header_index("no header here").unwrap(), None);
        assert!(header_index("[CELL twelve | CODE]").is_err());
    }

    #[test]
    fn test_keyword_filter_is_case_insensitive_across_block() {
        let blocks = vec![
            code_block(0, false, "RMSE: 0.12"),
            markdown_block(1, "nothing to see"),
        ];
        let kept = filter_by_keyword(blocks, &["rmse".to_string()]);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].contains("RMSE"));
    }

    #[test]
    fn test_keyword_filter_matches_header_text() {
        let blocks = vec![markdown_block(4, "plain prose")];
        let kept = filter_by_keyword(blocks, &["markdown".to_string()]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_index_filter_is_half_open() {
        let blocks: Vec<String> = (0..10).map(|i| markdown_block(i, "text")).collect();
        let kept = filter_by_cell_index(blocks, Some(2), Some(5)).unwrap();
        let indices: Vec<usize> = kept
            .iter()
            .map(|b| header_index(b).unwrap().unwrap())
            .collect();
        assert_eq!(indices, vec![2, 3, 4]);
    }

    #[test]
    fn test_index_filter_open_bounds() {
        let blocks: Vec<String> = (0..4).map(|i| markdown_block(i, "text")).collect();
        assert_eq!(
            filter_by_cell_index(blocks.clone(), None, Some(2))
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            filter_by_cell_index(blocks.clone(), Some(3), None)
                .unwrap()
                .len(),
            1
        );
        assert_eq!(filter_by_cell_index(blocks, None, None).unwrap().len(), 4);
    }

    #[test]
    fn test_index_filter_drops_headerless_blocks() {
        let blocks = vec!["stray text".to_string(), markdown_block(0, "kept")];
        let kept = filter_by_cell_index(blocks, None, None).unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_error_filter_excludes_markdown_for_both_targets() {
        let blocks = vec![markdown_block(0, "prose"), code_block(1, true, "boom")];
        let kept = filter_has_error(blocks.clone(), true);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].starts_with("[CELL 1 | CODE]"));

        let kept = filter_has_error(blocks, false);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_error_filter_keeps_clean_cells_for_false_target() {
        let blocks = vec![code_block(0, false, "fine"), code_block(1, true, "boom")];
        let kept = filter_has_error(blocks, false);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].starts_with("[CELL 0 | CODE]"));
    }

    #[test]
    fn test_filters_are_idempotent() {
        let blocks = vec![
            code_block(0, true, "boom"),
            code_block(1, false, "RMSE"),
            markdown_block(2, "text"),
        ];

        let once = filter_by_keyword(blocks.clone(), &["rmse".to_string()]);
        let twice = filter_by_keyword(once.clone(), &["rmse".to_string()]);
        assert_eq!(once, twice);

        let once = filter_by_cell_index(blocks.clone(), Some(0), Some(2)).unwrap();
        let twice = filter_by_cell_index(once.clone(), Some(0), Some(2)).unwrap();
        assert_eq!(once, twice);

        let once = filter_has_error(blocks, true);
        let twice = filter_has_error(once.clone(), true);
        assert_eq!(once, twice);
    }
}
