//! Markdown integration
//!
//! Finds ```` ```taskdown ```` fenced blocks in a Markdown file and maps the
//! diagnostics of each block back onto the file's lines.

use std::sync::LazyLock;

use regex::Regex;

use crate::validation::{TaskdownValidator, ValidateError, ValidationError};

static OPEN_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```taskdown\s*$").expect("valid fence regex"));
static CLOSE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```\s*$").expect("valid fence regex"));

/// Taskdown content embedded in a Markdown file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskdownBlock {
    /// Block body, without the fences
    pub content: String,
    /// Zero-based line of the first body line in the enclosing file
    pub start_line: usize,
}

impl TaskdownBlock {
    /// Translate a block-relative diagnostic into file coordinates
    pub fn remap(&self, mut error: ValidationError) -> ValidationError {
        error.location.line += self.start_line;
        error
    }
}

/// Extract every taskdown block. An unclosed fence runs to the end of the file.
pub fn extract_blocks(text: &str) -> Vec<TaskdownBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<(usize, Vec<&str>)> = None;

    for (line_idx, line) in text.lines().enumerate() {
        match current.as_mut() {
            None => {
                if OPEN_FENCE.is_match(line) {
                    current = Some((line_idx + 1, Vec::new()));
                }
            }
            Some((start_line, body)) => {
                if CLOSE_FENCE.is_match(line) {
                    blocks.push(block_from(*start_line, body));
                    current = None;
                } else {
                    body.push(line);
                }
            }
        }
    }

    if let Some((start_line, body)) = current {
        blocks.push(block_from(start_line, &body));
    }

    blocks
}

fn block_from(start_line: usize, body: &[&str]) -> TaskdownBlock {
    let mut content = body.join("\n");
    if !body.is_empty() {
        content.push('\n');
    }
    TaskdownBlock {
        content,
        start_line,
    }
}

/// Validate every taskdown block of a Markdown file.
///
/// Diagnostics come back in file order with file-relative line numbers.
pub async fn validate_markdown(
    validator: &TaskdownValidator,
    text: &str,
) -> Result<Vec<ValidationError>, ValidateError> {
    let blocks = extract_blocks(text);
    log::debug!("Found {} taskdown block(s)", blocks.len());

    let mut diagnostics = Vec::new();
    for block in &blocks {
        let result = validator.validate_str(&block.content).await?;
        diagnostics.extend(result.errors.into_iter().map(|e| block.remap(e)));
    }

    Ok(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{ErrorCode, Location};

    const DOC: &str = "# Plan\n\nSome prose.\n\n```taskdown\nversion: \"1.0\"\ntasks: {}\n```\n\n```rust\nfn main() {}\n```\n";

    #[test]
    fn test_extract_single_block() {
        let blocks = extract_blocks(DOC);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_line, 5);
        assert_eq!(blocks[0].content, "version: \"1.0\"\ntasks: {}\n");
    }

    #[test]
    fn test_extract_ignores_other_languages() {
        assert!(extract_blocks("```yaml\nversion: 1\n```\n").is_empty());
    }

    #[test]
    fn test_unclosed_block_runs_to_end() {
        let blocks = extract_blocks("```taskdown\nversion: \"1.0\"\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_line, 1);
        assert_eq!(blocks[0].content, "version: \"1.0\"\n");
    }

    #[test]
    fn test_crlf_line_endings() {
        let blocks = extract_blocks("intro\r\n```taskdown\r\nversion: \"1.0\"\r\n```\r\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "version: \"1.0\"\n");
    }

    #[test]
    fn test_remap_adds_block_offset() {
        let block = TaskdownBlock {
            content: String::new(),
            start_line: 10,
        };
        let error = ValidationError::error(
            ErrorCode::InvalidYaml,
            "bad",
            Location::new(2, 3, 1),
            "yaml",
        );

        let remapped = block.remap(error);
        assert_eq!(remapped.location, Location::new(12, 3, 1));
    }
}
