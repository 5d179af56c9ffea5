//! File-level validation reports for the command line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::markdown::validate_markdown;
use crate::validation::{TaskdownValidator, ValidationError};

/// Diagnostics for one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: PathBuf,
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl FileReport {
    pub fn new(path: PathBuf, errors: Vec<ValidationError>) -> Self {
        Self {
            path,
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// One `path:line:col: severity [CODE] message` line per diagnostic
    pub fn render_text(&self) -> String {
        self.errors
            .iter()
            .map(|error| format!("{}:{}\n", self.path.display(), error))
            .collect()
    }
}

/// Markdown files are scanned for taskdown blocks
pub fn is_markdown_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}

/// Read and validate a file. I/O and fatal validation failures are errors.
pub async fn validate_path(validator: &TaskdownValidator, path: &Path) -> Result<FileReport> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let errors = if is_markdown_path(path) {
        validate_markdown(validator, &content).await
    } else {
        validator
            .validate_str(&content)
            .await
            .map(|result| result.errors)
    }
    .with_context(|| format!("Failed to validate {}", path.display()))?;

    log::debug!("{}: {} diagnostic(s)", path.display(), errors.len());
    Ok(FileReport::new(path.to_path_buf(), errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ErrorCode;

    #[test]
    fn test_markdown_detection() {
        assert!(is_markdown_path(Path::new("docs/PLAN.md")));
        assert!(is_markdown_path(Path::new("notes.Markdown")));
        assert!(!is_markdown_path(Path::new("tasks.yaml")));
        assert!(!is_markdown_path(Path::new("README")));
    }

    #[tokio::test]
    async fn test_validate_markdown_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.md");
        std::fs::write(
            &path,
            "# Plan\n\n```taskdown\nversion: \"1.0\"\ntasks:\n  task1:\n    title: Lowercase\n    status: done\n```\n",
        )
        .unwrap();

        let report = validate_path(&TaskdownValidator::default(), &path)
            .await
            .unwrap();

        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].code, ErrorCode::InvalidTaskId);

        let text = report.render_text();
        assert!(text.contains("plan.md:4:1: error [INVALID_TASK_ID]"));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = validate_path(&TaskdownValidator::default(), &dir.path().join("nope.yaml")).await;

        assert!(result.is_err());
    }
}
