use tower_lsp::lsp_types::*;

use crate::lsp::backend::Backend;
use crate::lsp::document::DocumentKind;
use crate::markdown::validate_markdown;
use crate::validation::{Severity, ValidateError, ValidationError};

/// Source label shown next to every published diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "taskdown";

/// Trait for handling diagnostics
#[tower_lsp::async_trait]
pub trait HandleDiagnostics {
    async fn publish_diagnostics(&self, uri: Url);
    async fn collect_diagnostics(&self, kind: DocumentKind, content: &str) -> Vec<Diagnostic>;
}

#[tower_lsp::async_trait]
impl HandleDiagnostics for Backend {
    async fn publish_diagnostics(&self, uri: Url) {
        let docs = self.documents.lock().await;
        let Some(state) = docs.get(&uri) else {
            return;
        };
        let (kind, content, version) = (state.kind, state.content.clone(), state.version);
        drop(docs);

        let diagnostics = self.collect_diagnostics(kind, &content).await;
        log::debug!("Publishing {} diagnostic(s) for {}", diagnostics.len(), uri);

        self.client
            .publish_diagnostics(uri, diagnostics, Some(version))
            .await;
    }

    async fn collect_diagnostics(&self, kind: DocumentKind, content: &str) -> Vec<Diagnostic> {
        let outcome: Result<Vec<ValidationError>, ValidateError> = match kind {
            DocumentKind::Markdown => validate_markdown(&self.validator, content).await,
            DocumentKind::Taskdown => self
                .validator
                .validate_str(content)
                .await
                .map(|result| result.errors),
            DocumentKind::Other => Ok(Vec::new()),
        };

        match outcome {
            Ok(errors) => errors.iter().map(create_lsp_diagnostic).collect(),
            Err(err) => {
                self.client
                    .log_message(MessageType::ERROR, format!("Validation failed: {}", err))
                    .await;
                Vec::new()
            }
        }
    }
}

/// Convert a validation diagnostic into its LSP form
pub fn create_lsp_diagnostic(error: &ValidationError) -> Diagnostic {
    let severity = match error.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };

    let location = &error.location;
    let line = lsp_offset(location.line);
    let start = lsp_offset(location.column);
    let end = lsp_offset(location.column.saturating_add(location.length));

    Diagnostic {
        range: Range::new(Position::new(line, start), Position::new(line, end)),
        severity: Some(severity),
        code: Some(NumberOrString::String(error.code.to_string())),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: error.message.clone(),
        ..Default::default()
    }
}

/// LSP positions are `u32`; anything larger is pinned to the end of the range.
fn lsp_offset(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
