use tower_lsp::lsp_types::Url;

/// How the contents of an open document are validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Markdown with embedded taskdown blocks
    Markdown,
    /// A whole-file Taskdown document
    Taskdown,
    /// Not ours; never produces diagnostics
    Other,
}

impl DocumentKind {
    pub fn detect(uri: &Url, language_id: &str) -> Self {
        let path = uri.path().to_ascii_lowercase();
        if language_id == "markdown" || path.ends_with(".md") || path.ends_with(".markdown") {
            DocumentKind::Markdown
        } else if language_id == "taskdown" || path.ends_with(".taskdown") {
            DocumentKind::Taskdown
        } else {
            DocumentKind::Other
        }
    }
}

/// State for each open document
#[derive(Debug, Clone)]
pub struct DocumentState {
    pub content: String,
    pub version: i32,
    pub kind: DocumentKind,
}
