//! Fatal validation failures
//!
//! Problems in the document never end up here; they become diagnostics. These
//! errors abort a validation call.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidateError {
    /// A custom rule returned an error
    #[error("validation rule '{rule}' failed: {source}")]
    Rule {
        rule: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}
