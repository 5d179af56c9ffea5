//! Taskdown Validator
//!
//! Validation of Taskdown task-tracking documents: YAML embedded in Markdown
//! code blocks.
//!
//! This library provides:
//! - YAML parsing with positioned syntax diagnostics
//! - Structural schema checking
//! - Task-id and relationship rules, plus pluggable custom rules
//! - Markdown block extraction and an LSP adapter
//! - Configuration management

pub mod config;
pub mod lsp;
pub mod markdown;
pub mod parser;
pub mod report;
pub mod schema;
pub mod validation;

pub use config::Config;
pub use markdown::{extract_blocks, validate_markdown, TaskdownBlock};
pub use schema::TaskdownDocument;
pub use validation::{
    validate_document, TaskdownValidator, ValidateError, ValidationError, ValidationOptions,
    ValidationResult, ValidationRule,
};
