//! Validation Engine
//!
//! Schema and semantic checks over Taskdown documents, separated from the
//! editor and command-line front ends.

pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod rules;

pub use diagnostic::{ErrorCode, Location, Severity, ValidationError, ValidationResult};
pub use engine::{validate_document, TaskdownValidator, ValidationOptions};
pub use error::ValidateError;
pub use rules::{rule_fn, RelationshipRule, TaskIdRule, ValidationRule};
