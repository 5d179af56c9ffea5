//! YAML Parser Adapter
//!
//! Turns raw Taskdown text into a structured value with merge keys applied.
//! Every parser failure comes back as a single `INVALID_YAML` diagnostic.

use serde_yaml::Value;

use crate::validation::diagnostic::{ErrorCode, Location, ValidationError};

/// Source tag attached to syntax diagnostics
pub const YAML_SOURCE: &str = "yaml";

/// Parse Taskdown YAML text into a structured value
pub fn parse_document(text: &str) -> Result<Value, ValidationError> {
    let mut value = serde_yaml::from_str::<Value>(text).map_err(syntax_error)?;
    value.apply_merge().map_err(syntax_error)?;
    Ok(value)
}

fn syntax_error(err: serde_yaml::Error) -> ValidationError {
    let location = syntax_location(&err);
    ValidationError::error(ErrorCode::InvalidYaml, err.to_string(), location, YAML_SOURCE)
}

/// The parser reports one-based positions; diagnostics are zero-based.
/// Errors about the stream as a whole (several documents, bad merges) have no
/// position and land on the first character.
fn syntax_location(err: &serde_yaml::Error) -> Location {
    match err.location() {
        Some(mark) => Location::new(
            mark.line().saturating_sub(1),
            mark.column().saturating_sub(1),
            1,
        ),
        None => Location::unknown(),
    }
}
