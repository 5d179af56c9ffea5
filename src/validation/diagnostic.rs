//! Diagnostics
//!
//! The values produced by a validation pass, shaped for direct rendering by an
//! editor host or the command line.

use std::fmt;

use serde::{Serialize, Serializer};

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// Machine-readable classification of a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// The source text is not well-formed YAML
    InvalidYaml,
    /// A structural constraint of the document shape was violated
    SchemaError,
    /// A task id does not follow the naming convention
    InvalidTaskId,
    /// A relationship points at a task that does not exist
    UnknownTaskId,
    /// Emitted by a user-supplied rule
    Custom(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::InvalidYaml => "INVALID_YAML",
            ErrorCode::SchemaError => "SCHEMA_ERROR",
            ErrorCode::InvalidTaskId => "INVALID_TASK_ID",
            ErrorCode::UnknownTaskId => "UNKNOWN_TASK_ID",
            ErrorCode::Custom(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Zero-based position of a diagnostic inside the validated text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl Location {
    pub fn new(line: usize, column: usize, length: usize) -> Self {
        Self {
            line,
            column,
            length,
        }
    }

    /// Placeholder for diagnostics whose position is not tracked.
    pub fn unknown() -> Self {
        Self::new(0, 0, 1)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::unknown()
    }
}

/// A single diagnostic produced by validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub code: ErrorCode,
    pub message: String,
    pub location: Location,
    pub severity: Severity,
    /// Tag naming the stage or rule that produced this diagnostic
    pub source: String,
}

impl ValidationError {
    pub fn error(
        code: ErrorCode,
        message: impl Into<String>,
        location: Location,
        source: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            location,
            severity: Severity::Error,
            source: source.into(),
        }
    }

    pub fn warning(
        code: ErrorCode,
        message: impl Into<String>,
        location: Location,
        source: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            location,
            severity: Severity::Warning,
            source: source.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.location.line + 1,
            self.location.column + 1,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Result of validating a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::from_errors(Vec::new())
    }

    /// Any diagnostic, warnings included, makes the result invalid.
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// True when at least one diagnostic has error severity
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(ValidationError::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.errors.iter().filter(|e| e.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.errors.len() - self.error_count()
    }
}
