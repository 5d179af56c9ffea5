//! Validation Engine
//!
//! Composes parsing, the structural schema check and the semantic rules into
//! one pass over a document snapshot.

use std::fmt;
use std::sync::Arc;

use serde_yaml::Value;

use crate::parser;
use crate::schema::{TaskdownDocument, check_document};
use crate::validation::diagnostic::{ValidationError, ValidationResult};
use crate::validation::error::ValidateError;
use crate::validation::rules::{RelationshipRule, TaskIdRule, ValidationRule};

/// Options recognised by [`TaskdownValidator`]
#[derive(Clone, Default)]
pub struct ValidationOptions {
    /// Reserved for stricter rule sets; does not change the built-in rules yet
    pub strict: bool,
    /// Rules run after the built-in ones, in this order
    pub custom_rules: Vec<Arc<dyn ValidationRule>>,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.custom_rules.push(Arc::new(rule));
        self
    }
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.custom_rules.iter().map(|r| r.code()).collect();
        f.debug_struct("ValidationOptions")
            .field("strict", &self.strict)
            .field("custom_rules", &codes)
            .finish()
    }
}

/// Validates Taskdown documents.
///
/// Holds no per-call state, so one instance can be shared between tasks.
#[derive(Debug, Clone)]
pub struct TaskdownValidator {
    options: ValidationOptions,
}

impl Default for TaskdownValidator {
    fn default() -> Self {
        Self::new(ValidationOptions::default())
    }
}

impl TaskdownValidator {
    pub fn new(options: ValidationOptions) -> Self {
        log::debug!("Creating validator with {:?}", options);
        Self { options }
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate raw Taskdown text: parse, schema check, semantic rules.
    pub async fn validate_str(&self, content: &str) -> Result<ValidationResult, ValidateError> {
        let value = match parser::parse_document(content) {
            Ok(value) => value,
            Err(error) => {
                log::debug!("Syntax error, skipping remaining checks: {}", error);
                return Ok(ValidationResult::from_errors(vec![error]));
            }
        };

        self.run(&value)
    }

    /// Validate an already parsed value.
    pub async fn validate_value(&self, value: &Value) -> Result<ValidationResult, ValidateError> {
        self.run(value)
    }

    fn run(&self, value: &Value) -> Result<ValidationResult, ValidateError> {
        let document = match check_document(value) {
            Ok(document) => document,
            Err(errors) => {
                log::debug!("Schema check failed with {} violation(s)", errors.len());
                return Ok(ValidationResult::from_errors(errors));
            }
        };

        let mut errors = Vec::new();
        apply_rule(&TaskIdRule, &document, &mut errors)?;
        apply_rule(&RelationshipRule, &document, &mut errors)?;
        for rule in &self.options.custom_rules {
            apply_rule(rule.as_ref(), &document, &mut errors)?;
        }

        Ok(ValidationResult::from_errors(errors))
    }
}

fn apply_rule(
    rule: &dyn ValidationRule,
    document: &TaskdownDocument,
    errors: &mut Vec<ValidationError>,
) -> Result<(), ValidateError> {
    let found = rule.evaluate(document).map_err(|err| ValidateError::Rule {
        rule: rule.code().to_string(),
        source: err.into(),
    })?;
    log::trace!("Rule '{}' produced {} diagnostic(s)", rule.code(), found.len());
    errors.extend(found);
    Ok(())
}

/// Validate raw Taskdown text with default options
pub async fn validate_document(content: &str) -> Result<ValidationResult, ValidateError> {
    TaskdownValidator::default().validate_str(content).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::diagnostic::{ErrorCode, Location, ValidationError};
    use crate::validation::rules::rule_fn;

    const VALID: &str = r#"
version: "1.0"
tasks:
  TASK-1:
    title: Fix bug
    status: pending
"#;

    #[tokio::test]
    async fn test_valid_document() {
        let result = validate_document(VALID).await.unwrap();
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn test_schema_errors_skip_semantic_rules() {
        let content = r#"
tasks:
  bad-id:
    title: Fix bug
    status: pending
"#;
        let result = validate_document(content).await.unwrap();

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ErrorCode::SchemaError);
    }

    #[tokio::test]
    async fn test_custom_rule_failure_is_fatal() {
        let options = ValidationOptions::new()
            .with_rule(rule_fn("EXPLODES", |_: &crate::schema::TaskdownDocument| {
                Err(anyhow::anyhow!("rule backend unavailable"))
            }));
        let validator = TaskdownValidator::new(options);

        let err = validator.validate_str(VALID).await.unwrap_err();
        match err {
            ValidateError::Rule { rule, .. } => assert_eq!(rule, "EXPLODES"),
            other => panic!("Expected rule failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_custom_rules_not_run_on_schema_failure() {
        let options = ValidationOptions::new().with_rule(rule_fn(
            "ALWAYS",
            |_: &crate::schema::TaskdownDocument| {
                Ok(vec![ValidationError::warning(
                    ErrorCode::Custom("ALWAYS".to_string()),
                    "always fires",
                    Location::unknown(),
                    "always",
                )])
            },
        ));
        let validator = TaskdownValidator::new(options);

        let result = validator.validate_str("version: \"1.0\"\n").await.unwrap();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ErrorCode::SchemaError);
    }

    #[test]
    fn test_options_debug_lists_rule_codes() {
        let options = ValidationOptions::new()
            .strict(true)
            .with_rule(rule_fn("MY_RULE", |_: &crate::schema::TaskdownDocument| {
                Ok(Vec::new())
            }));

        let debug = format!("{:?}", options);
        assert!(debug.contains("strict: true"));
        assert!(debug.contains("MY_RULE"));
    }
}
