//! Semantic Rules
//!
//! Checks that run once a document is structurally valid. Built-in rules and
//! user-supplied rules share the [`ValidationRule`] interface.

use std::collections::HashSet;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::schema::TaskdownDocument;
use crate::validation::diagnostic::{ErrorCode, Location, ValidationError};

/// Pattern every task id must match
pub const TASK_ID_PATTERN: &str = "^[A-Z][A-Z0-9-]+$";

static TASK_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TASK_ID_PATTERN).expect("task id pattern is a valid regex"));

/// Check whether a string is a well-formed task id
pub fn is_valid_task_id(id: &str) -> bool {
    TASK_ID_RE.is_match(id)
}

/// A check over a structurally valid document.
///
/// Rules must be free of side effects; the engine calls them once per
/// validation and appends their diagnostics in registration order. An `Err`
/// aborts the validation call.
pub trait ValidationRule: Send + Sync {
    /// Short identifier used in logs and failure reports
    fn code(&self) -> &str;

    fn evaluate(&self, document: &TaskdownDocument) -> Result<Vec<ValidationError>>;
}

/// Task ids must follow the naming convention
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskIdRule;

impl TaskIdRule {
    pub const SOURCE: &'static str = "task-id";
}

impl ValidationRule for TaskIdRule {
    fn code(&self) -> &str {
        Self::SOURCE
    }

    fn evaluate(&self, document: &TaskdownDocument) -> Result<Vec<ValidationError>> {
        let errors = document
            .tasks
            .keys()
            .filter(|id| !is_valid_task_id(id))
            .map(|id| {
                ValidationError::error(
                    ErrorCode::InvalidTaskId,
                    format!("Task ID \"{}\" must match pattern {}", id, TASK_ID_PATTERN),
                    Location::new(0, 0, id.len()),
                    Self::SOURCE,
                )
            })
            .collect();

        Ok(errors)
    }
}

/// Every task named in `relationships` must exist in `tasks`
#[derive(Debug, Default, Clone, Copy)]
pub struct RelationshipRule;

impl RelationshipRule {
    pub const SOURCE: &'static str = "relationships";

    fn unknown(message: String, id: &str) -> ValidationError {
        ValidationError::error(
            ErrorCode::UnknownTaskId,
            message,
            Location::new(0, 0, id.len()),
            Self::SOURCE,
        )
    }
}

impl ValidationRule for RelationshipRule {
    fn code(&self) -> &str {
        Self::SOURCE
    }

    fn evaluate(&self, document: &TaskdownDocument) -> Result<Vec<ValidationError>> {
        let known: HashSet<&str> = document.tasks.keys().map(String::as_str).collect();
        let mut errors = Vec::new();

        for (task_id, rels) in document.relationships() {
            if !known.contains(task_id.as_str()) {
                errors.push(Self::unknown(
                    format!("Relationship references unknown task \"{}\"", task_id),
                    task_id,
                ));
            }

            for target in rels.listed_ids().filter(|id| !known.contains(id)) {
                errors.push(Self::unknown(
                    format!("Relationship references unknown task \"{}\"", target),
                    target,
                ));
            }

            if let Some(parent) = rels.part_of.as_deref() {
                if !known.contains(parent) {
                    errors.push(Self::unknown(
                        format!("Part-of references unknown task \"{}\"", parent),
                        parent,
                    ));
                }
            }
        }

        Ok(errors)
    }
}

/// Adapts a closure into a [`ValidationRule`]
pub struct FnRule<F> {
    code: String,
    check: F,
}

/// Build a rule from a closure
pub fn rule_fn<F>(code: impl Into<String>, check: F) -> FnRule<F>
where
    F: Fn(&TaskdownDocument) -> Result<Vec<ValidationError>> + Send + Sync,
{
    FnRule {
        code: code.into(),
        check,
    }
}

impl<F> ValidationRule for FnRule<F>
where
    F: Fn(&TaskdownDocument) -> Result<Vec<ValidationError>> + Send + Sync,
{
    fn code(&self) -> &str {
        &self.code
    }

    fn evaluate(&self, document: &TaskdownDocument) -> Result<Vec<ValidationError>> {
        (self.check)(document)
    }
}
