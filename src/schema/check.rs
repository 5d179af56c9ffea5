//! Structural Schema Check
//!
//! Walks a parsed YAML value and either builds a typed [`TaskdownDocument`] or
//! reports every violated constraint. Unknown fields are ignored.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_yaml::{Mapping, Value};

use super::types::{MAX_TITLE_CHARS, Task, TaskRelationship, TaskStatus, TaskType, TaskdownDocument};
use crate::validation::diagnostic::{ErrorCode, Location, ValidationError};

/// Source tag attached to every structural diagnostic
pub const SCHEMA_SOURCE: &str = "schema";

/// Check a structured value against the Taskdown document shape
pub fn check_document(value: &Value) -> Result<TaskdownDocument, Vec<ValidationError>> {
    let mut checker = SchemaChecker::default();
    let document = checker.document(value);

    match document {
        Some(document) if checker.errors.is_empty() => Ok(document),
        _ => Err(checker.errors),
    }
}

#[derive(Debug, Default)]
struct SchemaChecker {
    errors: Vec<ValidationError>,
}

impl SchemaChecker {
    fn violation(&mut self, path: &str, message: String) {
        let subject = if path.is_empty() { "document" } else { path };
        self.errors.push(ValidationError::error(
            ErrorCode::SchemaError,
            format!("{}: {}", subject, message),
            Location::unknown(),
            SCHEMA_SOURCE,
        ));
    }

    fn document(&mut self, value: &Value) -> Option<TaskdownDocument> {
        let map = self.mapping("", value)?;

        let version = self.required(map, "", "version", Self::string);
        let tasks = self.required(map, "", "tasks", |c, path, v| c.record(path, v, Self::task));
        let relationships = self.optional(map, "", "relationships", |c, path, v| {
            c.record(path, v, Self::relationship)
        });

        Some(TaskdownDocument {
            version: version?,
            tasks: tasks?,
            relationships: relationships?,
        })
    }

    fn task(&mut self, path: &str, value: &Value) -> Option<Task> {
        let map = self.mapping(path, value)?;

        let title = self.required(map, path, "title", Self::title);
        let status = self.required(map, path, "status", |c, p, v| {
            c.enumeration(p, v, TaskStatus::parse, &TaskStatus::ALL.map(TaskStatus::as_str))
        });
        let task_type = self.optional(map, path, "type", |c, p, v| {
            c.enumeration(p, v, TaskType::parse, &TaskType::ALL.map(TaskType::as_str))
        });
        let description = self.optional(map, path, "description", Self::string);
        let created = self.optional(map, path, "created", Self::timestamp);
        let updated = self.optional(map, path, "updated", Self::timestamp);
        let due = self.optional(map, path, "due", Self::timestamp);

        Some(Task {
            title: title?,
            status: status?,
            task_type: task_type?,
            description: description?,
            created: created?,
            updated: updated?,
            due: due?,
        })
    }

    fn relationship(&mut self, path: &str, value: &Value) -> Option<TaskRelationship> {
        let map = self.mapping(path, value)?;

        let blocks = self.optional(map, path, "blocks", Self::string_list);
        let blocked_by = self.optional(map, path, "blocked_by", Self::string_list);
        let part_of = self.optional(map, path, "part_of", Self::string);
        let relates_to = self.optional(map, path, "relates_to", Self::string_list);

        Some(TaskRelationship {
            blocks: blocks?,
            blocked_by: blocked_by?,
            part_of: part_of?,
            relates_to: relates_to?,
        })
    }

    /// Check a field that must be present
    fn required<T>(
        &mut self,
        map: &Mapping,
        parent: &str,
        key: &str,
        check: impl FnOnce(&mut Self, &str, &Value) -> Option<T>,
    ) -> Option<T> {
        let path = join_path(parent, key);
        match map.get(key) {
            Some(value) => check(self, &path, value),
            None => {
                self.violation(&path, "required".to_string());
                None
            }
        }
    }

    /// Check a field that may be absent. `Some(None)` means absent; `None` means invalid.
    fn optional<T>(
        &mut self,
        map: &Mapping,
        parent: &str,
        key: &str,
        check: impl FnOnce(&mut Self, &str, &Value) -> Option<T>,
    ) -> Option<Option<T>> {
        let path = join_path(parent, key);
        match map.get(key) {
            Some(value) => check(self, &path, value).map(Some),
            None => Some(None),
        }
    }

    fn record<T>(
        &mut self,
        path: &str,
        value: &Value,
        mut check: impl FnMut(&mut Self, &str, &Value) -> Option<T>,
    ) -> Option<BTreeMap<String, T>> {
        let map = self.mapping(path, value)?;
        let mut entries = BTreeMap::new();
        let mut complete = true;

        for (key, entry) in map {
            let Some(key) = self.record_key(path, key) else {
                complete = false;
                continue;
            };
            match check(self, &join_path(path, &key), entry) {
                Some(checked) => {
                    entries.insert(key, checked);
                }
                None => complete = false,
            }
        }

        complete.then_some(entries)
    }

    /// Scalar keys are read as strings; anything else cannot name a task.
    fn record_key(&mut self, path: &str, key: &Value) -> Option<String> {
        match key {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null => Some("null".to_string()),
            other => {
                self.violation(
                    path,
                    format!("keys must be strings, received {}", type_name(other)),
                );
                None
            }
        }
    }

    fn mapping<'v>(&mut self, path: &str, value: &'v Value) -> Option<&'v Mapping> {
        match value {
            Value::Mapping(map) => Some(map),
            other => {
                self.violation(path, format!("expected object, received {}", type_name(other)));
                None
            }
        }
    }

    fn string(&mut self, path: &str, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                self.violation(path, format!("expected string, received {}", type_name(other)));
                None
            }
        }
    }

    fn string_list(&mut self, path: &str, value: &Value) -> Option<Vec<String>> {
        let Value::Sequence(items) = value else {
            self.violation(path, format!("expected array, received {}", type_name(value)));
            return None;
        };

        let mut ids = Vec::with_capacity(items.len());
        let mut complete = true;
        for (index, item) in items.iter().enumerate() {
            match self.string(&format!("{}[{}]", path, index), item) {
                Some(id) => ids.push(id),
                None => complete = false,
            }
        }

        complete.then_some(ids)
    }

    fn title(&mut self, path: &str, value: &Value) -> Option<String> {
        let title = self.string(path, value)?;
        let chars = title.chars().count();

        if chars < 1 {
            self.violation(path, "must contain at least 1 character".to_string());
            return None;
        }
        if chars > MAX_TITLE_CHARS {
            self.violation(
                path,
                format!(
                    "must contain at most {} characters, found {}",
                    MAX_TITLE_CHARS, chars
                ),
            );
            return None;
        }

        Some(title)
    }

    fn enumeration<T>(
        &mut self,
        path: &str,
        value: &Value,
        parse: impl FnOnce(&str) -> Option<T>,
        allowed: &[&str],
    ) -> Option<T> {
        let raw = self.string(path, value)?;
        let parsed = parse(&raw);
        if parsed.is_none() {
            self.violation(
                path,
                format!(
                    "invalid value \"{}\", expected one of {}",
                    raw,
                    allowed.join(", ")
                ),
            );
        }
        parsed
    }

    fn timestamp(&mut self, path: &str, value: &Value) -> Option<DateTime<Utc>> {
        let raw = self.string(path, value)?;
        let parsed = parse_utc_timestamp(&raw);
        if parsed.is_none() {
            self.violation(
                path,
                format!("invalid datetime \"{}\", expected an ISO-8601 UTC timestamp", raw),
            );
        }
        parsed
    }
}

/// Accepts `YYYY-MM-DDTHH:MM:SS[.fraction]Z`
fn parse_utc_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if raw.as_bytes().get(10) != Some(&b'T') || !raw.ends_with('Z') {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "array",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "tagged value",
    }
}
