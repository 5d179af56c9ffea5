//! Taskdown Document Types
//!
//! Typed form of a document that passed the structural check.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

/// Maximum title length, in characters
pub const MAX_TITLE_CHARS: usize = 200;

/// A structurally valid Taskdown document
#[derive(Debug, Clone, PartialEq)]
pub struct TaskdownDocument {
    pub version: String,
    pub tasks: BTreeMap<String, Task>,
    pub relationships: Option<BTreeMap<String, TaskRelationship>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub title: String,
    pub status: TaskStatus,
    pub task_type: Option<TaskType>,
    pub description: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub due: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
    Canceled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Done,
        TaskStatus::Canceled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Canceled => "canceled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    Task,
    Epic,
    Story,
    Bug,
}

impl TaskType {
    pub const ALL: [TaskType; 4] = [TaskType::Task, TaskType::Epic, TaskType::Story, TaskType::Bug];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Task => "task",
            TaskType::Epic => "epic",
            TaskType::Story => "story",
            TaskType::Bug => "bug",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Links from one task to others
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskRelationship {
    pub blocks: Option<Vec<String>>,
    pub blocked_by: Option<Vec<String>>,
    pub part_of: Option<String>,
    pub relates_to: Option<Vec<String>>,
}

impl TaskdownDocument {
    pub fn has_task(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    /// Iterate relationship entries, empty when the section is absent
    pub fn relationships(&self) -> impl Iterator<Item = (&String, &TaskRelationship)> {
        self.relationships.iter().flat_map(|rels| rels.iter())
    }
}

impl TaskRelationship {
    /// Ids listed in `blocks`, `blocked_by` and `relates_to`, in that order
    pub fn listed_ids(&self) -> impl Iterator<Item = &str> {
        [&self.blocks, &self.blocked_by, &self.relates_to]
            .into_iter()
            .flatten()
            .flatten()
            .map(String::as_str)
    }
}
