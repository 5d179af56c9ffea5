//! Taskdown Schema
//!
//! The document shape and the structural check that produces typed documents.

pub mod check;
pub mod types;

pub use check::check_document;
pub use types::{Task, TaskRelationship, TaskStatus, TaskType, TaskdownDocument};
