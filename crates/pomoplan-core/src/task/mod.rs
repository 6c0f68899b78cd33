//! Work items and the collections that hold them.
//!
//! A [`WorkItem`] is what the user plans to do. The [`PlannedQueue`] holds
//! the items still to be worked on, each with a repeat count, and the
//! [`Archive`] records every finished or abandoned work interval.

pub mod archive;
pub mod queue;
pub mod statistics;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub use archive::{Archive, ArchiveEntry};
pub use queue::{PlannedEntry, PlannedQueue};
pub use statistics::{ArchiveStatistics, CategoryCount, PlanStatistics};

/// Length of generated ids, in hex characters.
const ID_LEN: usize = 20;

/// Identity of a work item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(ID_LEN);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form grouping label for work items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A unit of planned work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: TaskId,
    pub category: Category,
    pub description: String,
}

impl WorkItem {
    /// Create a work item with a freshly generated id.
    pub fn new(category: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: TaskId::generate(),
            category: Category::new(category),
            description: description.into(),
        }
    }

    /// Create a work item with a caller-chosen id.
    pub fn with_id(
        id: impl Into<TaskId>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category: Category::new(category),
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_short_and_unique() {
        let a = TaskId::generate();
        let b = TaskId::generate();
        assert_eq!(a.as_str().len(), ID_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn work_item_serializes_category_as_object() {
        let item = WorkItem::with_id("t1", "Writing", "Draft intro");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "t1");
        assert_eq!(json["category"]["name"], "Writing");
        assert_eq!(json["description"], "Draft intro");
    }
}
