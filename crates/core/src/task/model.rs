//! Task model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task record as seen by callers.
///
/// `id` is a string so the same shape works for both backends: the SQL
/// store renders its integer key, the Mongo store its ObjectId hex form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Creation input. The backend assigns the id and timestamp;
/// `is_completed` starts out false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub description: String,
}

impl NewTask {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Partial update. Absent fields leave the stored record untouched.
///
/// Presence is what counts, not truthiness: `Some(String::new())` sets the
/// description to the empty string rather than being dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl TaskPatch {
    /// True when no field is present, i.e. the update is a no-op.
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.is_completed.is_none()
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the completion flag
    pub fn with_completed(mut self, is_completed: bool) -> Self {
        self.is_completed = Some(is_completed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_absent_fields_deserialize_to_none() {
        let patch: TaskPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.description.is_none());
        assert!(patch.is_completed.is_none());
        assert!(patch.is_empty());
    }

    #[test]
    fn test_patch_empty_string_is_present() {
        let patch: TaskPatch = serde_json::from_str(r#"{"description": ""}"#).unwrap();
        assert_eq!(patch.description, Some(String::new()));
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_patch_builder() {
        let patch = TaskPatch::default()
            .with_description("buy milk")
            .with_completed(true);
        assert_eq!(patch.description.as_deref(), Some("buy milk"));
        assert_eq!(patch.is_completed, Some(true));
    }

    #[test]
    fn test_task_serializes_created_at() {
        let task = Task {
            id: "1".to_string(),
            description: "buy milk".to_string(),
            is_completed: false,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["is_completed"], false);
        assert!(json["created_at"].is_string());
    }
}
