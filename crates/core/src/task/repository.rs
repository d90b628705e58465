//! Task repository trait
//!
//! Defines the interface for task storage operations. The HTTP layer only
//! sees `Arc<dyn TaskRepository>`; which backend sits behind it is decided
//! once at startup from configuration.

use async_trait::async_trait;

use super::model::{NewTask, Task, TaskPatch};
use crate::Result;

/// Repository interface for task CRUD operations
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Look up a task by id. `Ok(None)` when a well-formed id matches
    /// nothing; `Error::InvalidId` when the id does not parse.
    async fn get_task(&self, id: &str) -> Result<Option<Task>>;

    /// Get all tasks in backend-native order.
    async fn get_tasks(&self) -> Result<Vec<Task>>;

    /// Create a task, assigning its id and creation timestamp.
    async fn create_task(&self, new: NewTask) -> Result<Task>;

    /// Apply the present fields of `patch` and return the updated record.
    /// Fails with `Error::TaskNotFound` when the id matches nothing.
    async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task>;

    /// Remove a task and return it as it existed before removal.
    /// Fails with `Error::TaskNotFound` when the id matches nothing.
    async fn delete_task(&self, id: &str) -> Result<Task>;
}
