//! Application state

use std::sync::Arc;

use task_core::task::{MongoTaskStore, SqliteTaskStore, TaskRepository};

use crate::config::{Backend, Config};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    tasks: Arc<dyn TaskRepository>,
    secret_key: String,
    backend: &'static str,
}

impl AppState {
    /// Create an AppState over an already-constructed repository.
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        secret_key: impl Into<String>,
        backend: &'static str,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                tasks,
                secret_key: secret_key.into(),
                backend,
            }),
        }
    }

    /// Build the repository selected by the configuration and wrap it.
    pub async fn from_config(config: &Config) -> task_core::Result<Self> {
        let tasks: Arc<dyn TaskRepository> = match &config.backend {
            Backend::Sql { database_url } => {
                Arc::new(SqliteTaskStore::connect(database_url).await?)
            }
            Backend::Mongo { url, database } => {
                Arc::new(MongoTaskStore::connect(url, database).await?)
            }
        };
        Ok(Self::new(
            tasks,
            config.secret_key.clone(),
            config.backend.name(),
        ))
    }

    /// Get the task repository
    pub fn tasks(&self) -> &dyn TaskRepository {
        self.inner.tasks.as_ref()
    }

    /// JWT signing secret for the auth prototype
    pub fn secret_key(&self) -> &str {
        &self.inner.secret_key
    }

    /// Name of the configured storage backend
    pub fn backend(&self) -> &'static str {
        self.inner.backend
    }
}
