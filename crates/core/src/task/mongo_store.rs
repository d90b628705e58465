//! Document task storage implementation
//!
//! Stores tasks in a single MongoDB collection keyed by a
//! driver-generated ObjectId. External ids are the 24-hex string form
//! and are validated before any query is issued.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use super::model::{NewTask, Task, TaskPatch};
use super::repository::TaskRepository;
use crate::{Error, Result};

/// MongoDB-backed task store
pub struct MongoTaskStore {
    collection: Collection<TaskDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TaskDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    description: String,
    is_completed: bool,
    created_at: bson::DateTime,
}

impl TaskDocument {
    fn into_task(self) -> Result<Task> {
        let id = self
            .id
            .ok_or_else(|| Error::Storage("task document is missing _id".to_string()))?;
        Ok(Task {
            id: id.to_hex(),
            description: self.description,
            is_completed: self.is_completed,
            created_at: self.created_at.to_chrono(),
        })
    }
}

impl MongoTaskStore {
    /// Connect to a MongoDB deployment and use the `task` collection of
    /// the given database.
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let collection = client.database(database).collection("task");
        tracing::debug!("Using MongoDB database {:?}, collection \"task\"", database);
        Ok(Self { collection })
    }

    fn parse_id(id: &str) -> Result<ObjectId> {
        ObjectId::parse_str(id).map_err(|_| Error::InvalidId(id.to_string()))
    }

    fn set_document(patch: &TaskPatch) -> Document {
        let mut updates = Document::new();
        if let Some(description) = &patch.description {
            updates.insert("description", Bson::String(description.clone()));
        }
        if let Some(is_completed) = patch.is_completed {
            updates.insert("is_completed", Bson::Boolean(is_completed));
        }
        updates
    }
}

#[async_trait]
impl TaskRepository for MongoTaskStore {
    async fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let oid = Self::parse_id(id)?;
        let document = self.collection.find_one(doc! { "_id": oid }).await?;
        document.map(TaskDocument::into_task).transpose()
    }

    async fn get_tasks(&self) -> Result<Vec<Task>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<TaskDocument> = cursor.try_collect().await?;
        documents
            .into_iter()
            .map(TaskDocument::into_task)
            .collect()
    }

    async fn create_task(&self, new: NewTask) -> Result<Task> {
        let document = TaskDocument {
            id: None,
            description: new.description,
            is_completed: false,
            // Millisecond precision, which is what the store round-trips.
            created_at: bson::DateTime::now(),
        };
        let result = self.collection.insert_one(&document).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| Error::Storage("insert did not return an ObjectId".to_string()))?;
        TaskDocument {
            id: Some(id),
            ..document
        }
        .into_task()
    }

    async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        let oid = Self::parse_id(id)?;
        let updates = Self::set_document(&patch);
        // An empty $set is a driver error; an empty patch is just a read.
        if !updates.is_empty() {
            self.collection
                .update_one(doc! { "_id": oid }, doc! { "$set": updates })
                .await?;
        }
        // Re-read for the post-update state. A concurrent delete between
        // the two steps shows up here as a missing document.
        let document = self
            .collection
            .find_one(doc! { "_id": oid })
            .await?
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        document.into_task()
    }

    async fn delete_task(&self, id: &str) -> Result<Task> {
        let oid = Self::parse_id(id)?;
        // Read first for the pre-deletion snapshot.
        let document = self
            .collection
            .find_one(doc! { "_id": oid })
            .await?
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        self.collection.delete_one(doc! { "_id": oid }).await?;
        document.into_task()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_rejects_malformed_input() {
        for id in ["", "not-hex", "123", "zzzzzzzzzzzzzzzzzzzzzzzz"] {
            match MongoTaskStore::parse_id(id).unwrap_err() {
                Error::InvalidId(rejected) => assert_eq!(rejected, id),
                e => panic!("Expected InvalidId, got: {:?}", e),
            }
        }
    }

    #[test]
    fn test_parse_id_accepts_hex_object_id() {
        let oid = ObjectId::new();
        assert_eq!(MongoTaskStore::parse_id(&oid.to_hex()).unwrap(), oid);
    }

    #[test]
    fn test_set_document_includes_only_present_fields() {
        let updates = MongoTaskStore::set_document(&TaskPatch::default().with_completed(true));
        assert_eq!(updates.len(), 1);
        assert_eq!(updates.get_bool("is_completed").unwrap(), true);

        let updates = MongoTaskStore::set_document(&TaskPatch::default().with_description(""));
        assert_eq!(updates.len(), 1);
        assert_eq!(updates.get_str("description").unwrap(), "");

        assert!(MongoTaskStore::set_document(&TaskPatch::default()).is_empty());
    }

    #[test]
    fn test_document_into_task() {
        let oid = ObjectId::new();
        let created_at = bson::DateTime::now();
        let task = TaskDocument {
            id: Some(oid),
            description: "buy milk".to_string(),
            is_completed: false,
            created_at,
        }
        .into_task()
        .unwrap();

        assert_eq!(task.id, oid.to_hex());
        assert_eq!(task.description, "buy milk");
        assert_eq!(task.created_at, created_at.to_chrono());
    }

    #[test]
    fn test_document_without_id_is_a_storage_error() {
        let result = TaskDocument {
            id: None,
            description: "buy milk".to_string(),
            is_completed: false,
            created_at: bson::DateTime::now(),
        }
        .into_task();

        match result.unwrap_err() {
            Error::Storage(_) => {}
            e => panic!("Expected Storage, got: {:?}", e),
        }
    }

    // Live-server tests. Run with `cargo test -- --ignored` against a
    // local mongod (MONGO_URL overrides the default address).

    async fn create_live_store() -> MongoTaskStore {
        let uri = std::env::var("MONGO_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        MongoTaskStore::connect(&uri, "task_service_test")
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB"]
    async fn test_create_then_get_returns_equal_record() {
        let store = create_live_store().await;

        let created = store.create_task(NewTask::new("buy milk")).await.unwrap();
        let fetched = store.get_task(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        store.delete_task(&created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB"]
    async fn test_update_applies_only_present_fields() {
        let store = create_live_store().await;
        let created = store.create_task(NewTask::new("original")).await.unwrap();

        let updated = store
            .update_task(&created.id, TaskPatch::default().with_completed(true))
            .await
            .unwrap();
        assert!(updated.is_completed);
        assert_eq!(updated.description, "original");
        assert_eq!(updated.created_at, created.created_at);

        store.delete_task(&created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB"]
    async fn test_update_and_delete_missing_id_not_found() {
        let store = create_live_store().await;
        let missing = ObjectId::new().to_hex();

        match store
            .update_task(&missing, TaskPatch::default().with_completed(true))
            .await
            .unwrap_err()
        {
            Error::TaskNotFound(id) => assert_eq!(id, missing),
            e => panic!("Expected TaskNotFound, got: {:?}", e),
        }
        match store.delete_task(&missing).await.unwrap_err() {
            Error::TaskNotFound(id) => assert_eq!(id, missing),
            e => panic!("Expected TaskNotFound, got: {:?}", e),
        }
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB"]
    async fn test_delete_returns_snapshot_then_gone() {
        let store = create_live_store().await;
        let created = store.create_task(NewTask::new("to delete")).await.unwrap();

        let snapshot = store.delete_task(&created.id).await.unwrap();
        assert_eq!(snapshot, created);
        assert!(store.get_task(&created.id).await.unwrap().is_none());
    }
}
