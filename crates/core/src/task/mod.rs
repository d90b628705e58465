//! Task module
//!
//! This module contains task-related types and the storage backends.

mod model;
mod mongo_store;
mod repository;
mod sql_store;

pub use model::*;
pub use mongo_store::MongoTaskStore;
pub use repository::TaskRepository;
pub use sql_store::SqliteTaskStore;
