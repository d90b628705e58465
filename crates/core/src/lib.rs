//! Core library for the task service
//!
//! This crate contains the storage-facing business logic:
//! - Task model and transfer shapes
//! - Repository contract with SQL and Mongo backends

pub mod error;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
