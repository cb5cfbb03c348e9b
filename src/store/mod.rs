// src/store/mod.rs

//! Persistence of trivia questions.
//!
//! [`QuestionStore`] is the seam the HTTP layer talks to. [`PgStore`] is the
//! PostgreSQL implementation used in production, [`MemoryStore`] keeps rows
//! in-process with the same semantics.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::question::{NewQuestion, Question};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Shared handle used as router state.
pub type SharedStore = Arc<dyn QuestionStore>;

/// Failure kinds of store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An operation was called before `open()` succeeded.
    #[error("the store is not connected to a database")]
    NotConnected,

    #[error("failed to connect to the database: {0}")]
    ConnectionFailed(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no question found")]
    NotFound,

    #[error("failed to write to the database: {0}")]
    WriteFailed(String),

    #[error("failed to read from the database: {0}")]
    ReadFailed(String),
}

#[async_trait]
pub trait QuestionStore: Send + Sync + 'static {
    /// Inserts one question and returns it with its assigned id.
    async fn create(&self, question: NewQuestion) -> StoreResult<Question>;

    /// Inserts all questions or none of them.
    async fn create_many(&self, questions: Vec<NewQuestion>) -> StoreResult<Vec<Question>>;

    /// Returns up to `count` questions ordered by id. `count` must be positive.
    async fn get_many(&self, count: i64) -> StoreResult<Vec<Question>>;

    /// Returns the question with the lowest id.
    async fn get_single(&self) -> StoreResult<Question>;

    /// Returns a uniformly chosen question.
    async fn get_random(&self) -> StoreResult<Question>;

    async fn count(&self) -> StoreResult<i64>;
}

/// Rejects non-positive row counts before any query is issued.
pub(crate) fn check_count(count: i64) -> StoreResult<()> {
    if count <= 0 {
        tracing::warn!("The given count could not be accepted: {}", count);
        return Err(StoreError::InvalidArgument(format!(
            "count must be a positive integer, got {count}"
        )));
    }
    Ok(())
}
