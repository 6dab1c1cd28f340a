//! Repository layer: the book store contract and its implementations

pub mod books;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::book::{Book, NewBook};

pub use books::PgBookStore;
pub use memory::MemoryBookStore;

/// Failure reported by a book store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The row an update or delete targeted no longer exists
    #[error("Book {0} is gone")]
    Missing(i32),

    #[error("No book ids left to assign")]
    IdsExhausted,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent collection of books ordered by id.
///
/// Each call is atomic on a single row; nothing here spans calls, so two
/// requests touching the same book race at the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, ascending by id
    async fn list_all(&self) -> StoreResult<Vec<Book>>;

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Book>>;

    /// Insert a book and return it with its newly assigned id
    async fn insert(&self, book: NewBook) -> StoreResult<Book>;

    async fn update(&self, book: &Book) -> StoreResult<()>;

    async fn delete(&self, book: &Book) -> StoreResult<()>;

    async fn count(&self) -> StoreResult<i64>;
}
