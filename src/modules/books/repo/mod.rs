//! Storage for book records.

mod memory;
mod postgres;

pub use memory::InMemoryBookRepository;
pub use postgres::PgBookRepository;

use async_trait::async_trait;
use shelf_http::AppError;
use thiserror::Error;

use super::models::{Book, BookFilter, CreateBook, Scope};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("unique constraint violated: {field} '{value}' already stored")]
    UniqueViolation { field: &'static str, value: String },

    #[error("book {0} disappeared while being written")]
    Missing(i64),
}

/// Storage failures are not client errors; they surface as 500s.
impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Internal(err.into())
    }
}

/// Data access for the `books` table.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a new row and return it with generated id and timestamps.
    async fn insert(&self, new_book: &CreateBook) -> RepositoryResult<Book>;

    /// All rows visible in `scope`, ordered by id.
    async fn find_all(&self, scope: Scope) -> RepositoryResult<Vec<Book>>;

    /// First row matching `filter` visible in `scope`.
    async fn find_one(&self, filter: &BookFilter, scope: Scope) -> RepositoryResult<Option<Book>>;

    /// Persist the mutable fields of `book` and return the stored row.
    async fn update(&self, book: &Book) -> RepositoryResult<Book>;

    /// Mark the row as deleted without removing it and return the stored row.
    async fn soft_delete(&self, id: i64) -> RepositoryResult<Book>;
}
