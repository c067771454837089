use std::sync::Arc;

use super::models::{Book, BookFilter, CreateBook, Scope, UpdateBook};
use super::repo::{BookRepository, RepositoryResult};

/// Book access service shared by every request handler.
#[derive(Clone)]
pub struct BookService {
    repo: Arc<dyn BookRepository>,
}

impl BookService {
    pub fn new(repo: Arc<dyn BookRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, payload: CreateBook) -> RepositoryResult<Book> {
        let book = self.repo.insert(&payload).await?;
        tracing::debug!(book_id = book.id, isbn = %book.isbn, "book inserted");
        Ok(book)
    }

    pub async fn find_all(&self, scope: Scope) -> RepositoryResult<Vec<Book>> {
        self.repo.find_all(scope).await
    }

    /// First non-deleted book matching `filter`; `None` when absent.
    pub async fn find_one(&self, filter: &BookFilter) -> RepositoryResult<Option<Book>> {
        self.repo.find_one(filter, Scope::Active).await
    }

    pub async fn find_one_with_deleted(&self, filter: &BookFilter) -> RepositoryResult<Option<Book>> {
        self.repo.find_one(filter, Scope::WithDeleted).await
    }

    /// Merge the non-empty fields of `changes` onto `book` and persist.
    ///
    /// Without changes nothing is written and `book` comes back untouched.
    pub async fn update(&self, mut book: Book, changes: UpdateBook) -> RepositoryResult<Book> {
        if !changes.has_changes() {
            return Ok(book);
        }

        if let Some(title) = changes.title.filter(|title| !title.is_empty()) {
            book.title = title;
        }

        let updated = self.repo.update(&book).await?;
        tracing::debug!(book_id = updated.id, "book updated");
        Ok(updated)
    }

    /// Soft-delete `book`; the returned record carries its `deleted_at`.
    pub async fn remove(&self, book: &Book) -> RepositoryResult<Book> {
        let deleted = self.repo.soft_delete(book.id).await?;
        tracing::debug!(book_id = deleted.id, "book soft-deleted");
        Ok(deleted)
    }
}
