use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{BookRepository, RepositoryError, RepositoryResult};
use crate::modules::books::models::{Book, BookFilter, CreateBook, Scope};

#[derive(Default)]
struct State {
    last_id: i64,
    rows: BTreeMap<i64, Book>,
}

/// Process-local book storage with the same constraints as the SQL table.
#[derive(Default)]
pub struct InMemoryBookRepository {
    state: RwLock<State>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, soft-deleted ones included.
    pub async fn row_count(&self) -> usize {
        self.state.read().await.rows.len()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn insert(&self, new_book: &CreateBook) -> RepositoryResult<Book> {
        let mut state = self.state.write().await;

        if state.rows.values().any(|book| book.isbn == new_book.isbn) {
            return Err(RepositoryError::UniqueViolation {
                field: "isbn",
                value: new_book.isbn.clone(),
            });
        }

        state.last_id += 1;
        let now = Utc::now();
        let book = Book {
            id: state.last_id,
            title: new_book.title.clone(),
            isbn: new_book.isbn.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.rows.insert(book.id, book.clone());
        Ok(book)
    }

    async fn find_all(&self, scope: Scope) -> RepositoryResult<Vec<Book>> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .values()
            .filter(|book| scope.includes(book))
            .cloned()
            .collect())
    }

    async fn find_one(&self, filter: &BookFilter, scope: Scope) -> RepositoryResult<Option<Book>> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .values()
            .find(|book| scope.includes(book) && filter.matches(book))
            .cloned())
    }

    async fn update(&self, book: &Book) -> RepositoryResult<Book> {
        let mut state = self.state.write().await;
        let stored = state
            .rows
            .get_mut(&book.id)
            .filter(|stored| !stored.is_deleted())
            .ok_or(RepositoryError::Missing(book.id))?;

        stored.title = book.title.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn soft_delete(&self, id: i64) -> RepositoryResult<Book> {
        let mut state = self.state.write().await;
        let stored = state
            .rows
            .get_mut(&id)
            .filter(|stored| !stored.is_deleted())
            .ok_or(RepositoryError::Missing(id))?;

        let now = Utc::now();
        stored.deleted_at = Some(now);
        stored.updated_at = now;
        Ok(stored.clone())
    }
}
