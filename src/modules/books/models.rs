use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Generated identifier, never reused
    pub id: i64,
    pub title: String,
    /// ISBN-13, unique across every row including soft-deleted ones
    pub isbn: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the book is soft-deleted
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Book {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Request model for creating a new book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBook {
    pub title: String,
    pub isbn: String,
}

/// Request model for updating a book. The ISBN cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBook {
    #[serde(default)]
    pub title: Option<String>,
}

impl UpdateBook {
    /// Whether the payload carries any non-empty field.
    pub fn has_changes(&self) -> bool {
        self.title.as_deref().is_some_and(|title| !title.is_empty())
    }
}

/// Lookup key for a single book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
    Id(i64),
    Title(String),
    Isbn(String),
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::Id(id) => book.id == *id,
            BookFilter::Title(title) => book.title == *title,
            BookFilter::Isbn(isbn) => book.isbn == *isbn,
        }
    }
}

/// Which rows a query may see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    /// Only rows that are not soft-deleted
    #[default]
    Active,
    /// Every row, soft-deleted or not
    WithDeleted,
}

impl Scope {
    pub fn includes(self, book: &Book) -> bool {
        match self {
            Scope::Active => !book.is_deleted(),
            Scope::WithDeleted => true,
        }
    }
}
