use async_trait::async_trait;
use sqlx::PgPool;

use super::{BookRepository, RepositoryError, RepositoryResult};
use crate::modules::books::models::{Book, BookFilter, CreateBook, Scope};

const COLUMNS: &str = "id, title, isbn, created_at, updated_at, deleted_at";

/// `books` table access through sqlx.
#[derive(Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn scope_clause(scope: Scope) -> &'static str {
    match scope {
        Scope::Active => " AND deleted_at IS NULL",
        Scope::WithDeleted => "",
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn insert(&self, new_book: &CreateBook) -> RepositoryResult<Book> {
        let sql = format!("INSERT INTO books (title, isbn) VALUES ($1, $2) RETURNING {COLUMNS}");

        sqlx::query_as::<_, Book>(&sql)
            .bind(&new_book.title)
            .bind(&new_book.isbn)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    RepositoryError::UniqueViolation {
                        field: "isbn",
                        value: new_book.isbn.clone(),
                    }
                }
                other => RepositoryError::Database(other),
            })
    }

    async fn find_all(&self, scope: Scope) -> RepositoryResult<Vec<Book>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM books WHERE TRUE{} ORDER BY id",
            scope_clause(scope)
        );

        let books = sqlx::query_as::<_, Book>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn find_one(&self, filter: &BookFilter, scope: Scope) -> RepositoryResult<Option<Book>> {
        let column = match filter {
            BookFilter::Id(_) => "id",
            BookFilter::Title(_) => "title",
            BookFilter::Isbn(_) => "isbn",
        };
        let sql = format!(
            "SELECT {COLUMNS} FROM books WHERE {column} = $1{} ORDER BY id LIMIT 1",
            scope_clause(scope)
        );

        let query = sqlx::query_as::<_, Book>(&sql);
        let query = match filter {
            BookFilter::Id(id) => query.bind(*id),
            BookFilter::Title(value) | BookFilter::Isbn(value) => query.bind(value.as_str()),
        };

        Ok(query.fetch_optional(&self.pool).await?)
    }

    async fn update(&self, book: &Book) -> RepositoryResult<Book> {
        let sql = format!(
            "UPDATE books SET title = $2, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Book>(&sql)
            .bind(book.id)
            .bind(&book.title)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::Missing(book.id))
    }

    async fn soft_delete(&self, id: i64) -> RepositoryResult<Book> {
        let sql = format!(
            "UPDATE books SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::Missing(id))
    }
}
