//! HTTP handlers for `/books`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use shelf_http::{AppError, Envelope, QueryParams, ValidatedJson};

use super::models::{Book, BookFilter, CreateBook, Scope, UpdateBook};
use super::service::BookService;

const RESOURCE: &str = "Book";

/// Routes relative to the module mount point.
pub fn router(service: Arc<BookService>) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(get_book).patch(update_book).delete(remove_book),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default, rename = "withDeleted")]
    pub with_deleted: bool,
}

/// Resolve a path id to an active book, or fail with not-found.
///
/// Ids that are not integers cannot exist and are reported the same way.
async fn load_book(service: &BookService, raw_id: &str) -> Result<Book, AppError> {
    let Ok(id) = raw_id.trim().parse::<i64>() else {
        return Err(AppError::not_found(RESOURCE, raw_id));
    };

    service
        .find_one(&BookFilter::Id(id))
        .await?
        .ok_or_else(|| AppError::not_found(RESOURCE, raw_id))
}

pub async fn create_book(
    State(service): State<Arc<BookService>>,
    ValidatedJson(payload): ValidatedJson<CreateBook>,
) -> Result<Envelope<Book>, AppError> {
    // Soft-deleted rows still hold their ISBN in the unique index
    let existing = service
        .find_one_with_deleted(&BookFilter::Isbn(payload.isbn.clone()))
        .await?;
    if existing.is_some() {
        return Err(AppError::bad_request(format!(
            "Book with isbn {} already exists",
            payload.isbn
        )));
    }

    let book = service.create(payload).await?;
    tracing::info!(book_id = book.id, "book created");

    Ok(Envelope::created("Book created successfully", book))
}

pub async fn list_books(
    State(service): State<Arc<BookService>>,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<Envelope<Vec<Book>>, AppError> {
    let scope = if query.with_deleted {
        Scope::WithDeleted
    } else {
        Scope::Active
    };
    let books = service.find_all(scope).await?;

    Ok(Envelope::ok("Books fetched successfully", books))
}

pub async fn get_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
) -> Result<Envelope<Book>, AppError> {
    let book = load_book(&service, &id).await?;

    Ok(Envelope::ok("Book details fetched successfully", book))
}

pub async fn update_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
    ValidatedJson(changes): ValidatedJson<UpdateBook>,
) -> Result<Envelope<Book>, AppError> {
    let book = load_book(&service, &id).await?;
    let updated = service.update(book, changes).await?;
    tracing::info!(book_id = updated.id, "book updated");

    Ok(Envelope::ok("Book updated successfully", updated))
}

pub async fn remove_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
) -> Result<Envelope<Book>, AppError> {
    let book = load_book(&service, &id).await?;
    let deleted = service.remove(&book).await?;
    tracing::info!(book_id = deleted.id, "book deleted");

    Ok(Envelope::ok("Book deleted successfully", deleted))
}
