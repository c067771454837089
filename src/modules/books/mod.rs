pub mod models;
pub mod repo;
pub mod routes;
pub mod service;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{InitCtx, Migration, Module};

use repo::BookRepository;
use service::BookService;

/// Books module: CRUD over the `books` table
pub struct BooksModule {
    service: Arc<BookService>,
}

impl BooksModule {
    pub fn new(service: Arc<BookService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id         BIGSERIAL    PRIMARY KEY,
                    title      VARCHAR(255) NOT NULL,
                    isbn       VARCHAR(255) NOT NULL UNIQUE,
                    created_at TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
                    deleted_at TIMESTAMPTZ  NULL
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn envelope_schema(data: serde_json::Value) -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "message": { "type": "string" },
            "data": data
        },
        "required": ["message", "data"]
    })
}

fn json_response(description: &str, schema: serde_json::Value) -> serde_json::Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let book = json!({ "$ref": "#/components/schemas/Book" });
    let error = json!({ "$ref": "#/components/schemas/ErrorResponse" });
    let id_param = json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer" }
    }]);

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "parameters": [{
                        "name": "withDeleted",
                        "in": "query",
                        "required": false,
                        "schema": { "type": "boolean" }
                    }],
                    "responses": {
                        "200": json_response(
                            "Books fetched successfully",
                            envelope_schema(json!({ "type": "array", "items": book.clone() }))
                        )
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/CreateBook" } } }
                    },
                    "responses": {
                        "201": json_response("Book created successfully", envelope_schema(book.clone())),
                        "400": json_response("Validation error or duplicate ISBN", error.clone())
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": id_param.clone(),
                    "responses": {
                        "200": json_response("Book details fetched successfully", envelope_schema(book.clone())),
                        "400": json_response("Book not found", error.clone())
                    }
                },
                "patch": {
                    "summary": "Update a book's title",
                    "tags": ["Books"],
                    "parameters": id_param.clone(),
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/UpdateBook" } } }
                    },
                    "responses": {
                        "200": json_response("Book updated successfully", envelope_schema(book.clone())),
                        "400": json_response("Validation error or book not found", error.clone())
                    }
                },
                "delete": {
                    "summary": "Soft-delete a book",
                    "tags": ["Books"],
                    "parameters": id_param,
                    "responses": {
                        "200": json_response("Book deleted successfully", envelope_schema(book)),
                        "400": json_response("Book not found", error)
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "title": { "type": "string", "maxLength": 50 },
                        "isbn": { "type": "string", "description": "ISBN-13" },
                        "createdAt": { "type": "string", "format": "date-time" },
                        "updatedAt": { "type": "string", "format": "date-time" },
                        "deletedAt": { "type": ["string", "null"], "format": "date-time" }
                    },
                    "required": ["id", "title", "isbn", "createdAt", "updatedAt"]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "maxLength": 50 },
                        "isbn": { "type": "string", "description": "ISBN-13" }
                    },
                    "required": ["title", "isbn"]
                },
                "UpdateBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "maxLength": 50 }
                    }
                }
            }
        }
    })
}

/// Create the books module around a repository
pub fn create_module(repo: Arc<dyn BookRepository>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(Arc::new(BookService::new(repo))))
}
