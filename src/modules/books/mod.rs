pub mod models;
pub mod routes;
pub mod service;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use crate::modules::authors::AuthorStoreArc;

pub use models::{Book, BookSummary, BookUpdateRequest, UpsertResult};
pub use service::BookService;
pub use store::{BookStore, BookStoreArc, SqliteBookStore};

/// Books catalog module, keyed by ISBN
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
        routes::router(Arc::clone(&self.service))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let book = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Book" }
                    }
                }
            })
        };
        let isbn_param = json!({
            "name": "isbn",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "author",
                            "in": "query",
                            "required": false,
                            "description": "Only books written by this author",
                            "schema": { "type": "integer", "format": "int64" }
                        }],
                        "responses": {
                            "200": {
                                "description": "Matching books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "500": error("Stored book has an unpersisted author")
                        }
                    }
                },
                "/{isbn}": {
                    "put": {
                        "summary": "Create or replace book",
                        "tags": ["Books"],
                        "parameters": [isbn_param.clone()],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookSummary" }
                                }
                            }
                        },
                        "responses": {
                            "201": book("Book created"),
                            "200": book("Book replaced"),
                            "400": error("Referenced author does not exist"),
                            "500": error("Referenced author has no id")
                        }
                    },
                    "get": {
                        "summary": "Get book",
                        "tags": ["Books"],
                        "parameters": [isbn_param.clone()],
                        "responses": {
                            "200": book("Book"),
                            "404": error("Book not found")
                        }
                    },
                    "patch": {
                        "summary": "Update selected book fields",
                        "tags": ["Books"],
                        "parameters": [isbn_param.clone()],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookUpdateRequest" }
                                }
                            }
                        },
                        "responses": {
                            "200": book("Book updated"),
                            "400": error("Book does not exist")
                        }
                    },
                    "delete": {
                        "summary": "Delete book",
                        "tags": ["Books"],
                        "parameters": [isbn_param],
                        "responses": {
                            "204": { "description": "Deleted or already absent" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "isbn": { "type": "string" },
                            "title": { "type": "string" },
                            "description": { "type": "string" },
                            "image": { "type": "string" },
                            "author": { "$ref": "#/components/schemas/AuthorSummary" }
                        },
                        "required": ["isbn", "title", "description", "image", "author"]
                    },
                    "BookSummary": {
                        "type": "object",
                        "properties": {
                            "isbn": {
                                "type": "string",
                                "description": "Ignored; the path ISBN is used"
                            },
                            "title": { "type": "string" },
                            "description": { "type": "string" },
                            "image": { "type": "string" },
                            "author": { "$ref": "#/components/schemas/AuthorSummary" }
                        },
                        "required": ["title", "description", "image", "author"]
                    },
                    "BookUpdateRequest": {
                        "type": "object",
                        "description": "Only provided fields are changed",
                        "properties": {
                            "title": { "type": "string" },
                            "description": { "type": "string" },
                            "image": { "type": "string" }
                        }
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        migrations()
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

pub(crate) fn migrations() -> Vec<Migration> {
    vec![Migration {
        id: "001_init",
        up: r#"
            CREATE TABLE book (
                isbn        TEXT    PRIMARY KEY NOT NULL,
                title       TEXT    NOT NULL,
                description TEXT    NOT NULL,
                image       TEXT    NOT NULL,
                author_id   INTEGER NOT NULL REFERENCES author(id)
            );
            CREATE INDEX book_author_id ON book(author_id);
            "#,
    }]
}

/// Create the books module; author references resolve through `authors`
pub fn create_module(books: BookStoreArc, authors: AuthorStoreArc) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(Arc::new(BookService::new(books, authors))))
}
