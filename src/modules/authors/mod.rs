pub mod models;
pub mod routes;
pub mod service;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};
use serde_json::json;

pub use models::{Author, AuthorId, AuthorSummary, AuthorUpdateRequest};
pub use service::AuthorService;
pub use store::{AuthorStore, AuthorStoreArc, SqliteAuthorStore};

/// Authors catalog module
pub struct AuthorsModule {
    service: Arc<AuthorService>,
}

impl AuthorsModule {
    pub fn new(service: Arc<AuthorService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(Arc::clone(&self.service))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({
            "description": "Error",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });
        let author = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Author" }
                    }
                }
            })
        };
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {
                                "description": "All authors",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Author" }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create author",
                        "tags": ["Authors"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Author" }
                                }
                            }
                        },
                        "responses": {
                            "201": author("Author created"),
                            "400": error.clone()
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get author",
                        "tags": ["Authors"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": author("Author"),
                            "404": error.clone()
                        }
                    },
                    "put": {
                        "summary": "Replace author",
                        "tags": ["Authors"],
                        "parameters": [id_param.clone()],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Author" }
                                }
                            }
                        },
                        "responses": {
                            "200": author("Author replaced"),
                            "400": error.clone()
                        }
                    },
                    "patch": {
                        "summary": "Update selected author fields",
                        "tags": ["Authors"],
                        "parameters": [id_param.clone()],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/AuthorUpdateRequest" }
                                }
                            }
                        },
                        "responses": {
                            "200": author("Author updated"),
                            "400": error
                        }
                    },
                    "delete": {
                        "summary": "Delete author",
                        "tags": ["Authors"],
                        "parameters": [id_param],
                        "responses": {
                            "204": { "description": "Deleted or already absent" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Assigned by the server; must be absent on create"
                            },
                            "name": { "type": "string" },
                            "age": { "type": "integer", "format": "int32" },
                            "description": { "type": "string" },
                            "image": { "type": "string" }
                        },
                        "required": ["name", "age", "description", "image"]
                    },
                    "AuthorUpdateRequest": {
                        "type": "object",
                        "description": "Only provided fields are changed",
                        "properties": {
                            "name": { "type": "string" },
                            "age": { "type": "integer", "format": "int32" },
                            "description": { "type": "string" },
                            "image": { "type": "string" }
                        }
                    },
                    "AuthorSummary": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "name": { "type": "string" },
                            "image": { "type": "string" }
                        },
                        "required": ["id"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        migrations()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

pub(crate) fn migrations() -> Vec<Migration> {
    vec![Migration {
        id: "001_init",
        up: r#"
            CREATE TABLE author (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT    NOT NULL,
                age         INTEGER NOT NULL,
                description TEXT    NOT NULL,
                image       TEXT    NOT NULL
            );
            "#,
    }]
}

/// Create the authors module over the given store
pub fn create_module(store: AuthorStoreArc) -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(Arc::new(AuthorService::new(store))))
}
