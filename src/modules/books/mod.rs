pub mod models;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

use crate::gateway::{
    openapi::{crud_paths, ListShape},
    upstream::Upstream,
    ResourceGateway,
};
use models::Books;

/// Gateway module for `/api/books`.
pub struct BooksModule {
    gateway: ResourceGateway<Books>,
}

impl BooksModule {
    pub fn new(upstream: Upstream) -> Self {
        Self {
            gateway: ResourceGateway::new(upstream),
        }
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
            backend = %ctx.settings.backend.origin,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        self.gateway.clone().routes()
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": crud_paths::<Books>("Book", "BookFields", ListShape::Wrapped),
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Backend-assigned identifier"
                            },
                            "title": {
                                "type": "string",
                                "description": "Title of the book"
                            },
                            "author": {
                                "type": "string",
                                "description": "Author of the book"
                            },
                            "category": {
                                "type": "string",
                                "description": "Free-text category label, absent on older records"
                            }
                        },
                        "required": ["id", "title", "author"]
                    },
                    "BookFields": {
                        "type": "object",
                        "properties": {
                            "title": {
                                "type": "string",
                                "minLength": 1
                            },
                            "author": {
                                "type": "string",
                                "minLength": 1
                            },
                            "category": {
                                "type": "string"
                            }
                        },
                        "required": ["title", "author"]
                    }
                }
            }
        }))
    }
}

/// Create a new instance of the books module
pub fn create_module(upstream: Upstream) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(upstream))
}
