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
use models::Categories;

/// Gateway module for `/api/categories`. Independent of books.
pub struct CategoriesModule {
    gateway: ResourceGateway<Categories>,
}

impl CategoriesModule {
    pub fn new(upstream: Upstream) -> Self {
        Self {
            gateway: ResourceGateway::new(upstream),
        }
    }
}

#[async_trait]
impl Module for CategoriesModule {
    fn name(&self) -> &'static str {
        "categories"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "categories module initialized");
        Ok(())
    }

    fn routes(&self) -> Router {
        self.gateway.clone().routes()
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": crud_paths::<Categories>("Category", "CategoryFields", ListShape::Bare),
            "components": {
                "schemas": {
                    "Category": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "name": { "type": "string" }
                        },
                        "required": ["id", "name"]
                    },
                    "CategoryFields": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "minLength": 1 }
                        },
                        "required": ["name"]
                    }
                }
            }
        }))
    }
}

pub fn create_module(upstream: Upstream) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(CategoriesModule::new(upstream))
}
