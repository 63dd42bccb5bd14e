//! Bookshelf application library
//!
//! The gateway modules that front the catalog backend, the resource contract
//! they share, and the typed client used by front ends.

pub mod client;
pub mod gateway;
pub mod modules;
pub mod resource;
pub mod utils;

use axum::Router;
use bookshelf_kernel::{settings::Settings, ModuleRegistry};

/// Re-export commonly used types
pub use modules::books::models::{Book, BookFields, Books};
pub use modules::categories::models::{Categories, Category, CategoryFields};
pub use resource::{Resource, ResourceId};

/// A registry holding every resource module, wired to the configured backend.
pub fn registry(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings)?;
    Ok(registry)
}

/// The complete gateway router for `settings`.
pub fn app(settings: &Settings) -> anyhow::Result<Router> {
    let registry = registry(settings)?;
    Ok(bookshelf_http::build_router(&registry, settings))
}
