pub mod books;
pub mod categories;

use bookshelf_kernel::{settings::Settings, ModuleRegistry};

use crate::gateway::upstream::Upstream;

/// Register all resource modules, sharing one upstream connection pool
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    let upstream = Upstream::from_settings(&settings.backend)?;

    registry.register(books::create_module(upstream.clone()))?;
    registry.register(categories::create_module(upstream))?;
    Ok(())
}
