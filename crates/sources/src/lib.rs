//! `paceline-sources`: concrete provider support for the reconcile engine:
//! per-family event-code tables, mark cleanup, and a file-backed provider.

use std::path::PathBuf;
use std::sync::Arc;

use paceline_recon::{Provider, ProviderRegistry, ReconError};

pub mod events;
pub mod fixture;
pub mod marks;

pub use events::EventCodes;
pub use fixture::FixtureProvider;

/// Open each directory as a provider, registered in argument order.
pub fn open_registry<I, P>(dirs: I) -> Result<ProviderRegistry, ReconError>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut registry = ProviderRegistry::new();
    for dir in dirs {
        let provider = FixtureProvider::open(dir)?;
        log::debug!(
            "registered '{}' from {} ({} codes)",
            provider.id(),
            provider.root().display(),
            provider.event_codes()
        );
        registry.register(Arc::new(provider))?;
    }
    Ok(registry)
}
