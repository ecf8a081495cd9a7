//! The contract every data source implements, and the registry the engine
//! resolves provider ids against.
//!
//! Providers are trait objects; the engine never names a concrete source.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::ReconError;
use crate::model::{AthleteDetail, PerformanceDetail, RawPerformanceRecord, SearchResult};

pub trait Provider: Send + Sync {
    /// Stable id used in selections (e.g. `"milesplit"`).
    fn id(&self) -> &str;

    fn display_name(&self) -> &str {
        self.id()
    }

    /// Ordered search hits for a free-text query.
    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<SearchResult>, ReconError>>;

    /// Identity fields plus performance stubs for one athlete.
    fn fetch_athlete<'a>(
        &'a self,
        external_id: &'a str,
    ) -> BoxFuture<'a, Result<AthleteDetail, ReconError>>;

    /// Second round-trip for one performance. Providers whose athlete lookup
    /// already carries meet and date keep this default.
    fn fetch_performance_detail<'a>(
        &'a self,
        performance: &'a RawPerformanceRecord,
    ) -> BoxFuture<'a, Result<PerformanceDetail, ReconError>> {
        let detail = PerformanceDetail {
            meet: performance.meet.clone(),
            date: performance.date,
        };
        futures::future::ready(Ok(detail)).boxed()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Ordered set of providers. Registration order is the provider order used
/// for query-based lookup and search listings.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn Provider>) -> Result<(), ReconError> {
        if self.get(provider.id()).is_some() {
            return Err(ReconError::DuplicateProvider(provider.id().to_string()));
        }
        self.providers.push(provider);
        Ok(())
    }

    pub fn with(mut self, provider: Arc<dyn Provider>) -> Result<Self, ReconError> {
        self.register(provider)?;
        Ok(self)
    }

    pub fn get(&self, id: &str) -> Option<&dyn Provider> {
        self.providers
            .iter()
            .find(|p| p.id() == id)
            .map(|p| p.as_ref())
    }

    pub fn require(&self, id: &str) -> Result<&dyn Provider, ReconError> {
        self.get(id)
            .ok_or_else(|| ReconError::UnknownProvider(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Provider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|p| p.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
