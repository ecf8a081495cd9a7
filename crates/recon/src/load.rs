//! Single-shot loading of raw records.
//!
//! A record loads at most once. A second `load` logs a warning and returns
//! without touching the record. Performance detail trips for one athlete run
//! concurrently; each writes only its own record.

use futures::future::{join_all, try_join_all};

use crate::error::ReconError;
use crate::model::{LoadWarning, RawAthleteRecord, RawPerformanceRecord, SearchResult};
use crate::provider::Provider;

impl RawPerformanceRecord {
    /// Fill meet and date from the provider's detail trip.
    pub async fn load(&mut self, provider: &dyn Provider) -> Result<(), ReconError> {
        if self.loaded {
            log::warn!(
                "performance {} from '{}' is already loaded",
                self.result_id.as_deref().unwrap_or("?"),
                self.provider
            );
            return Ok(());
        }
        let detail = provider.fetch_performance_detail(self).await?;
        self.meet = detail.meet;
        self.date = detail.date;
        self.loaded = true;
        Ok(())
    }
}

impl RawAthleteRecord {
    /// Load identity and every performance detail. Nothing is written to the
    /// record unless every trip succeeds; on failure it stays unloaded and
    /// empty.
    pub async fn load(&mut self, provider: &dyn Provider) -> Result<(), ReconError> {
        if !self.begin_load(provider)? {
            return Ok(());
        }
        let mut detail = provider.fetch_athlete(&self.external_id).await?;
        try_join_all(detail.performances.iter_mut().map(|p| p.load(provider))).await?;

        self.apply(detail);
        self.loaded = true;
        log::debug!(
            "loaded athlete {} from '{}' with {} performance(s)",
            self.external_id,
            self.provider,
            self.performances.len()
        );
        Ok(())
    }

    /// Like [`load`](Self::load), but performances whose detail trip fails
    /// are dropped and reported instead of failing the athlete. The identity
    /// fetch itself still fails the call, leaving the record untouched.
    pub async fn load_tolerant(
        &mut self,
        provider: &dyn Provider,
    ) -> Result<Vec<LoadWarning>, ReconError> {
        if !self.begin_load(provider)? {
            return Ok(Vec::new());
        }
        let mut detail = provider.fetch_athlete(&self.external_id).await?;
        let outcomes = join_all(detail.performances.iter_mut().map(|p| p.load(provider))).await;

        let mut warnings = Vec::new();
        let mut keep = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Ok(()) => keep.push(true),
                Err(e) => {
                    log::warn!("dropping performance from '{}': {e}", self.provider);
                    warnings.push(LoadWarning {
                        provider: self.provider.clone(),
                        external_id: Some(self.external_id.clone()),
                        message: e.to_string(),
                    });
                    keep.push(false);
                }
            }
        }
        let mut keep = keep.into_iter();
        detail.performances.retain(|_| keep.next().unwrap_or(false));

        self.apply(detail);
        self.loaded = true;
        Ok(warnings)
    }

    /// `Ok(false)` when already loaded.
    fn begin_load(&self, provider: &dyn Provider) -> Result<bool, ReconError> {
        if self.loaded {
            log::warn!(
                "athlete {} from '{}' is already loaded",
                self.external_id,
                self.provider
            );
            return Ok(false);
        }
        if provider.id() != self.provider {
            return Err(ReconError::fetch(
                provider.id(),
                Some(&self.external_id),
                format!("record belongs to provider '{}'", self.provider),
            ));
        }
        Ok(true)
    }
}

/// Create and fully load one athlete.
pub async fn load_athlete(
    provider: &dyn Provider,
    external_id: &str,
) -> Result<RawAthleteRecord, ReconError> {
    let mut record = RawAthleteRecord::new(provider.id(), external_id);
    record.load(provider).await?;
    Ok(record)
}

/// Search and take the top hit. `Ok(None)` when the provider has no match.
pub async fn top_hit(provider: &dyn Provider, query: &str) -> Result<Option<SearchResult>, ReconError> {
    let mut results = provider.search(query).await?;
    if results.is_empty() {
        log::info!("'{}' has no results for {query:?}", provider.id());
        return Ok(None);
    }
    Ok(Some(results.swap_remove(0)))
}

/// Search one provider and load its top hit.
pub async fn find_athlete(
    provider: &dyn Provider,
    query: &str,
) -> Result<Option<RawAthleteRecord>, ReconError> {
    match top_hit(provider, query).await? {
        Some(hit) => load_athlete(provider, &hit.external_id).await.map(Some),
        None => Ok(None),
    }
}
