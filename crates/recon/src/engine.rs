use futures::future::{join_all, try_join_all};

use crate::config::{LoadPolicy, ReconConfig};
use crate::error::ReconError;
use crate::load::top_hit;
use crate::merge::assemble;
use crate::model::{CanonicalAthlete, LoadWarning, ProviderSearch, RawAthleteRecord, Selection};
use crate::provider::{Provider, ProviderRegistry};

/// Entry point tying a provider registry to a config. Holds no per-request
/// state; every call is an independent Load, Group, Merge+Sort run.
#[derive(Debug, Clone)]
pub struct Reconciler {
    registry: ProviderRegistry,
    config: ReconConfig,
}

impl Reconciler {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            config: ReconConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReconConfig) -> Self {
        self.config = config;
        self
    }

    fn enabled(&self) -> impl Iterator<Item = &dyn Provider> {
        self.registry
            .iter()
            .filter(|p| self.config.is_enabled(p.id()))
    }

    // ---- search ----

    /// Search every enabled provider concurrently. A failing provider yields
    /// an empty listing with its error attached instead of failing the call.
    pub async fn search_all(&self, query: &str) -> Vec<ProviderSearch> {
        let searches = self.enabled().map(|provider| async move {
            let mut listing = ProviderSearch {
                provider: provider.id().to_string(),
                display_name: provider.display_name().to_string(),
                results: Vec::new(),
                error: None,
            };
            match provider.search(query).await {
                Ok(mut results) => {
                    if let Some(limit) = self.config.search_limit(provider.id()) {
                        results.truncate(limit);
                    }
                    listing.results = results;
                }
                Err(e) => {
                    log::warn!("search on '{}' failed: {e}", provider.id());
                    listing.error = Some(e.to_string());
                }
            }
            listing
        });
        join_all(searches).await
    }

    // ---- reconcile ----

    /// Reconcile explicit (external id, provider id) selections. Every
    /// provider id is resolved before anything loads.
    pub async fn reconcile(&self, selections: &[Selection]) -> Result<CanonicalAthlete, ReconError> {
        let providers = selections
            .iter()
            .map(|s| self.registry.require(&s.provider))
            .collect::<Result<Vec<_>, _>>()?;
        let records = selections
            .iter()
            .map(|s| RawAthleteRecord::new(&s.provider, &s.external_id))
            .collect();

        log::info!(
            "reconciling {} selection(s) with policy {}",
            selections.len(),
            self.config.load_policy
        );
        let (loaded, warnings) = self.load_all(providers, records).await?;
        Ok(assemble(loaded, warnings))
    }

    /// Search every enabled provider and reconcile each one's top hit.
    /// Providers without a hit are skipped.
    pub async fn reconcile_by_query(&self, query: &str) -> Result<CanonicalAthlete, ReconError> {
        let providers: Vec<&dyn Provider> = self.enabled().collect();
        let hits = join_all(providers.iter().map(|p| top_hit(*p, query))).await;

        let mut selections = Vec::new();
        let mut warnings = Vec::new();
        for (provider, hit) in providers.iter().zip(hits) {
            match hit {
                Ok(Some(hit)) => selections.push(Selection::new(hit.external_id, provider.id())),
                Ok(None) => {}
                Err(e) if self.config.load_policy == LoadPolicy::BestEffort => {
                    log::warn!("skipping '{}': {e}", provider.id());
                    warnings.push(LoadWarning {
                        provider: provider.id().to_string(),
                        external_id: None,
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        if selections.is_empty() {
            return Err(ReconError::NoSearchResults(query.to_string()));
        }

        let mut athlete = self.reconcile(&selections).await?;
        warnings.append(&mut athlete.warnings);
        athlete.warnings = warnings;
        Ok(athlete)
    }

    // ---- load phase ----

    async fn load_all(
        &self,
        providers: Vec<&dyn Provider>,
        mut records: Vec<RawAthleteRecord>,
    ) -> Result<(Vec<RawAthleteRecord>, Vec<LoadWarning>), ReconError> {
        match self.config.load_policy {
            LoadPolicy::AllOrNothing => {
                try_join_all(
                    records
                        .iter_mut()
                        .zip(&providers)
                        .map(|(record, provider)| record.load(*provider)),
                )
                .await?;
                Ok((records, Vec::new()))
            }
            LoadPolicy::BestEffort => {
                let outcomes = join_all(
                    records
                        .iter_mut()
                        .zip(&providers)
                        .map(|(record, provider)| record.load_tolerant(*provider)),
                )
                .await;

                let attempted = records.len();
                let mut kept = Vec::with_capacity(attempted);
                let mut warnings = Vec::new();
                for (record, outcome) in records.into_iter().zip(outcomes) {
                    match outcome {
                        Ok(mut partial) => {
                            warnings.append(&mut partial);
                            kept.push(record);
                        }
                        Err(e) => {
                            log::warn!(
                                "dropping athlete {} from '{}': {e}",
                                record.external_id,
                                record.provider
                            );
                            warnings.push(LoadWarning {
                                provider: record.provider,
                                external_id: Some(record.external_id),
                                message: e.to_string(),
                            });
                        }
                    }
                }

                if attempted > 0 && kept.is_empty() {
                    return Err(ReconError::NothingLoaded { failures: attempted });
                }
                Ok((kept, warnings))
            }
        }
    }
}
