use std::collections::HashMap;

use serde::Deserialize;

use crate::error::ReconError;
use crate::provider::ProviderRegistry;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default)]
    pub load_policy: LoadPolicy,
    /// Per-provider settings keyed by provider id. Providers without an
    /// entry use the defaults.
    #[serde(default)]
    pub providers: HashMap<String, ProviderSettings>,
    /// Cap on each provider's search listing. 0 means unlimited.
    #[serde(default)]
    pub default_max_search_results: usize,
}

// ---------------------------------------------------------------------------
// Load policy
// ---------------------------------------------------------------------------

/// How the load phase treats a failing sub-load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Any failure aborts the reconcile.
    #[default]
    AllOrNothing,
    /// Failed athletes and performances are dropped and reported as warnings.
    BestEffort,
}

impl std::fmt::Display for LoadPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllOrNothing => write!(f, "all_or_nothing"),
            Self::BestEffort => write!(f, "best_effort"),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    /// Disabled providers take no part in search or query lookup. Explicit
    /// selections naming them still load.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Overrides `default_max_search_results` for this provider.
    #[serde(default)]
    pub max_search_results: Option<usize>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_search_results: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for id in self.providers.keys() {
            if id.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "provider id in [providers] must not be empty".into(),
                ));
            }
        }

        if !self.providers.is_empty() && self.providers.values().all(|p| !p.enabled) {
            log::warn!("every configured provider is disabled; query lookup will find nothing");
        }

        Ok(())
    }

    /// Every `[providers.<id>]` table must name a registered provider.
    pub fn validate_against(&self, registry: &ProviderRegistry) -> Result<(), ReconError> {
        let mut unknown: Vec<&str> = self
            .providers
            .keys()
            .map(String::as_str)
            .filter(|id| registry.get(id).is_none())
            .collect();
        if unknown.is_empty() {
            return Ok(());
        }
        unknown.sort_unstable();
        Err(ReconError::ConfigValidation(format!(
            "settings for unregistered provider(s): {} (registered: {})",
            unknown.join(", "),
            registry.ids().join(", ")
        )))
    }

    pub fn is_enabled(&self, provider: &str) -> bool {
        self.providers.get(provider).map_or(true, |p| p.enabled)
    }

    /// `None` when the listing is unlimited.
    pub fn search_limit(&self, provider: &str) -> Option<usize> {
        let limit = self
            .providers
            .get(provider)
            .and_then(|p| p.max_search_results)
            .unwrap_or(self.default_max_search_results);
        (limit > 0).then_some(limit)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
