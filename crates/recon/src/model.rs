use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::duration::parse_duration;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One athlete chosen on one provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    pub external_id: String,
    pub provider: String,
}

impl Selection {
    pub fn new(external_id: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            provider: provider.into(),
        }
    }
}

/// A provider search hit. Identity is (provider, external_id).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub provider: String,
    pub external_id: String,
    pub name: String,
    pub school: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub url: Option<String>,
}

/// Search hits from one provider, in provider order.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSearch {
    pub provider: String,
    pub display_name: String,
    pub results: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Raw (per-provider) records
// ---------------------------------------------------------------------------

/// Identity fields and performance stubs returned by a provider's athlete
/// lookup, before the per-performance detail trips.
#[derive(Debug, Clone, Default)]
pub struct AthleteDetail {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub urls: Vec<String>,
    pub pfp_url: Option<String>,
    pub performances: Vec<RawPerformanceRecord>,
}

/// Fields filled in by a performance's second round-trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceDetail {
    pub meet: Option<String>,
    pub date: Option<NaiveDate>,
}

/// One provider's view of an athlete.
#[derive(Debug, Clone, Serialize)]
pub struct RawAthleteRecord {
    pub provider: String,
    pub external_id: String,
    #[serde(skip)]
    pub(crate) loaded: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub urls: Vec<String>,
    pub pfp_url: Option<String>,
    pub performances: Vec<RawPerformanceRecord>,
}

impl RawAthleteRecord {
    pub fn new(provider: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            external_id: external_id.into(),
            loaded: false,
            first_name: None,
            last_name: None,
            gender: None,
            urls: Vec::new(),
            pfp_url: None,
            performances: Vec::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn full_name(&self) -> Option<String> {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
    }

    pub(crate) fn apply(&mut self, detail: AthleteDetail) {
        self.first_name = detail.first_name;
        self.last_name = detail.last_name;
        self.gender = detail.gender;
        self.urls = detail.urls;
        self.pfp_url = detail.pfp_url;
        self.performances = detail.performances;
    }
}

/// One provider's view of a single result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawPerformanceRecord {
    pub provider: String,
    #[serde(skip)]
    pub(crate) loaded: bool,
    /// Provider's own result id, when it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_id: Option<String>,
    /// Time exactly as the provider formats it.
    pub time: Option<String>,
    pub meet: Option<String>,
    pub date: Option<NaiveDate>,
    /// Normalized event label.
    pub event: Option<String>,
    pub meters: Option<f64>,
    /// Opaque handle for the provider's detail trip (e.g. a meet id).
    #[serde(skip)]
    pub detail_ref: Option<String>,
}

impl RawPerformanceRecord {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            loaded: false,
            result_id: None,
            time: None,
            meet: None,
            date: None,
            event: None,
            meters: None,
            detail_ref: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Seconds parsed from the raw time, computed on demand.
    pub fn time_seconds(&self) -> Option<f64> {
        self.time.as_deref().and_then(parse_duration)
    }

    /// Exact identity key used to decide which records describe one result.
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            date: self.date.map(|d| d.to_string()),
            event: self.event.clone(),
            meters: self.meters.map(OrderedFloat),
        }
    }
}

/// Exact (not approximate) grouping triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub date: Option<String>,
    pub event: Option<String>,
    pub meters: Option<OrderedFloat<f64>>,
}

// ---------------------------------------------------------------------------
// Canonical output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CanonicalPerformance {
    pub meet: Option<String>,
    pub date: Option<NaiveDate>,
    pub event: Option<String>,
    pub meters: Option<f64>,
    pub time: Option<String>,
    /// Derived from `time` once at merge; never voted on.
    pub time_seconds: Option<f64>,
    pub sources: Vec<RawPerformanceRecord>,
}

impl CanonicalPerformance {
    /// Contributing provider ids, sorted and deduplicated.
    pub fn providers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sources.iter().map(|s| s.provider.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// A per-source failure tolerated under the best-effort load policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadWarning {
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CanonicalAthlete {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub urls: Vec<String>,
    pub pfp_url: Option<String>,
    pub times: Vec<CanonicalPerformance>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<LoadWarning>,
}

pub(crate) fn join_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [first, last]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
