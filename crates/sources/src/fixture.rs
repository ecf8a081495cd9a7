//! A provider served from a directory of pre-decoded provider dumps.
//!
//! ```text
//! <dir>/provider.toml          id, display_name, event_codes
//! <dir>/search.json            [SearchEntry]
//! <dir>/athletes/<id>.json     AthleteFile
//! <dir>/details/<ref>.json     DetailFile (optional, second-trip providers)
//! ```
//!
//! File reads run on smol's blocking pool so concurrent loads overlap.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use paceline_recon::collate::search_key;
use paceline_recon::{
    AthleteDetail, PerformanceDetail, Provider, RawPerformanceRecord, ReconError, SearchResult,
};

use crate::events::{xc_code, EventCodes};

pub const MANIFEST_FILE: &str = "provider.toml";

// ---------------------------------------------------------------------------
// On-disk shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderManifest {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub event_codes: EventCodes,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    external_id: String,
    name: String,
    school: Option<String>,
    city: Option<String>,
    state: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AthleteFile {
    first_name: Option<String>,
    last_name: Option<String>,
    gender: Option<String>,
    #[serde(default)]
    urls: Vec<String>,
    pfp_url: Option<String>,
    #[serde(default)]
    performances: Vec<PerformanceEntry>,
}

/// One result as the provider dumps it. Track events carry `event_code`;
/// cross-country results carry `distance` and `units` instead.
#[derive(Debug, Deserialize)]
struct PerformanceEntry {
    id: Option<String>,
    mark: Option<String>,
    event_code: Option<String>,
    distance: Option<f64>,
    units: Option<String>,
    meters: Option<f64>,
    meet: Option<String>,
    date: Option<NaiveDate>,
    meet_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailFile {
    meet: Option<String>,
    date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FixtureProvider {
    root: PathBuf,
    id: String,
    display_name: String,
    codes: EventCodes,
}

impl FixtureProvider {
    /// Read `provider.toml` from `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ReconError> {
        let root = root.into();
        let manifest_path = root.join(MANIFEST_FILE);
        let text = std::fs::read_to_string(&manifest_path)
            .map_err(|e| ReconError::Io(format!("{}: {e}", manifest_path.display())))?;
        let manifest: ProviderManifest = toml::from_str(&text)
            .map_err(|e| ReconError::ConfigParse(format!("{}: {e}", manifest_path.display())))?;
        if manifest.id.trim().is_empty() {
            return Err(ReconError::ConfigValidation(format!(
                "{}: id must not be empty",
                manifest_path.display()
            )));
        }
        Ok(Self::from_manifest(root, manifest))
    }

    pub fn from_manifest(root: impl Into<PathBuf>, manifest: ProviderManifest) -> Self {
        let display_name = manifest.display_name.unwrap_or_else(|| manifest.id.clone());
        Self {
            root: root.into(),
            id: manifest.id,
            display_name,
            codes: manifest.event_codes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn event_codes(&self) -> EventCodes {
        self.codes
    }

    fn fail(&self, external_id: Option<&str>, message: impl Into<String>) -> ReconError {
        ReconError::fetch(&self.id, external_id, message)
    }

    /// `Ok(None)` when the file does not exist.
    async fn read_json<T: DeserializeOwned>(
        &self,
        relative: PathBuf,
        external_id: Option<&str>,
    ) -> Result<Option<T>, ReconError> {
        let path = self.root.join(&relative);
        let read_path = path.clone();
        let text = smol::unblock(move || std::fs::read_to_string(read_path)).await;
        let text = match text {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.fail(external_id, format!("{}: {e}", path.display()))),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| self.fail(external_id, format!("{}: {e}", path.display())))
    }

    fn performance(&self, entry: PerformanceEntry) -> RawPerformanceRecord {
        let code = match (entry.event_code, entry.distance, entry.units.as_deref()) {
            (Some(code), _, _) => Some(code),
            (None, Some(distance), Some(units)) => Some(xc_code(distance, units)),
            _ => None,
        };

        let mut record = RawPerformanceRecord::new(&self.id);
        record.result_id = entry.id;
        record.time = entry.mark.map(|m| self.codes.clean_mark(&m));
        record.event = code.as_deref().map(|c| self.codes.label(c));
        record.meters = code
            .as_deref()
            .and_then(|c| self.codes.meters(c))
            .or(entry.meters);
        record.meet = entry.meet.map(|m| m.trim().to_string());
        record.date = entry.date;
        record.detail_ref = entry.meet_ref;
        record
    }
}

/// Ids and refs become file names, so they may not leave their directory.
fn safe_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

fn matches_query(tokens: &[String], name: &str) -> bool {
    let key = search_key(name);
    tokens.iter().all(|t| key.contains(t.as_str()))
}

impl Provider for FixtureProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<SearchResult>, ReconError>> {
        async move {
            let entries: Vec<SearchEntry> = self
                .read_json(PathBuf::from("search.json"), None)
                .await?
                .unwrap_or_default();
            let tokens: Vec<String> = query
                .split_whitespace()
                .map(search_key)
                .filter(|t| !t.is_empty())
                .collect();

            let results: Vec<SearchResult> = entries
                .into_iter()
                .filter(|e| matches_query(&tokens, &e.name))
                .map(|e| SearchResult {
                    provider: self.id.clone(),
                    external_id: e.external_id,
                    name: e.name,
                    school: e.school,
                    city: e.city,
                    state: e.state,
                    url: e.url,
                })
                .collect();
            log::debug!("'{}' search {query:?}: {} hit(s)", self.id, results.len());
            Ok(results)
        }
        .boxed()
    }

    fn fetch_athlete<'a>(
        &'a self,
        external_id: &'a str,
    ) -> BoxFuture<'a, Result<AthleteDetail, ReconError>> {
        async move {
            if !safe_name(external_id) {
                return Err(self.fail(Some(external_id), "invalid athlete id"));
            }
            let relative = Path::new("athletes").join(format!("{external_id}.json"));
            let file: AthleteFile = self
                .read_json(relative, Some(external_id))
                .await?
                .ok_or_else(|| self.fail(Some(external_id), "athlete not found"))?;

            Ok(AthleteDetail {
                first_name: file.first_name,
                last_name: file.last_name,
                gender: file.gender,
                urls: file.urls,
                pfp_url: file.pfp_url,
                performances: file
                    .performances
                    .into_iter()
                    .map(|entry| self.performance(entry))
                    .collect(),
            })
        }
        .boxed()
    }

    fn fetch_performance_detail<'a>(
        &'a self,
        performance: &'a RawPerformanceRecord,
    ) -> BoxFuture<'a, Result<PerformanceDetail, ReconError>> {
        async move {
            let Some(detail_ref) = performance.detail_ref.as_deref() else {
                return Ok(PerformanceDetail {
                    meet: performance.meet.clone(),
                    date: performance.date,
                });
            };
            if !safe_name(detail_ref) {
                return Err(self.fail(None, format!("invalid detail ref '{detail_ref}'")));
            }
            let relative = Path::new("details").join(format!("{detail_ref}.json"));
            let detail: DetailFile = self
                .read_json(relative, None)
                .await?
                .ok_or_else(|| self.fail(None, format!("detail '{detail_ref}' not found")))?;

            // A detail file may omit the meet name when the result already
            // carries it.
            Ok(PerformanceDetail {
                meet: detail
                    .meet
                    .map(|m| m.trim().to_string())
                    .or_else(|| performance.meet.clone()),
                date: detail.date.or(performance.date),
            })
        }
        .boxed()
    }
}
