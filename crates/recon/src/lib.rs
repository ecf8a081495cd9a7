//! `paceline-recon`: multi-source athlete record reconciliation engine.
//!
//! Pure engine crate: providers are trait objects supplied by the caller,
//! and results are plain serializable values. No network or file IO.

pub mod collate;
pub mod config;
pub mod consensus;
pub mod duration;
pub mod engine;
pub mod error;
pub mod format;
pub mod group;
pub mod load;
pub mod matcher;
pub mod merge;
pub mod model;
pub mod provider;
pub mod sort;
pub mod value;

pub use config::{LoadPolicy, ReconConfig};
pub use consensus::{resolve, Resolver};
pub use duration::parse_duration;
pub use engine::Reconciler;
pub use error::ReconError;
pub use load::{find_athlete, load_athlete};
pub use matcher::{evaluate_matchers, MatcherTable};
pub use model::{
    AthleteDetail, CanonicalAthlete, CanonicalPerformance, LoadWarning, PerformanceDetail,
    ProviderSearch, RawAthleteRecord, RawPerformanceRecord, SearchResult, Selection,
};
pub use provider::{Provider, ProviderRegistry};
pub use value::{FieldValue, ValueKind};
