//! Merge phase: one canonical value per field, resolved by majority over the
//! group's (or athlete's) per-provider observations.

use std::sync::OnceLock;

use regex::Regex;

use crate::consensus::Resolver;
use crate::duration::parse_duration;
use crate::group::group_performances;
use crate::model::{
    join_name, CanonicalAthlete, CanonicalPerformance, LoadWarning, RawAthleteRecord,
    RawPerformanceRecord,
};
use crate::sort::sort_performances;
use crate::value::{FieldValue, ValueKind};

fn time_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+:)?\d+\.\d\d$").expect("time pattern"))
}

fn gender_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[MF]$").expect("gender pattern"))
}

fn observe<'a, T, F>(items: impl IntoIterator<Item = &'a T>, field: F) -> Vec<FieldValue>
where
    T: 'a,
    F: Fn(&'a T) -> FieldValue,
{
    items.into_iter().map(field).collect()
}

fn text(value: &Option<String>) -> FieldValue {
    FieldValue::from(value.clone())
}

/// Merge one group of raw performances. `sources` must be non-empty.
pub fn merge_group(sources: Vec<RawPerformanceRecord>) -> CanonicalPerformance {
    let text_only = Resolver::new().kind(ValueKind::Text);

    let meet = text_only.resolve(&observe(&sources, |p| text(&p.meet))).into_text();
    let event = text_only.resolve(&observe(&sources, |p| text(&p.event))).into_text();
    let date = Resolver::new()
        .kind(ValueKind::Date)
        .resolve(&observe(&sources, |p| FieldValue::from(p.date)))
        .as_date();
    let meters = Resolver::new()
        .kind(ValueKind::Number)
        .resolve(&observe(&sources, |p| FieldValue::from(p.meters)))
        .as_number();
    let time = Resolver::new()
        .pattern(time_pattern().clone())
        .resolve(&observe(&sources, |p| text(&p.time)))
        .into_text();

    let time_seconds = time.as_deref().and_then(parse_duration);

    CanonicalPerformance {
        meet,
        date,
        event,
        meters,
        time,
        time_seconds,
        sources,
    }
}

/// Resolve identity fields over the per-provider athletes. URLs are
/// concatenated in record order without deduplication.
pub fn merge_identity(records: &[RawAthleteRecord]) -> CanonicalAthlete {
    let text_only = Resolver::new().kind(ValueKind::Text);

    let first_name = text_only
        .resolve(&observe(records, |a| text(&a.first_name)))
        .into_text();
    let last_name = text_only
        .resolve(&observe(records, |a| text(&a.last_name)))
        .into_text();
    let pfp_url = text_only
        .resolve(&observe(records, |a| text(&a.pfp_url)))
        .into_text();
    let gender = Resolver::new()
        .pattern(gender_pattern().clone())
        .resolve(&observe(records, |a| text(&a.gender)))
        .into_text();

    let urls = records.iter().flat_map(|a| a.urls.iter().cloned()).collect();
    let full_name = join_name(first_name.as_deref(), last_name.as_deref());

    CanonicalAthlete {
        first_name,
        last_name,
        full_name,
        gender,
        urls,
        pfp_url,
        times: Vec::new(),
        warnings: Vec::new(),
    }
}

/// Group, merge and sort loaded records into one canonical athlete.
pub fn assemble(records: Vec<RawAthleteRecord>, warnings: Vec<LoadWarning>) -> CanonicalAthlete {
    let mut athlete = merge_identity(&records);

    let raw = records.into_iter().flat_map(|a| a.performances);
    let mut times: Vec<CanonicalPerformance> =
        group_performances(raw).into_iter().map(merge_group).collect();
    sort_performances(&mut times);

    athlete.times = times;
    athlete.warnings = warnings;
    athlete
}
