//! Majority-vote resolution of one logical field across providers.
//!
//! Candidates are clustered first-seen: each candidate joins the first
//! existing class whose representative it is equivalent to. Approximate
//! equality is not transitive, so two values that are each close to a third
//! can land in different classes depending on arrival order. That is the
//! accepted behavior; see `first_seen_clustering_is_not_transitive`.

use regex::Regex;

use crate::collate;
use crate::value::{FieldValue, ValueKind};

/// Absolute tolerance under which two numbers are the same observation.
pub const NUMBER_TOLERANCE: f64 = 1e-5;

pub type Comparator = fn(&FieldValue, &FieldValue) -> bool;

/// Eligibility filter applied before voting.
pub enum Filter {
    /// Non-empty text, non-zero number, any date.
    Truthy,
    /// Only candidates of this kind.
    Kind(ValueKind),
    /// Only text candidates the regex finds a match in.
    Pattern(Regex),
    Predicate(Box<dyn Fn(&FieldValue) -> bool + Send + Sync>),
}

impl Filter {
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match self {
            Filter::Truthy => value.is_truthy(),
            Filter::Kind(kind) => value.kind() == *kind,
            Filter::Pattern(re) => value.as_text().is_some_and(|s| re.is_match(s)),
            Filter::Predicate(predicate) => predicate(value),
        }
    }
}

/// Different kinds are never equal. Text compares with search collation,
/// numbers within [`NUMBER_TOLERANCE`], everything else exactly.
pub fn approx_same(a: &FieldValue, b: &FieldValue) -> bool {
    match (a, b) {
        (FieldValue::Text(a), FieldValue::Text(b)) => collate::search_eq(a, b),
        (FieldValue::Number(a), FieldValue::Number(b)) => (a - b).abs() < NUMBER_TOLERANCE,
        (FieldValue::Date(a), FieldValue::Date(b)) => a == b,
        (FieldValue::Empty, FieldValue::Empty) => true,
        _ => false,
    }
}

/// Resolution options. Defaults: truthy filter, not forced, empty default,
/// [`approx_same`] comparator.
pub struct Resolver {
    filter: Option<Filter>,
    force_filter: bool,
    default: FieldValue,
    comparator: Comparator,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            filter: Some(Filter::Truthy),
            force_filter: false,
            default: FieldValue::Empty,
            comparator: approx_same,
        }
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Disable filtering entirely.
    pub fn unfiltered(mut self) -> Self {
        self.filter = None;
        self
    }

    pub fn kind(self, kind: ValueKind) -> Self {
        self.filter(Filter::Kind(kind))
    }

    pub fn pattern(self, re: Regex) -> Self {
        self.filter(Filter::Pattern(re))
    }

    pub fn force_filter(mut self, force: bool) -> Self {
        self.force_filter = force;
        self
    }

    pub fn default_value(mut self, default: FieldValue) -> Self {
        self.default = default;
        self
    }

    pub fn comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn resolve(&self, candidates: &[FieldValue]) -> FieldValue {
        if candidates.is_empty() {
            return self.default.clone();
        }
        // A lone unforced observation is trusted as-is.
        if !self.force_filter && candidates.len() == 1 {
            return candidates[0].clone();
        }

        let filtered: Vec<&FieldValue> = match &self.filter {
            Some(filter) => candidates.iter().filter(|v| filter.accepts(v)).collect(),
            None => candidates.iter().collect(),
        };

        let eligible = match filtered.len() {
            1 => return filtered[0].clone(),
            0 if self.force_filter => return self.default.clone(),
            0 => candidates.iter().collect(),
            _ => filtered,
        };

        let classes = self.cluster(&eligible);
        let mut best = &classes[0];
        for class in &classes[1..] {
            if outranks(class, best) {
                best = class;
            }
        }
        best.representative.clone()
    }

    fn cluster<'a>(&self, candidates: &[&'a FieldValue]) -> Vec<VoteClass<'a>> {
        let mut classes: Vec<VoteClass<'a>> = Vec::new();
        for &candidate in candidates {
            match classes
                .iter_mut()
                .find(|class| (self.comparator)(class.representative, candidate))
            {
                Some(class) => class.count += 1,
                None => classes.push(VoteClass { representative: candidate, count: 1 }),
            }
        }
        classes
    }
}

struct VoteClass<'a> {
    representative: &'a FieldValue,
    count: usize,
}

/// More votes wins; on a tie the longer text wins; otherwise first-seen stays.
fn outranks(a: &VoteClass<'_>, b: &VoteClass<'_>) -> bool {
    if a.count != b.count {
        return a.count > b.count;
    }
    match (a.representative.text_len(), b.representative.text_len()) {
        (Some(a_len), Some(b_len)) => a_len > b_len,
        _ => false,
    }
}

/// Resolve with default options.
pub fn resolve(candidates: &[FieldValue]) -> FieldValue {
    Resolver::new().resolve(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<FieldValue> {
        values.iter().map(|s| FieldValue::from(*s)).collect()
    }

    #[test]
    fn majority_wins() {
        assert_eq!(resolve(&texts(&["Tom", "Tom", "Jerry"])), FieldValue::from("Tom"));
        assert_eq!(resolve(&texts(&["Jerry", "Tom", "Tom"])), FieldValue::from("Tom"));
    }

    #[test]
    fn longer_text_breaks_ties() {
        assert_eq!(resolve(&texts(&["A", "BB"])), FieldValue::from("BB"));
    }

    #[test]
    fn equal_length_tie_keeps_first_seen() {
        assert_eq!(resolve(&texts(&["AB", "CD"])), FieldValue::from("AB"));
    }

    #[test]
    fn empty_returns_default() {
        assert_eq!(resolve(&[]), FieldValue::Empty);
        let r = Resolver::new().default_value(FieldValue::from("n/a"));
        assert_eq!(r.resolve(&[]), FieldValue::from("n/a"));
    }

    #[test]
    fn single_candidate_skips_filter() {
        let r = Resolver::new().kind(ValueKind::Number);
        assert_eq!(r.resolve(&texts(&["X"])), FieldValue::from("X"));
    }

    #[test]
    fn forced_single_candidate_is_filtered() {
        let r = Resolver::new()
            .kind(ValueKind::Number)
            .force_filter(true)
            .default_value(FieldValue::Number(-1.0));
        assert_eq!(r.resolve(&texts(&["X"])), FieldValue::Number(-1.0));
    }

    #[test]
    fn one_survivor_is_returned() {
        let r = Resolver::new().kind(ValueKind::Text);
        let candidates = vec![FieldValue::Empty, FieldValue::from("Jane"), FieldValue::Empty];
        assert_eq!(r.resolve(&candidates), FieldValue::from("Jane"));
    }

    #[test]
    fn unforced_filter_falls_back_to_all() {
        let r = Resolver::new().pattern(Regex::new(r"^(\d+:)?\d+\.\d\d$").unwrap());
        let candidates = texts(&["4:35.2", "4:35.2", "4:36"]);
        assert_eq!(r.resolve(&candidates), FieldValue::from("4:35.2"));
    }

    #[test]
    fn pattern_filter_prefers_well_formed() {
        let r = Resolver::new().pattern(Regex::new(r"^(\d+:)?\d+\.\d\d$").unwrap());
        let candidates = texts(&["4:35.2", "4:35.20", "4:35.2"]);
        assert_eq!(r.resolve(&candidates), FieldValue::from("4:35.20"));
    }

    #[test]
    fn text_votes_ignore_case_and_punctuation() {
        let candidates = texts(&["OBrien", "O'Brien", "Smith"]);
        assert_eq!(resolve(&candidates), FieldValue::from("OBrien"));
    }

    #[test]
    fn numbers_cluster_within_tolerance() {
        let candidates = vec![
            FieldValue::Number(1609.344),
            FieldValue::Number(1600.0),
            FieldValue::Number(1609.344000001),
        ];
        assert_eq!(resolve(&candidates), FieldValue::Number(1609.344));
    }

    #[test]
    fn kinds_never_equal() {
        assert!(!approx_same(&FieldValue::from("5000"), &FieldValue::Number(5000.0)));
        assert!(approx_same(&FieldValue::Empty, &FieldValue::Empty));
    }

    #[test]
    fn custom_comparator() {
        let exact: Comparator = |a, b| a == b;
        let r = Resolver::new().comparator(exact);
        assert_eq!(r.resolve(&texts(&["jane", "Jane", "Jane"])), FieldValue::from("Jane"));
    }

    #[test]
    fn first_seen_clustering_is_not_transitive() {
        // 1.0 ~ 1.000006 and 1.000006 ~ 1.000012, but 1.0 and 1.000012 are
        // more than the tolerance apart. Arrival order decides the classes.
        let candidates = vec![
            FieldValue::Number(1.0),
            FieldValue::Number(1.000012),
            FieldValue::Number(1.000006),
            FieldValue::Number(1.000012),
        ];
        // Classes: {1.0, 1.000006} and {1.000012, 1.000012}. Tied at two
        // votes, so the first-seen class stays on top.
        assert_eq!(resolve(&candidates), FieldValue::Number(1.0));
    }
}
