//! Timeline ordering for canonical performances.
//!
//! Each tier (date, then meters, then event label) is skipped when either
//! side lacks a value for it, so with partial absence the comparison is not a
//! total order. Sorting runs as a stable insertion sort, which gives a
//! deterministic result for any comparator and never panics on an
//! inconsistent one.

use std::cmp::Ordering;

use crate::collate::numeric_cmp;
use crate::model::CanonicalPerformance;

pub fn compare_performances(a: &CanonicalPerformance, b: &CanonicalPerformance) -> Ordering {
    if let (Some(x), Some(y)) = (a.date, b.date) {
        match x.cmp(&y) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }
    if let (Some(x), Some(y)) = (finite(a.meters), finite(b.meters)) {
        match x.partial_cmp(&y) {
            Some(Ordering::Equal) | None => {}
            Some(ord) => return ord,
        }
    }
    if let (Some(x), Some(y)) = (a.event.as_deref(), b.event.as_deref()) {
        return numeric_cmp(x, y);
    }
    Ordering::Equal
}

fn finite(m: Option<f64>) -> Option<f64> {
    m.filter(|v| v.is_finite())
}

/// Stable in-place insertion sort by [`compare_performances`].
pub fn sort_performances(times: &mut [CanonicalPerformance]) {
    for i in 1..times.len() {
        let mut j = i;
        while j > 0 && compare_performances(&times[j - 1], &times[j]) == Ordering::Greater {
            times.swap(j - 1, j);
            j -= 1;
        }
    }
}
