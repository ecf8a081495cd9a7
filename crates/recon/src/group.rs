//! Group phase: partition raw performances by exact identity key.

use std::collections::HashMap;

use crate::model::{GroupKey, RawPerformanceRecord};

/// Partition `records` into groups of identical [`GroupKey`]. Groups come
/// out in order of their first member, and members keep insertion order.
pub fn group_performances(
    records: impl IntoIterator<Item = RawPerformanceRecord>,
) -> Vec<Vec<RawPerformanceRecord>> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Vec<RawPerformanceRecord>> = Vec::new();

    for record in records {
        let key = record.group_key();
        match index.get(&key) {
            Some(&slot) => groups[slot].push(record),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![record]);
            }
        }
    }

    log::debug!("grouped into {} canonical performance(s)", groups.len());
    groups
}
