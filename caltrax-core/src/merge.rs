//! Additive merge of incoming records into local collections.
//!
//! Deduplication is by id only. An incoming record whose id is already
//! present locally is dropped, never merged field by field, so local state
//! wins on collision. Nothing here performs I/O.

use std::collections::HashSet;

use crate::models::{DayBucket, LocalEntry, Plan};

/// The result of a merge: the new collection and how many records it gained.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome<T> {
    pub value: T,
    pub added: usize,
}

impl<T> MergeOutcome<T> {
    /// True when at least one incoming record was new.
    pub fn changed(&self) -> bool {
        self.added > 0
    }
}

/// Merges incoming entries into the bucket for `date`.
///
/// A missing bucket starts empty. New entries are appended in incoming order
/// and the totals are then recomputed over the whole entry list. When nothing
/// is new the bucket is returned untouched, totals included.
pub fn merge_day(
    existing: Option<DayBucket>,
    incoming: Vec<LocalEntry>,
    date: &str,
) -> MergeOutcome<DayBucket> {
    let mut bucket = existing.unwrap_or_else(|| DayBucket::new(date));

    let mut seen: HashSet<String> = bucket.entries.iter().map(|e| e.id.clone()).collect();
    let fresh: Vec<LocalEntry> = incoming
        .into_iter()
        .filter(|entry| seen.insert(entry.id.clone()))
        .collect();

    let added = fresh.len();
    if added > 0 {
        bucket.entries.extend(fresh);
        bucket.recompute_totals();
    }

    MergeOutcome {
        value: bucket,
        added,
    }
}

/// Merges incoming plans into an owner's plan list.
///
/// New plans are prepended as one block in incoming order; existing plans
/// keep their relative order.
pub fn merge_plans(existing: Vec<Plan>, incoming: Vec<Plan>) -> MergeOutcome<Vec<Plan>> {
    let mut seen: HashSet<String> = existing.iter().filter_map(Plan::id).collect();
    let mut merged: Vec<Plan> = incoming
        .into_iter()
        .filter(|plan| plan.id().is_some_and(|id| seen.insert(id)))
        .collect();

    let added = merged.len();
    if added == 0 {
        return MergeOutcome {
            value: existing,
            added,
        };
    }

    merged.extend(existing);
    MergeOutcome {
        value: merged,
        added,
    }
}
