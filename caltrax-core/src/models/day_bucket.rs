use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::entry::LocalEntry;
use super::nutrition::Totals;

/// Cache of logged entries keyed by ISO calendar date (`YYYY-MM-DD`).
pub type MacroCache = BTreeMap<String, DayBucket>;

/// All entries logged on one calendar date plus their running totals.
///
/// `totals` always equals the sum of the entries' nutrition. Bulk changes
/// recompute it from scratch; [`DayBucket::insert_entry`] updates it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: String,
    #[serde(default)]
    pub entries: Vec<LocalEntry>,
    #[serde(default)]
    pub totals: Totals,
}

impl DayBucket {
    /// Creates an empty bucket with zero totals.
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            entries: Vec::new(),
            totals: Totals::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends one entry and adds its nutrition to the existing totals.
    ///
    /// This is the live-logging path. It agrees with
    /// [`DayBucket::recompute_totals`] because both sum the same entries in
    /// the same order.
    pub fn insert_entry(&mut self, entry: LocalEntry) {
        self.totals.add(&entry.nutrition);
        self.entries.push(entry);
    }

    /// Recomputes `totals` from the entries alone.
    pub fn recompute_totals(&mut self) {
        self.totals = Totals::from_nutrition(self.entries.iter().map(|e| &e.nutrition));
    }

    /// Removes the entry with `id`, recomputing totals if it was present.
    pub fn remove_entry(&mut self, id: &str) -> Option<LocalEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        let removed = self.entries.remove(index);
        self.recompute_totals();
        Some(removed)
    }
}
