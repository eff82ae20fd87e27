//! Caltrax Core Library
//!
//! Pulls per-user records from a remote store into the local cache and merges
//! them additively: logged food entries are bucketed per calendar day with
//! running totals, workout and meal plans are kept per owner.

pub mod macro_log;
pub mod merge;
pub mod models;
pub mod normalize;
pub mod remote;
pub mod storage;
pub mod sync;

pub use macro_log::{InsertError, MacroLog, NewFoodEntry};
pub use merge::{merge_day, merge_plans, MergeOutcome};
pub use models::{DayBucket, Domain, LocalEntry, MacroCache, Nutrition, Plan, PlanCache, Totals};
pub use normalize::{normalize, read_number_or_zero, NormalizeError, Normalized, RemoteRow};
pub use remote::{DateRange, RemoteError, RemoteQuery, RemoteService, RestClient};
pub use storage::{CacheStore, FileStore, LocalStore, MemoryStore, StorageError};
pub use sync::{
    sync_window, DomainOutcome, Persistence, SyncError, SyncReport, SyncSummary, Synchronizer,
    DEFAULT_WINDOW_DAYS,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
