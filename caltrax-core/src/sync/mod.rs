//! Pull-only sync from the remote store into the local cache.
//!
//! ## Flow
//!
//! For each domain, independently and concurrently:
//! 1. Check preconditions (owner id, remote client)
//! 2. Fetch the owner's rows (food entries: trailing window of days)
//! 3. Normalize rows into local shapes
//! 4. Merge into the cached collection, dropping ids already present
//! 5. Persist the whole cache value, only if something was added
//!
//! A failing domain never stops the others; the coordinator reports each
//! outcome and succeeds only if all of them did.

mod coordinator;
mod error;
mod synchronizer;

pub use coordinator::SyncSummary;
pub use error::SyncError;
pub use synchronizer::{
    sync_window, DomainOutcome, Persistence, SyncReport, Synchronizer, DEFAULT_WINDOW_DAYS,
};
