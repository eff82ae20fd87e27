//! Per-domain sync: fetch, normalize, merge, persist.

use chrono::{Days, NaiveDate, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::error::SyncError;
use crate::merge::{merge_day, merge_plans};
use crate::models::{Domain, LocalEntry, MacroCache, PlanCache};
use crate::normalize::{normalize_entry, normalize_plan};
use crate::remote::{RemoteQuery, RemoteService};
use crate::storage::{CacheStore, LocalStore};

/// Number of calendar days of food entries fetched by default, today included.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// What happened to the cache at the end of a domain sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Nothing new, no write attempted.
    Unchanged,
    /// The merged value was written.
    Persisted,
    /// The write failed; the merge only lived in memory.
    Failed,
}

/// Result of a successful sync for one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub domain: Domain,
    /// Rows returned by the remote store
    pub fetched: usize,
    /// Records that were new locally
    pub added: usize,
    pub persistence: Persistence,
}

impl SyncReport {
    fn unchanged(domain: Domain, fetched: usize) -> Self {
        Self {
            domain,
            fetched,
            added: 0,
            persistence: Persistence::Unchanged,
        }
    }

    /// True when the merge added at least one record.
    pub fn changed(&self) -> bool {
        self.added > 0
    }
}

/// Outcome of one domain sync, success or failure.
#[derive(Debug)]
pub struct DomainOutcome {
    pub domain: Domain,
    pub result: Result<SyncReport, SyncError>,
}

impl DomainOutcome {
    /// True if the domain synced without a fatal error. An empty remote
    /// result is still a success.
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// The inclusive `[from, to]` date window ending at `today`, `days` long.
pub fn sync_window(today: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    let span = u64::from(days.max(1) - 1);
    let from = today.checked_sub_days(Days::new(span)).unwrap_or(NaiveDate::MIN);
    (from, today)
}

/// Pulls remote records into the local cache.
///
/// The remote client is passed in explicitly; `None` means no remote is
/// configured and every sync fails its precondition without network access.
pub struct Synchronizer<R, S> {
    remote: Option<R>,
    cache: CacheStore<S>,
    window_days: u32,
    today: Option<NaiveDate>,
}

impl<R: RemoteService, S: LocalStore> Synchronizer<R, S> {
    /// Creates a synchronizer over `store` with the default window.
    pub fn new(remote: Option<R>, store: S) -> Self {
        Self {
            remote,
            cache: CacheStore::new(store),
            window_days: DEFAULT_WINDOW_DAYS,
            today: None,
        }
    }

    /// Sets how many calendar days of food entries are fetched.
    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days;
        self
    }

    /// Pins "today" instead of reading the clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn cache(&self) -> &CacheStore<S> {
        &self.cache
    }

    pub fn remote(&self) -> Option<&R> {
        self.remote.as_ref()
    }

    /// The current date in UTC, or the pinned date.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Syncs one domain for `owner_id`.
    ///
    /// Never returns an error: every failure is captured in the outcome.
    pub async fn sync_domain(&self, domain: Domain, owner_id: Option<&str>) -> DomainOutcome {
        let result = self.run_domain(domain, owner_id).await;

        match &result {
            Ok(report) if report.changed() => {
                info!("Synced {}: {} new of {} fetched", domain, report.added, report.fetched)
            }
            Ok(report) => info!("{} already up to date ({} fetched)", domain, report.fetched),
            Err(e) if e.is_precondition() => warn!("Cannot sync {}: {}", domain, e),
            Err(e) => warn!("Error syncing {}: {}", domain, e),
        }

        DomainOutcome { domain, result }
    }

    async fn run_domain(
        &self,
        domain: Domain,
        owner_id: Option<&str>,
    ) -> Result<SyncReport, SyncError> {
        let owner_id = owner_id
            .filter(|id| !id.is_empty())
            .ok_or(SyncError::MissingOwner)?;
        let remote = self.remote.as_ref().ok_or(SyncError::RemoteUnavailable)?;

        match domain {
            Domain::FoodEntries => self.sync_food_entries(remote, owner_id).await,
            Domain::WorkoutPlans | Domain::MealPlans => {
                self.sync_plans(remote, domain, owner_id).await
            }
        }
    }

    async fn sync_food_entries(&self, remote: &R, owner_id: &str) -> Result<SyncReport, SyncError> {
        let domain = Domain::FoodEntries;
        let (from, to) = sync_window(self.today(), self.window_days);
        let query = RemoteQuery::new(domain.table(), owner_id)
            .with_date_range(domain.order_column(), from, to)
            .order_desc(domain.order_column());

        debug!(%from, %to, "Fetching food entries");
        let rows = remote
            .query(&query)
            .await
            .map_err(|source| SyncError::Fetch { domain, source })?;

        if rows.is_empty() {
            return Ok(SyncReport::unchanged(domain, 0));
        }

        let entries = rows
            .iter()
            .map(normalize_entry)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| SyncError::Normalize { domain, source })?;

        let mut cache: MacroCache = self.cache.get(domain.cache_key()).await;
        let mut added = 0;

        for (date, incoming) in group_by_date(entries) {
            let outcome = merge_day(cache.remove(&date), incoming, &date);
            if outcome.changed() {
                debug!("Added {} new entries for {}", outcome.added, date);
            }
            added += outcome.added;
            cache.insert(date, outcome.value);
        }

        self.finish(domain, rows.len(), added, &cache).await
    }

    async fn sync_plans(
        &self,
        remote: &R,
        domain: Domain,
        owner_id: &str,
    ) -> Result<SyncReport, SyncError> {
        let query = RemoteQuery::new(domain.table(), owner_id).order_desc(domain.order_column());

        let rows = remote
            .query(&query)
            .await
            .map_err(|source| SyncError::Fetch { domain, source })?;

        if rows.is_empty() {
            return Ok(SyncReport::unchanged(domain, 0));
        }

        let incoming = rows
            .iter()
            .map(normalize_plan)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| SyncError::Normalize { domain, source })?;

        let mut cache: PlanCache = self.cache.get(domain.cache_key()).await;
        let existing = cache.remove(owner_id).unwrap_or_default();
        let outcome = merge_plans(existing, incoming);
        let added = outcome.added;
        cache.insert(owner_id.to_string(), outcome.value);

        self.finish(domain, rows.len(), added, &cache).await
    }

    /// Writes the merged cache back if anything was added.
    async fn finish<T: serde::Serialize>(
        &self,
        domain: Domain,
        fetched: usize,
        added: usize,
        value: &T,
    ) -> Result<SyncReport, SyncError> {
        if added == 0 {
            return Ok(SyncReport::unchanged(domain, fetched));
        }

        let persistence = if self.cache.set(domain.cache_key(), value).await {
            Persistence::Persisted
        } else {
            Persistence::Failed
        };

        Ok(SyncReport {
            domain,
            fetched,
            added,
            persistence,
        })
    }
}

/// Groups entries by calendar date, keeping their order within each date.
fn group_by_date(entries: Vec<LocalEntry>) -> BTreeMap<String, Vec<LocalEntry>> {
    let mut groups: BTreeMap<String, Vec<LocalEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.timestamp.clone()).or_default().push(entry);
    }
    groups
}
