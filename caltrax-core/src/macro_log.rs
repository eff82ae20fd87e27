//! Live logging and read access for the food-entry cache.
//!
//! Unlike sync, the live insert path reports remote failures to the caller:
//! the entry is always kept locally, but the caller needs to know it did not
//! reach the remote store.

use chrono::{Datelike, Days, NaiveDate, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{DayBucket, Domain, LocalEntry, MacroCache, Nutrition, Totals};
use crate::normalize::{finite_or_zero, read_id, RemoteRow};
use crate::remote::{RemoteError, RemoteService, OWNER_COLUMN};
use crate::storage::{CacheStore, LocalStore};

/// Errors from the live insert path.
#[derive(Error, Debug)]
pub enum InsertError {
    #[error("cannot save food entry remotely: no remote client configured")]
    RemoteUnavailable,

    #[error("failed to save food entry: {0}")]
    Remote(#[from] RemoteError),
}

/// A food item the user is logging now.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewFoodEntry {
    pub name: String,
    pub nutrition: Nutrition,
    pub health_score: Option<f64>,
    pub confidence: Option<f64>,
}

impl NewFoodEntry {
    pub fn new(name: impl Into<String>, nutrition: Nutrition) -> Self {
        Self {
            name: name.into(),
            nutrition,
            ..Self::default()
        }
    }
}

/// Access to the per-day food-entry cache.
pub struct MacroLog<R, S> {
    remote: Option<R>,
    cache: CacheStore<S>,
    today: Option<NaiveDate>,
}

impl<R: RemoteService, S: LocalStore> MacroLog<R, S> {
    pub fn new(remote: Option<R>, store: S) -> Self {
        Self {
            remote,
            cache: CacheStore::new(store),
            today: None,
        }
    }

    /// Pins "today" instead of reading the clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn cache(&self) -> &CacheStore<S> {
        &self.cache
    }

    /// The current date in UTC, or the pinned date.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    async fn load(&self) -> MacroCache {
        self.cache.get(Domain::FoodEntries.cache_key()).await
    }

    async fn save(&self, cache: &MacroCache) -> bool {
        self.cache.set(Domain::FoodEntries.cache_key(), cache).await
    }

    /// Logs an entry for today.
    ///
    /// The entry is appended to today's bucket with an incremental totals
    /// update and persisted locally first. With an `owner_id` it is then
    /// inserted remotely; if the remote echoes the stored row, the local
    /// entry takes over the remote id so a later sync recognizes it.
    pub async fn add_entry(
        &self,
        food: NewFoodEntry,
        owner_id: Option<&str>,
    ) -> Result<LocalEntry, InsertError> {
        let date = self.today().to_string();
        let mut entry = LocalEntry::new(food.name, food.nutrition.or_zero())
            .with_health_score(finite_or_zero(food.health_score.unwrap_or(0.0)))
            .with_confidence(finite_or_zero(food.confidence.unwrap_or(0.0)));

        let mut cache = self.load().await;
        cache
            .entry(date.clone())
            .or_insert_with(|| DayBucket::new(&date))
            .insert_entry(entry.clone());
        self.save(&cache).await;
        debug!("Logged {} locally for {}", entry.name, date);

        let Some(owner_id) = owner_id.filter(|id| !id.is_empty()) else {
            return Ok(entry);
        };
        let remote = self.remote.as_ref().ok_or(InsertError::RemoteUnavailable)?;

        let row = remote_row(owner_id, &date, &entry);
        let stored = match remote.insert(Domain::FoodEntries.table(), row).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Remote save of {} failed: {}", entry.name, e);
                return Err(e.into());
            }
        };
        info!("Food entry saved remotely");

        let Some(remote_id) = stored.and_then(|row| read_id(row.get("id"))) else {
            return Ok(entry);
        };

        if let Some(bucket) = cache.get_mut(&date) {
            if let Some(local) = bucket.entries.iter_mut().find(|e| e.id == entry.id) {
                local.id = remote_id.clone();
                local.synced_from_remote = true;
            }
        }
        self.save(&cache).await;

        entry.id = remote_id;
        entry.synced_from_remote = true;
        Ok(entry)
    }

    /// Removes an entry. Returns `false` if the date or id is unknown.
    pub async fn delete_entry(&self, date: &str, id: &str) -> bool {
        let mut cache = self.load().await;
        let Some(bucket) = cache.get_mut(date) else {
            return false;
        };
        if bucket.remove_entry(id).is_none() {
            return false;
        }

        self.save(&cache).await;
        true
    }

    /// Today's bucket, or an empty one.
    pub async fn today_bucket(&self) -> DayBucket {
        let date = self.today().to_string();
        self.load()
            .await
            .remove(&date)
            .unwrap_or_else(|| DayBucket::new(date))
    }

    /// The seven buckets of the current week, starting on Monday. Days with
    /// no entries are empty buckets.
    pub async fn week(&self) -> Vec<DayBucket> {
        let mut cache = self.load().await;
        week_dates(self.today())
            .into_iter()
            .map(|day| {
                let date = day.to_string();
                cache.remove(&date).unwrap_or_else(|| DayBucket::new(date))
            })
            .collect()
    }

    /// Sum of the totals of the current week.
    pub async fn weekly_totals(&self) -> Totals {
        let mut totals = Totals::default();
        for bucket in self.week().await {
            totals += bucket.totals;
        }
        totals
    }
}

/// Monday through Sunday of the week containing `day`.
fn week_dates(day: NaiveDate) -> Vec<NaiveDate> {
    let offset = u64::from(day.weekday().num_days_from_monday());
    let monday = day.checked_sub_days(Days::new(offset)).unwrap_or(day);
    monday.iter_days().take(7).collect()
}

fn remote_row(owner_id: &str, date: &str, entry: &LocalEntry) -> RemoteRow {
    let number = |n: f64| Value::from(finite_or_zero(n));

    let mut row = RemoteRow::new();
    row.insert(OWNER_COLUMN.to_string(), Value::from(owner_id));
    row.insert("date".to_string(), Value::from(date));
    row.insert("name".to_string(), Value::from(entry.name.as_str()));
    row.insert("calories".to_string(), number(entry.nutrition.calories));
    row.insert("protein".to_string(), number(entry.nutrition.protein_g));
    row.insert("fat".to_string(), number(entry.nutrition.fat_g));
    row.insert("carbs".to_string(), number(entry.nutrition.carbs_g));
    row
}
