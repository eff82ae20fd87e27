//! Runs every domain sync concurrently and collects each outcome.

use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{info, warn};

use super::error::SyncError;
use super::synchronizer::{DomainOutcome, Synchronizer};
use crate::models::Domain;
use crate::remote::RemoteService;
use crate::storage::LocalStore;

/// Per-domain outcomes of a full sync.
#[derive(Debug, Default)]
pub struct SyncSummary {
    pub outcomes: Vec<DomainOutcome>,
}

impl SyncSummary {
    /// True iff every domain ran and succeeded. A summary with no outcomes
    /// (no owner id was given) is a failure.
    pub fn all_succeeded(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(DomainOutcome::succeeded)
    }

    pub fn outcome(&self, domain: Domain) -> Option<&DomainOutcome> {
        self.outcomes.iter().find(|o| o.domain == domain)
    }

    pub fn failures(&self) -> impl Iterator<Item = &DomainOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }
}

impl<R: RemoteService, S: LocalStore> Synchronizer<R, S> {
    /// Syncs every domain for `owner_id`.
    ///
    /// All domains are started together and all are awaited, whatever the
    /// others do; a panic inside one domain is caught and reported as that
    /// domain's failure.
    pub async fn sync_all(&self, owner_id: Option<&str>) -> SyncSummary {
        let Some(owner_id) = owner_id.filter(|id| !id.is_empty()) else {
            warn!("Cannot sync: no user id provided");
            return SyncSummary::default();
        };

        info!("Starting full data sync for user {}", owner_id);

        let outcomes = join_all(
            Domain::ALL
                .iter()
                .map(|&domain| self.sync_domain_isolated(domain, owner_id)),
        )
        .await;

        let summary = SyncSummary { outcomes };
        for outcome in &summary.outcomes {
            let status = if outcome.succeeded() { "ok" } else { "failed" };
            info!("  {}: {}", outcome.domain, status);
        }

        if summary.all_succeeded() {
            info!("All data synced successfully");
        } else {
            warn!("Some data sync operations failed");
        }

        summary
    }

    async fn sync_domain_isolated(&self, domain: Domain, owner_id: &str) -> DomainOutcome {
        match AssertUnwindSafe(self.sync_domain(domain, Some(owner_id)))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                warn!("{} sync panicked: {}", domain, message);
                DomainOutcome {
                    domain,
                    result: Err(SyncError::Panicked(domain, message)),
                }
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
