//! Sync command: pulls remote records into the local cache.

use caltrax_core::{Domain, Persistence, SyncSummary, Synchronizer};
use clap::{Args, ValueEnum};

use super::{file_store, remote_client};
use crate::config::Config;

/// Pull remote data into the local cache
#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Only sync one kind of data
    #[arg(long, value_enum)]
    only: Option<DomainArg>,

    /// Days of food entries to pull, today included
    #[arg(long)]
    days: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DomainArg {
    Food,
    Workouts,
    Meals,
}

impl From<DomainArg> for Domain {
    fn from(arg: DomainArg) -> Self {
        match arg {
            DomainArg::Food => Domain::FoodEntries,
            DomainArg::Workouts => Domain::WorkoutPlans,
            DomainArg::Meals => Domain::MealPlans,
        }
    }
}

impl SyncCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        if !config.remote.is_configured() {
            println!("Remote: Not configured");
            println!();
            println!("To enable sync, add to your config file:");
            println!();
            println!("  remote:");
            println!("    url: \"https://your-project.supabase.co\"");
            println!("    api_key: \"your-anon-key\"");
            println!();
            println!("Or set environment variables:");
            println!("  CALTRAX_REMOTE_URL");
            println!("  CALTRAX_REMOTE_API_KEY");
            return Err("remote is not configured".into());
        }

        let window_days = self.days.unwrap_or(config.sync.window_days);
        let synchronizer = Synchronizer::new(remote_client(config), file_store(config))
            .with_window_days(window_days);

        println!("Syncing...");
        println!();

        let summary = match self.only {
            Some(domain) => SyncSummary {
                outcomes: vec![synchronizer.sync_domain(domain.into(), config.user_id()).await],
            },
            None => synchronizer.sync_all(config.user_id()).await,
        };

        if summary.outcomes.is_empty() {
            return Err("no user id configured (set user_id or CALTRAX_USER_ID)".into());
        }

        for line in summary_lines(&summary) {
            println!("  {}", line);
        }
        println!();

        if summary.all_succeeded() {
            println!("Sync complete.");
            Ok(())
        } else {
            Err(format!("{} sync operation(s) failed", summary.failures().count()).into())
        }
    }
}

fn summary_lines(summary: &SyncSummary) -> Vec<String> {
    summary
        .outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(report) if report.persistence == Persistence::Failed => format!(
                "! {}: {} new, cache write failed",
                outcome.domain, report.added
            ),
            Ok(report) if report.changed() => format!(
                "✓ {}: {} new of {} fetched",
                outcome.domain, report.added, report.fetched
            ),
            Ok(report) => format!(
                "✓ {}: up to date ({} fetched)",
                outcome.domain, report.fetched
            ),
            Err(e) => format!("✗ {}: {}", outcome.domain, e),
        })
        .collect()
}
