use caltrax_core::MacroLog;
use clap::Args;
use serde_json::json;

use super::{file_store, remote_client, OutputFormat};
use crate::config::Config;

/// Show today's entries and totals
#[derive(Args)]
pub struct TodayCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl TodayCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let log = MacroLog::new(remote_client(config), file_store(config));
        let bucket = log.today_bucket().await;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&bucket)?),
            OutputFormat::Text => {
                println!("Today ({})", bucket.date);
                println!();
                if bucket.is_empty() {
                    println!("No entries logged.");
                } else {
                    for entry in &bucket.entries {
                        println!("  {}  [{}]", entry, entry.id);
                    }
                }
                println!();
                println!("Total: {}", bucket.totals);
            }
        }
        Ok(())
    }
}

/// Show this week's daily totals (Monday to Sunday)
#[derive(Args)]
pub struct WeekCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl WeekCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let log = MacroLog::new(remote_client(config), file_store(config));
        let days = log.week().await;
        let total = log.weekly_totals().await;

        match self.format {
            OutputFormat::Json => {
                let value = json!({ "days": days, "totals": total });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            OutputFormat::Text => {
                for day in &days {
                    println!(
                        "{}  {:>3} entries  {}",
                        day.date,
                        day.entries.len(),
                        day.totals
                    );
                }
                println!();
                println!("Week total: {}", total);
            }
        }
        Ok(())
    }
}
