use caltrax_core::{MacroLog, NewFoodEntry, Nutrition};
use chrono::NaiveDate;
use clap::Args;

use super::{file_store, remote_client, OutputFormat};
use crate::config::Config;

/// Log a food entry for today
#[derive(Args)]
pub struct LogCommand {
    /// Food name
    pub name: String,

    /// Calories (kcal)
    #[arg(long, default_value_t = 0.0)]
    pub calories: f64,

    /// Protein (g)
    #[arg(long, default_value_t = 0.0)]
    pub protein: f64,

    /// Fat (g)
    #[arg(long, default_value_t = 0.0)]
    pub fat: f64,

    /// Carbohydrates (g)
    #[arg(long, default_value_t = 0.0)]
    pub carbs: f64,

    /// Health score (0-10)
    #[arg(long)]
    pub health_score: Option<f64>,

    /// Only save to the local cache
    #[arg(long)]
    pub local: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl LogCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let log = MacroLog::new(remote_client(config), file_store(config));
        let owner_id = if self.local { None } else { config.user_id() };

        let entry = log.add_entry(self.food(), owner_id).await?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entry)?),
            OutputFormat::Text => {
                println!("Logged {}", entry);
                println!("  id: {}", entry.id);
                if owner_id.is_none() {
                    println!("  (saved locally only)");
                }
            }
        }
        Ok(())
    }

    fn food(&self) -> NewFoodEntry {
        NewFoodEntry {
            health_score: self.health_score,
            ..NewFoodEntry::new(
                self.name.clone(),
                Nutrition::new(self.calories, self.protein, self.fat, self.carbs),
            )
        }
    }
}

/// Delete a food entry from the local cache
#[derive(Args)]
pub struct DeleteCommand {
    /// Entry id
    pub id: String,

    /// Date the entry was logged on (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    pub date: Option<String>,
}

impl DeleteCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let log = MacroLog::new(remote_client(config), file_store(config));
        let date = match &self.date {
            Some(date) => parse_date(date)?,
            None => log.today(),
        }
        .to_string();

        if log.delete_entry(&date, &self.id).await {
            println!("Deleted entry {} from {}", self.id, date);
            Ok(())
        } else {
            Err(format!("No entry {} on {}", self.id, date).into())
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}
