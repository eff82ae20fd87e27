use caltrax_core::{CacheStore, Domain, Plan, PlanCache};
use clap::{Args, ValueEnum};

use super::{file_store, OutputFormat};
use crate::config::Config;

/// List cached workout or meal plans
#[derive(Args)]
pub struct PlansCommand {
    /// Which plans to list
    #[arg(value_enum)]
    pub kind: PlanKind,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PlanKind {
    Workout,
    Meal,
}

impl PlanKind {
    fn domain(self) -> Domain {
        match self {
            PlanKind::Workout => Domain::WorkoutPlans,
            PlanKind::Meal => Domain::MealPlans,
        }
    }
}

impl PlansCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let owner_id = config
            .user_id()
            .ok_or("no user id configured (set user_id or CALTRAX_USER_ID)")?;

        let domain = self.kind.domain();
        let cache = CacheStore::new(file_store(config));
        let mut plans: PlanCache = cache.get(domain.cache_key()).await;
        let plans = plans.remove(owner_id).unwrap_or_default();

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plans)?),
            OutputFormat::Text => {
                if plans.is_empty() {
                    println!("No {} cached. Run `caltrax sync` first.", domain);
                    return Ok(());
                }
                for plan in &plans {
                    println!("{}", plan_line(plan));
                }
            }
        }
        Ok(())
    }
}

fn plan_line(plan: &Plan) -> String {
    let id = plan.id().unwrap_or_else(|| "-".to_string());
    match plan.title() {
        Some(title) => format!("{}  {}", id, title),
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan(value: serde_json::Value) -> Plan {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_plan_line() {
        assert_eq!(plan_line(&plan(json!({"id": 7, "title": "Leg day"}))), "7  Leg day");
        assert_eq!(plan_line(&plan(json!({"id": "abc"}))), "abc");
        assert_eq!(plan_line(&plan(json!({"notes": "x"}))), "-");
    }

    #[test]
    fn test_plan_kind_domain() {
        assert_eq!(PlanKind::Workout.domain(), Domain::WorkoutPlans);
        assert_eq!(PlanKind::Meal.domain(), Domain::MealPlans);
    }
}
