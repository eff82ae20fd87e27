use std::fmt;

/// One of the independently synced record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    FoodEntries,
    WorkoutPlans,
    MealPlans,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::FoodEntries, Domain::WorkoutPlans, Domain::MealPlans];

    /// Remote table holding this domain's rows.
    pub fn table(&self) -> &'static str {
        match self {
            Domain::FoodEntries => "food_entries",
            Domain::WorkoutPlans => "workout_plans",
            Domain::MealPlans => "meal_plans",
        }
    }

    /// Local cache key holding this domain's merged state.
    pub fn cache_key(&self) -> &'static str {
        match self {
            Domain::FoodEntries => "caltrax-macros",
            Domain::WorkoutPlans => "caltrax-workout-plans",
            Domain::MealPlans => "caltrax-meal-plans",
        }
    }

    /// Column the remote results are ordered by, newest first.
    pub fn order_column(&self) -> &'static str {
        match self {
            Domain::FoodEntries => "date",
            Domain::WorkoutPlans | Domain::MealPlans => "created_at",
        }
    }

    pub fn is_plan(&self) -> bool {
        !matches!(self, Domain::FoodEntries)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::FoodEntries => "food entries",
            Domain::WorkoutPlans => "workout plans",
            Domain::MealPlans => "meal plans",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_cache_keys_are_distinct() {
        assert_eq!(Domain::FoodEntries.cache_key(), "caltrax-macros");
        assert_eq!(Domain::WorkoutPlans.cache_key(), "caltrax-workout-plans");
        assert_eq!(Domain::MealPlans.cache_key(), "caltrax-meal-plans");
    }

    #[test]
    fn test_domain_tables_and_order() {
        assert_eq!(Domain::FoodEntries.table(), "food_entries");
        assert_eq!(Domain::FoodEntries.order_column(), "date");
        assert_eq!(Domain::MealPlans.order_column(), "created_at");
        assert!(Domain::WorkoutPlans.is_plan());
        assert!(!Domain::FoodEntries.is_plan());
    }
}
