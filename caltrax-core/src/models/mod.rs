mod day_bucket;
mod domain;
mod entry;
mod nutrition;
mod plan;

pub use day_bucket::{DayBucket, MacroCache};
pub use domain::Domain;
pub use entry::LocalEntry;
pub use nutrition::{Nutrition, Totals};
pub use plan::{Plan, PlanCache};
