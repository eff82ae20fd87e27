//! Conversion of remote rows into the local cache shapes.
//!
//! Every nutrition number read here or from the cache goes through
//! [`read_number_or_zero`]: a missing, null, non-numeric or non-finite value
//! is zero.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{Domain, LocalEntry, Nutrition, Plan};

/// A row as returned by the remote store.
pub type RemoteRow = Map<String, Value>;

/// Errors raised for rows that cannot be given a local identity.
#[derive(Error, Debug, PartialEq)]
pub enum NormalizeError {
    #[error("remote row has no usable `{0}` field")]
    MissingField(&'static str),

    #[error("plan payload is not an object")]
    InvalidPlanPayload,

    #[error("plan payload has no usable `id`")]
    MissingPlanId,
}

/// The local form of a normalized remote row.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Entry(LocalEntry),
    Plan(Plan),
}

/// Reads a numeric value, treating anything unusable as zero.
///
/// Numeric strings are accepted since some backends serialize decimal
/// columns as text.
pub fn read_number_or_zero(value: Option<&Value>) -> f64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// [`read_number_or_zero`] for a value already held as `f64`.
pub(crate) fn finite_or_zero(n: f64) -> f64 {
    read_number_or_zero(Some(&Value::from(n)))
}

/// Serde adapter applying [`read_number_or_zero`] while deserializing.
pub(crate) fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(read_number_or_zero(value.as_ref()))
}

/// Serde adapter reading a missing, null or non-string value as `""`.
pub(crate) fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(s),
        _ => Ok(String::new()),
    }
}

/// Normalizes a row for the given domain.
pub fn normalize(row: &RemoteRow, domain: Domain) -> Result<Normalized, NormalizeError> {
    match domain {
        Domain::FoodEntries => normalize_entry(row).map(Normalized::Entry),
        Domain::WorkoutPlans | Domain::MealPlans => normalize_plan(row).map(Normalized::Plan),
    }
}

/// Maps a `food_entries` row into a [`LocalEntry`].
///
/// The remote schema has no creation timestamp, so the calendar date doubles
/// as the timestamp. Health score and confidence are not stored remotely.
pub fn normalize_entry(row: &RemoteRow) -> Result<LocalEntry, NormalizeError> {
    let id = read_id(row.get("id")).ok_or(NormalizeError::MissingField("id"))?;
    let date = row
        .get("date")
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty())
        .ok_or(NormalizeError::MissingField("date"))?;
    let name = row
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default();

    Ok(LocalEntry {
        id,
        timestamp: date.to_string(),
        name: name.to_string(),
        nutrition: Nutrition {
            calories: read_number_or_zero(row.get("calories")),
            protein_g: read_number_or_zero(row.get("protein")),
            fat_g: read_number_or_zero(row.get("fat")),
            carbs_g: read_number_or_zero(row.get("carbs")),
        },
        health_score: 0.0,
        confidence: 0.0,
        synced_from_remote: true,
    })
}

/// Extracts the `plan_data` payload of a plan row. The wrapping row is
/// discarded.
pub fn normalize_plan(row: &RemoteRow) -> Result<Plan, NormalizeError> {
    let payload = match row.get("plan_data") {
        Some(Value::Object(payload)) => payload.clone(),
        Some(Value::Null) | None => return Err(NormalizeError::MissingField("plan_data")),
        Some(_) => return Err(NormalizeError::InvalidPlanPayload),
    };

    let plan = Plan::new(payload);
    if plan.id().is_none() {
        return Err(NormalizeError::MissingPlanId);
    }
    Ok(plan)
}

/// Renders an id as a string. Integers keep their decimal form.
pub(crate) fn read_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> RemoteRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("test row must be an object"),
        }
    }

    #[test]
    fn test_read_number_or_zero() {
        assert_eq!(read_number_or_zero(Some(&json!(12.5))), 12.5);
        assert_eq!(read_number_or_zero(Some(&json!(7))), 7.0);
        assert_eq!(read_number_or_zero(Some(&json!("3.25"))), 3.25);
        assert_eq!(read_number_or_zero(Some(&json!(null))), 0.0);
        assert_eq!(read_number_or_zero(Some(&json!("lots"))), 0.0);
        assert_eq!(read_number_or_zero(Some(&json!(true))), 0.0);
        assert_eq!(read_number_or_zero(Some(&json!("NaN"))), 0.0);
        assert_eq!(read_number_or_zero(None), 0.0);
    }

    #[test]
    fn test_normalize_entry_maps_fields() {
        let remote = row(json!({
            "id": 5,
            "clerk_user_id": "user_1",
            "date": "2024-06-30",
            "name": "Oatmeal",
            "calories": 150,
            "protein": 5,
            "fat": 3,
            "carbs": 27
        }));

        let entry = normalize_entry(&remote).unwrap();
        assert_eq!(entry.id, "5");
        assert_eq!(entry.timestamp, "2024-06-30");
        assert_eq!(entry.name, "Oatmeal");
        assert_eq!(entry.nutrition, Nutrition::new(150.0, 5.0, 3.0, 27.0));
        assert_eq!(entry.health_score, 0.0);
        assert_eq!(entry.confidence, 0.0);
        assert!(entry.synced_from_remote);
    }

    #[test]
    fn test_normalize_entry_defaults_missing_numbers() {
        let remote = row(json!({"id": 9, "date": "2024-06-29", "calories": null}));

        let entry = normalize_entry(&remote).unwrap();
        assert_eq!(entry.name, "");
        assert_eq!(entry.nutrition, Nutrition::default());
    }

    #[test]
    fn test_normalize_entry_requires_id_and_date() {
        let no_id = row(json!({"date": "2024-06-30"}));
        assert_eq!(
            normalize_entry(&no_id),
            Err(NormalizeError::MissingField("id"))
        );

        let no_date = row(json!({"id": 1}));
        assert_eq!(
            normalize_entry(&no_date),
            Err(NormalizeError::MissingField("date"))
        );
    }

    #[test]
    fn test_normalize_plan_extracts_payload() {
        let remote = row(json!({
            "id": 77,
            "clerk_user_id": "user_1",
            "created_at": "2024-06-01T10:00:00Z",
            "plan_data": {"id": "wp-1", "name": "Leg day"}
        }));

        let plan = normalize_plan(&remote).unwrap();
        assert_eq!(plan.id(), Some("wp-1".to_string()));
        assert_eq!(plan.payload().len(), 2);
        assert!(plan.payload().get("clerk_user_id").is_none());
    }

    #[test]
    fn test_normalize_plan_errors() {
        let missing = row(json!({"id": 1}));
        assert_eq!(
            normalize_plan(&missing),
            Err(NormalizeError::MissingField("plan_data"))
        );

        let not_object = row(json!({"plan_data": "text"}));
        assert_eq!(
            normalize_plan(&not_object),
            Err(NormalizeError::InvalidPlanPayload)
        );

        let no_id = row(json!({"plan_data": {"name": "x"}}));
        assert_eq!(normalize_plan(&no_id), Err(NormalizeError::MissingPlanId));
    }

    #[test]
    fn test_normalize_dispatches_by_domain() {
        let food = row(json!({"id": 1, "date": "2024-06-30"}));
        assert!(matches!(
            normalize(&food, Domain::FoodEntries),
            Ok(Normalized::Entry(_))
        ));

        let plan = row(json!({"plan_data": {"id": 3}}));
        assert!(matches!(
            normalize(&plan, Domain::MealPlans),
            Ok(Normalized::Plan(_))
        ));
    }
}
