use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Cache of plans keyed by owner id, most recent plan first.
pub type PlanCache = BTreeMap<String, Vec<Plan>>;

/// A workout or meal plan.
///
/// The payload is opaque to the sync engine apart from its `id` field, and is
/// stored exactly as the remote `plan_data` column held it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan(Map<String, Value>);

impl Plan {
    pub fn new(payload: Map<String, Value>) -> Self {
        Self(payload)
    }

    /// The plan id as a string. Numeric ids are rendered in decimal so they
    /// compare equal to the same id stored as text.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.0
    }

    /// A display title, taken from the first of `name` or `title` present.
    pub fn title(&self) -> Option<&str> {
        ["name", "title"]
            .iter()
            .find_map(|key| self.0.get(*key).and_then(Value::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan(value: Value) -> Plan {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_plan_id_string_and_number() {
        assert_eq!(plan(json!({"id": "p-1"})).id(), Some("p-1".to_string()));
        assert_eq!(plan(json!({"id": 17})).id(), Some("17".to_string()));
        assert_eq!(plan(json!({"id": null})).id(), None);
        assert_eq!(plan(json!({"name": "no id"})).id(), None);
    }

    #[test]
    fn test_plan_serializes_as_payload() {
        let value = json!({"id": "p-1", "name": "Push day", "days": [1, 2, 3]});
        let p = plan(value.clone());

        assert_eq!(serde_json::to_value(&p).unwrap(), value);
        assert_eq!(p.title(), Some("Push day"));
    }
}
