use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::nutrition::Nutrition;
use crate::normalize::{number_or_zero, string_or_empty};

/// A single logged food item as held in the local cache.
///
/// Identity is `id`, always compared as a string. Entries created on this
/// device get a UUID; entries pulled from the remote store carry the remote
/// numeric id in its decimal string form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalEntry {
    pub id: String,
    pub timestamp: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default)]
    pub nutrition: Nutrition,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub health_score: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub confidence: f64,
    /// Set when the entry was pulled in by a sync rather than logged here.
    #[serde(default)]
    pub synced_from_remote: bool,
}

impl LocalEntry {
    /// Creates an entry logged on this device right now.
    pub fn new(name: impl Into<String>, nutrition: Nutrition) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            name: name.into(),
            nutrition,
            health_score: 0.0,
            confidence: 0.0,
            synced_from_remote: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn with_health_score(mut self, health_score: f64) -> Self {
        self.health_score = health_score;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }
}

impl fmt::Display for LocalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} kcal, P {}g, F {}g, C {}g)",
            self.name,
            self.nutrition.calories,
            self.nutrition.protein_g,
            self.nutrition.fat_g,
            self.nutrition.carbs_g
        )
    }
}
