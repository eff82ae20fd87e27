use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

use crate::normalize::{finite_or_zero, number_or_zero};

/// Nutrition facts for a single logged item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default, deserialize_with = "number_or_zero")]
    pub calories: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub protein_g: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub fat_g: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub carbs_g: f64,
}

impl Nutrition {
    pub fn new(calories: f64, protein_g: f64, fat_g: f64, carbs_g: f64) -> Self {
        Self {
            calories,
            protein_g,
            fat_g,
            carbs_g,
        }
    }

    /// Copy with every non-finite field replaced by zero.
    pub fn or_zero(self) -> Self {
        Self {
            calories: finite_or_zero(self.calories),
            protein_g: finite_or_zero(self.protein_g),
            fat_g: finite_or_zero(self.fat_g),
            carbs_g: finite_or_zero(self.carbs_g),
        }
    }
}


/// Per-day aggregate of the nutrition of every entry in a bucket.
///
/// Field names differ from [`Nutrition`] (no `_g` suffix) to stay compatible
/// with caches written by earlier clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(default, deserialize_with = "number_or_zero")]
    pub calories: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub protein: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub fat: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub carbs: f64,
}

impl Totals {
    /// Sums the nutrition of every entry, starting from zero.
    pub fn from_nutrition<'a>(items: impl IntoIterator<Item = &'a Nutrition>) -> Self {
        let mut totals = Totals::default();
        for nutrition in items {
            totals.add(nutrition);
        }
        totals
    }

    /// Adds one item's nutrition to these totals.
    pub fn add(&mut self, nutrition: &Nutrition) {
        self.calories += nutrition.calories;
        self.protein += nutrition.protein_g;
        self.fat += nutrition.fat_g;
        self.carbs += nutrition.carbs_g;
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, other: Totals) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.fat += other.fat;
        self.carbs += other.carbs;
    }
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} kcal, {}g protein, {}g fat, {}g carbs",
            self.calories, self.protein, self.fat, self.carbs
        )
    }
}
