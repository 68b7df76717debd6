// Prize table entity
// Weighted gacha outcomes; probability mass left over means "no prize"

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const PROBABILITY_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeEntry {
    pub name: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrizeTable {
    pub entries: Vec<PrizeEntry>,
}

impl Default for PrizeTable {
    fn default() -> Self {
        let weights = [
            ("prize_1", 0.02),
            ("prize_2", 0.05),
            ("prize_3", 0.10),
            ("prize_4", 0.18),
            ("prize_5", 0.25),
        ];
        Self {
            entries: weights
                .iter()
                .map(|(name, probability)| PrizeEntry {
                    name: name.to_string(),
                    probability: *probability,
                })
                .collect(),
        }
    }
}

impl PrizeTable {
    pub fn normalized(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|entry| PrizeEntry {
                    name: entry.name.trim().to_string(),
                    probability: entry.probability,
                })
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        let mut total = 0.0;
        for entry in &self.entries {
            if entry.name.trim().is_empty() {
                return Err(DomainError::InvalidPrizeTable(
                    "prize name must not be empty".to_string(),
                ));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(DomainError::InvalidPrizeTable(format!(
                    "duplicate prize '{}'",
                    entry.name
                )));
            }
            if !entry.probability.is_finite() || !(0.0..=1.0).contains(&entry.probability) {
                return Err(DomainError::InvalidPrizeTable(format!(
                    "probability for '{}' must be within [0, 1]",
                    entry.name
                )));
            }
            total += entry.probability;
        }
        if total > 1.0 + PROBABILITY_EPSILON {
            return Err(DomainError::InvalidPrizeTable(format!(
                "probabilities sum to {total}, expected at most 1"
            )));
        }
        Ok(())
    }

    pub fn residual_probability(&self) -> f64 {
        let total: f64 = self.entries.iter().map(|entry| entry.probability).sum();
        (1.0 - total).max(0.0)
    }

    /// Maps a uniform roll in `[0, 1)` onto the table. `None` is the empty outcome.
    pub fn select(&self, roll: f64) -> Option<&str> {
        let roll = if roll.is_finite() { roll.clamp(0.0, 1.0) } else { 1.0 };
        let mut cumulative = 0.0;
        for entry in &self.entries {
            cumulative += entry.probability;
            if roll < cumulative {
                return Some(entry.name.as_str());
            }
        }
        None
    }
}
