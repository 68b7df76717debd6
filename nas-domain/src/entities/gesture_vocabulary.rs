// Gesture vocabulary entity
// Which chat gestures (stamps) count as a send trigger

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub const DEFAULT_STAMP: &str = "eggplant";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureVocabulary {
    pub default: String,
    #[serde(default)]
    pub stamps: BTreeMap<String, bool>,
}

impl Default for GestureVocabulary {
    fn default() -> Self {
        let mut stamps = BTreeMap::new();
        stamps.insert(DEFAULT_STAMP.to_string(), true);
        Self {
            default: DEFAULT_STAMP.to_string(),
            stamps,
        }
    }
}

impl GestureVocabulary {
    pub fn is_send_trigger(&self, token: &str) -> bool {
        let key = normalize_stamp(token);
        if key.is_empty() {
            return false;
        }
        self.stamps.get(&key).copied().unwrap_or(false)
    }

    pub fn normalized(&self) -> Self {
        Self {
            default: normalize_stamp(&self.default),
            stamps: self
                .stamps
                .iter()
                .map(|(name, enabled)| (normalize_stamp(name), *enabled))
                .filter(|(name, _)| !name.is_empty())
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.default.is_empty() {
            return Err(DomainError::InvalidGestureVocabulary(
                "default stamp must not be empty".to_string(),
            ));
        }
        if !self.is_send_trigger(&self.default) {
            return Err(DomainError::InvalidGestureVocabulary(format!(
                "default stamp '{}' must be an enabled entry",
                self.default
            )));
        }
        Ok(())
    }
}

/// Chat clients render reactions as `:name:`; both forms resolve to `name`.
/// Matching is otherwise exact.
fn normalize_stamp(token: &str) -> String {
    token.trim().trim_matches(':').trim().to_string()
}
