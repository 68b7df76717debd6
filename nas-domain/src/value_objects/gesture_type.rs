// Gesture type value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureType {
    Stamp,
    Message,
}

impl GestureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureType::Stamp => "stamp",
            GestureType::Message => "message",
        }
    }
}

impl From<&str> for GestureType {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "message" => GestureType::Message,
            _ => GestureType::Stamp,
        }
    }
}
