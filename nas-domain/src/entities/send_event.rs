// Send event entity
// One token transfer; immutable once written

use serde::{Deserialize, Serialize};

use crate::value_objects::{EconomyIdentity, GestureType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendEvent {
    pub sender_id: String,
    pub sender_name: String,
    pub recipient_id: String,
    pub recipient_name: String,
    pub team_id: String,
    pub gesture_type: GestureType,
    /// Fractional seconds since the unix epoch.
    pub timestamp: f64,
}

impl SendEvent {
    pub fn from_identity(
        sender: &EconomyIdentity,
        recipient_id: &str,
        recipient_name: &str,
        gesture_type: GestureType,
        timestamp: f64,
    ) -> Self {
        Self {
            sender_id: sender.user_id.clone(),
            sender_name: sender.user_name.clone(),
            recipient_id: recipient_id.to_string(),
            recipient_name: recipient_name.to_string(),
            team_id: sender.team_id.clone(),
            gesture_type,
            timestamp,
        }
    }
}
