// Economy identity value object
// The (user, display name, team) scope every engine call runs under

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EconomyIdentity {
    pub user_id: String,
    pub user_name: String,
    pub team_id: String,
}

impl EconomyIdentity {
    pub fn new(
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        team_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            team_id: team_id.into(),
        }
    }

    pub fn normalized(&self) -> Self {
        Self {
            user_id: self.user_id.trim().to_string(),
            user_name: self.user_name.trim().to_string(),
            team_id: self.team_id.trim().to_string(),
        }
    }

    /// True when `candidate_recipient_id` names this identity itself.
    pub fn is_self_target(&self, candidate_recipient_id: &str) -> bool {
        candidate_recipient_id == self.user_id
    }

    pub fn lock_key(&self) -> String {
        format!("{}/{}", self.team_id, self.user_id)
    }
}
