// Request/response shapes exchanged with callers

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::EconomyIdentity;

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityQuery {
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    pub team_id: String,
}

impl From<IdentityQuery> for EconomyIdentity {
    fn from(query: IdentityQuery) -> Self {
        EconomyIdentity::new(query.user_id, query.user_name, query.team_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StampSendRequest {
    #[serde(flatten)]
    pub sender: IdentityQuery,
    pub recipient_id: String,
    #[serde(default)]
    pub recipient_name: String,
    pub stamp: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageSendRequest {
    #[serde(flatten)]
    pub sender: IdentityQuery,
    pub recipient_id: String,
    #[serde(default)]
    pub recipient_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicketConsumeRequest {
    #[serde(flatten)]
    pub owner: IdentityQuery,
    pub ticket: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendResponse {
    pub sent: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrawResponse {
    pub prize: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketConsumeResponse {
    pub consumed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaStatus {
    pub sent_this_period: u64,
    pub sent_last_period: u64,
    pub bonus_allowance: u64,
    pub remaining_allowance: i64,
    pub period_start: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GachaStatus {
    pub lifetime_received: u64,
    pub has_snapshot: bool,
    pub used: u64,
    pub draws_remaining: u64,
    pub can_draw: bool,
    pub tokens_until_next_draw: u64,
    pub tickets: BTreeMap<String, u64>,
}
