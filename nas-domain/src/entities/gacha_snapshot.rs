// Gacha snapshot entity
// Append-only lottery ledger entry; the latest by timestamp is the (team, user) state

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prize name to held count. Counts are always positive.
pub type TicketInventory = BTreeMap<String, u64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GachaSnapshot {
    pub user_id: String,
    #[serde(default)]
    pub team_id: String,
    pub timestamp: f64,
    pub observed_received: u64,
    pub used: u64,
    #[serde(default)]
    pub tickets: TicketInventory,
}

impl GachaSnapshot {
    /// Received tokens not yet spent on draws.
    pub fn available(&self, lifetime_received: u64) -> u64 {
        lifetime_received.saturating_sub(self.used)
    }

    pub fn ticket_count(&self, prize_name: &str) -> u64 {
        self.tickets.get(prize_name).copied().unwrap_or(0)
    }
}
