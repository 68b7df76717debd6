// Gacha cost accounting over the append-only snapshot ledger.
// `None` for the snapshot is the distinguished "never drawn" state.

use crate::entities::{GachaSnapshot, TicketInventory};
use crate::value_objects::EconomyIdentity;

/// Gap enforced between consecutive snapshots of one user so "latest" stays unambiguous.
pub const SNAPSHOT_TIMESTAMP_STEP: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GachaPolicy {
    pub cost: u64,
}

impl GachaPolicy {
    fn effective_cost(&self) -> u64 {
        self.cost.max(1)
    }

    pub fn draws_remaining(&self, latest: Option<&GachaSnapshot>, lifetime_received: u64) -> u64 {
        match latest {
            None => 1,
            Some(snapshot) => snapshot.available(lifetime_received) / self.effective_cost(),
        }
    }

    pub fn can_draw(&self, latest: Option<&GachaSnapshot>, lifetime_received: u64) -> bool {
        self.draws_remaining(latest, lifetime_received) >= 1
    }

    pub fn tokens_until_next_draw(
        &self,
        latest: Option<&GachaSnapshot>,
        lifetime_received: u64,
    ) -> u64 {
        let Some(snapshot) = latest else {
            return 0;
        };
        let cost = self.effective_cost();
        (cost - snapshot.available(lifetime_received) % cost) % cost
    }

    /// Snapshot recording one draw. The first draw ever is free.
    /// Callers must check `can_draw` first.
    pub fn draw_snapshot(
        &self,
        owner: &EconomyIdentity,
        latest: Option<&GachaSnapshot>,
        lifetime_received: u64,
        prize: Option<&str>,
        now: f64,
    ) -> GachaSnapshot {
        let (used, mut tickets) = match latest {
            None => (0, TicketInventory::new()),
            Some(snapshot) => (
                snapshot.used.saturating_add(self.effective_cost()),
                snapshot.tickets.clone(),
            ),
        };
        if let Some(name) = prize {
            *tickets.entry(name.to_string()).or_insert(0) += 1;
        }
        GachaSnapshot {
            user_id: owner.user_id.clone(),
            team_id: owner.team_id.clone(),
            timestamp: next_snapshot_timestamp(latest, now),
            observed_received: lifetime_received,
            used,
            tickets,
        }
    }
}

/// Snapshot with one `prize_name` ticket removed, or `None` when none is held.
pub fn consume_ticket_snapshot(
    latest: Option<&GachaSnapshot>,
    prize_name: &str,
    now: f64,
) -> Option<GachaSnapshot> {
    let snapshot = latest?;
    let held = snapshot.ticket_count(prize_name);
    if held == 0 {
        return None;
    }
    let mut tickets = snapshot.tickets.clone();
    if held == 1 {
        tickets.remove(prize_name);
    } else {
        tickets.insert(prize_name.to_string(), held - 1);
    }
    Some(GachaSnapshot {
        user_id: snapshot.user_id.clone(),
        team_id: snapshot.team_id.clone(),
        timestamp: next_snapshot_timestamp(latest, now),
        observed_received: snapshot.observed_received,
        used: snapshot.used,
        tickets,
    })
}

pub fn next_snapshot_timestamp(latest: Option<&GachaSnapshot>, now: f64) -> f64 {
    match latest {
        Some(snapshot) if snapshot.timestamp + SNAPSHOT_TIMESTAMP_STEP > now => {
            snapshot.timestamp + SNAPSHOT_TIMESTAMP_STEP
        }
        _ => now,
    }
}
