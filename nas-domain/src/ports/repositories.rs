use async_trait::async_trait;

use crate::entities::{GachaSnapshot, GestureVocabulary, PrizeTable, SendEvent};

/// Append-only log of token sends.
#[async_trait]
pub trait SendEventRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn append_send_event(&self, event: &SendEvent) -> anyhow::Result<()>;
    /// Events by `sender_id` in `team_id` with `from <= timestamp < to`; `to = None` is open ended.
    async fn count_events_by_sender(
        &self,
        sender_id: &str,
        team_id: &str,
        from: f64,
        to: Option<f64>,
    ) -> anyhow::Result<u64>;
    async fn count_events_by_recipient(
        &self,
        recipient_id: &str,
        team_id: &str,
    ) -> anyhow::Result<u64>;
    async fn ping(&self) -> anyhow::Result<()>;
}

/// Append-only gacha ledger; the greatest timestamp per (team, user) is current.
/// Scoped like `count_events_by_recipient` so balances never mix teams.
#[async_trait]
pub trait GachaStateRepository: Send + Sync {
    async fn append_snapshot(&self, snapshot: &GachaSnapshot) -> anyhow::Result<()>;
    async fn latest_snapshot_for(
        &self,
        user_id: &str,
        team_id: &str,
    ) -> anyhow::Result<Option<GachaSnapshot>>;
}

#[async_trait]
pub trait ConfigRepository: Send + Sync {
    async fn load_gesture_vocabulary(&self, path: &str) -> anyhow::Result<GestureVocabulary>;
    async fn save_gesture_vocabulary(
        &self,
        path: &str,
        vocabulary: &GestureVocabulary,
    ) -> anyhow::Result<()>;

    async fn load_prize_table(&self, path: &str) -> anyhow::Result<PrizeTable>;
    async fn save_prize_table(&self, path: &str, table: &PrizeTable) -> anyhow::Result<()>;
}
