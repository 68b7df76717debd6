use async_trait::async_trait;
use tokio::sync::RwLock;

use nas_domain::{GachaSnapshot, GachaStateRepository, SendEvent, SendEventRepository};

/// Process-local store for `storage = "memory"` and tests. Contents are lost on exit.
#[derive(Default)]
pub struct InMemoryRepo {
    events: RwLock<Vec<SendEvent>>,
    snapshots: RwLock<Vec<GachaSnapshot>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SendEventRepository for InMemoryRepo {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn append_send_event(&self, event: &SendEvent) -> anyhow::Result<()> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn count_events_by_sender(
        &self,
        sender_id: &str,
        team_id: &str,
        from: f64,
        to: Option<f64>,
    ) -> anyhow::Result<u64> {
        let events = self.events.read().await;
        let count = events
            .iter()
            .filter(|event| event.sender_id == sender_id && event.team_id == team_id)
            .filter(|event| event.timestamp >= from)
            .filter(|event| to.map_or(true, |end| event.timestamp < end))
            .count();
        Ok(count as u64)
    }

    async fn count_events_by_recipient(
        &self,
        recipient_id: &str,
        team_id: &str,
    ) -> anyhow::Result<u64> {
        let events = self.events.read().await;
        let count = events
            .iter()
            .filter(|event| event.recipient_id == recipient_id && event.team_id == team_id)
            .count();
        Ok(count as u64)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl GachaStateRepository for InMemoryRepo {
    async fn append_snapshot(&self, snapshot: &GachaSnapshot) -> anyhow::Result<()> {
        self.snapshots.write().await.push(snapshot.clone());
        Ok(())
    }

    async fn latest_snapshot_for(
        &self,
        user_id: &str,
        team_id: &str,
    ) -> anyhow::Result<Option<GachaSnapshot>> {
        let snapshots = self.snapshots.read().await;
        // max_by keeps the last of equal elements, so ties go to the later append.
        let latest = snapshots
            .iter()
            .filter(|snapshot| snapshot.user_id == user_id && snapshot.team_id == team_id)
            .max_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        Ok(latest.cloned())
    }
}
