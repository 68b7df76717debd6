use anyhow::{Context, Result};
use async_trait::async_trait;
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use nas_domain::{
    GachaSnapshot, GachaStateRepository, GestureType, SendEvent, SendEventRepository,
    TicketInventory,
};

use crate::utils::{seconds_to_micros, seconds_to_utc, utc_to_seconds};

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct SendEventRow {
    #[serde(with = "clickhouse::serde::time::datetime64::micros")]
    pub event_time: OffsetDateTime,
    pub sender_id: String,
    pub sender_name: String,
    pub recipient_id: String,
    pub recipient_name: String,
    pub team_id: String,
    pub gesture_type: String,
}

impl From<&SendEvent> for SendEventRow {
    fn from(event: &SendEvent) -> Self {
        Self {
            event_time: seconds_to_utc(event.timestamp),
            sender_id: event.sender_id.clone(),
            sender_name: event.sender_name.clone(),
            recipient_id: event.recipient_id.clone(),
            recipient_name: event.recipient_name.clone(),
            team_id: event.team_id.clone(),
            gesture_type: event.gesture_type.as_str().to_string(),
        }
    }
}

impl From<SendEventRow> for SendEvent {
    fn from(row: SendEventRow) -> Self {
        Self {
            sender_id: row.sender_id,
            sender_name: row.sender_name,
            recipient_id: row.recipient_id,
            recipient_name: row.recipient_name,
            team_id: row.team_id,
            gesture_type: GestureType::from(row.gesture_type.as_str()),
            timestamp: utc_to_seconds(row.event_time),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct GachaSnapshotRow {
    #[serde(with = "clickhouse::serde::time::datetime64::micros")]
    pub snapshot_time: OffsetDateTime,
    pub user_id: String,
    pub team_id: String,
    pub observed_received: u64,
    pub used: u64,
    pub tickets_json: String,
}

impl GachaSnapshotRow {
    fn from_snapshot(snapshot: &GachaSnapshot) -> Result<Self> {
        Ok(Self {
            snapshot_time: seconds_to_utc(snapshot.timestamp),
            user_id: snapshot.user_id.clone(),
            team_id: snapshot.team_id.clone(),
            observed_received: snapshot.observed_received,
            used: snapshot.used,
            tickets_json: serde_json::to_string(&snapshot.tickets)?,
        })
    }

    fn into_snapshot(self) -> Result<GachaSnapshot> {
        let tickets: TicketInventory = if self.tickets_json.trim().is_empty() {
            TicketInventory::new()
        } else {
            serde_json::from_str(&self.tickets_json)
                .with_context(|| format!("corrupt tickets_json for {}", self.user_id))?
        };
        Ok(GachaSnapshot {
            user_id: self.user_id,
            team_id: self.team_id,
            timestamp: utc_to_seconds(self.snapshot_time),
            observed_received: self.observed_received,
            used: self.used,
            tickets,
        })
    }
}

#[derive(Clone)]
pub struct ClickhouseRepo {
    client: Client,
    database: String,
}

impl ClickhouseRepo {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }
}

#[async_trait]
impl SendEventRepository for ClickhouseRepo {
    async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client.query(&create_db).execute().await?;

        let create_events = r#"
CREATE TABLE IF NOT EXISTS send_events (
    event_time DateTime64(6),
    sender_id String,
    sender_name String,
    recipient_id String,
    recipient_name String,
    team_id String,
    gesture_type LowCardinality(String)
) ENGINE = MergeTree
PARTITION BY toYYYYMM(event_time)
ORDER BY (team_id, sender_id, event_time)
"#;
        self.client.query(create_events).execute().await?;

        let create_snapshots = r#"
CREATE TABLE IF NOT EXISTS gacha_snapshots (
    snapshot_time DateTime64(6),
    user_id String,
    team_id String,
    observed_received UInt64,
    used UInt64,
    tickets_json String
) ENGINE = MergeTree
ORDER BY (team_id, user_id, snapshot_time)
"#;
        self.client.query(create_snapshots).execute().await?;
        Ok(())
    }

    async fn append_send_event(&self, event: &SendEvent) -> Result<()> {
        let mut insert = self.client.insert("send_events")?;
        insert.write(&SendEventRow::from(event)).await?;
        insert.end().await?;
        Ok(())
    }

    async fn count_events_by_sender(
        &self,
        sender_id: &str,
        team_id: &str,
        from: f64,
        to: Option<f64>,
    ) -> Result<u64> {
        let mut sql = String::from(
            "SELECT count() FROM send_events \
             WHERE sender_id = ? AND team_id = ? \
             AND toUnixTimestamp64Micro(event_time) >= ?",
        );
        if to.is_some() {
            sql.push_str(" AND toUnixTimestamp64Micro(event_time) < ?");
        }
        let mut query = self
            .client
            .query(&sql)
            .bind(sender_id)
            .bind(team_id)
            .bind(seconds_to_micros(from));
        if let Some(end) = to {
            query = query.bind(seconds_to_micros(end));
        }
        let count: u64 = query.fetch_one().await?;
        Ok(count)
    }

    async fn count_events_by_recipient(&self, recipient_id: &str, team_id: &str) -> Result<u64> {
        let count: u64 = self
            .client
            .query("SELECT count() FROM send_events WHERE recipient_id = ? AND team_id = ?")
            .bind(recipient_id)
            .bind(team_id)
            .fetch_one()
            .await?;
        Ok(count)
    }

    async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}

#[async_trait]
impl GachaStateRepository for ClickhouseRepo {
    async fn append_snapshot(&self, snapshot: &GachaSnapshot) -> Result<()> {
        let row = GachaSnapshotRow::from_snapshot(snapshot)?;
        let mut insert = self.client.insert("gacha_snapshots")?;
        insert.write(&row).await?;
        insert.end().await?;
        Ok(())
    }

    async fn latest_snapshot_for(
        &self,
        user_id: &str,
        team_id: &str,
    ) -> Result<Option<GachaSnapshot>> {
        let rows = self
            .client
            .query(
                "SELECT snapshot_time, user_id, team_id, observed_received, used, tickets_json \
                 FROM gacha_snapshots WHERE user_id = ? AND team_id = ? \
                 ORDER BY snapshot_time DESC LIMIT 1",
            )
            .bind(user_id)
            .bind(team_id)
            .fetch_all::<GachaSnapshotRow>()
            .await?;
        rows.into_iter()
            .next()
            .map(GachaSnapshotRow::into_snapshot)
            .transpose()
    }
}
