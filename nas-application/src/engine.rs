//! Identity-scoped entry point to the economy rules.
//!
//! A `NasEngine` is bound to one `(user, team)` identity. Each public call reads the
//! clock exactly once and threads that instant through every store query it makes,
//! so a call straddling a period boundary still sees one consistent window.

use chrono::{DateTime, Utc};

use crate::commands::{gacha_commands, send_commands};
use crate::queries::{gacha_queries, quota_queries};
use crate::{AppError, AppState};
use nas_domain::{EconomyIdentity, GachaSnapshot, GachaStatus, QuotaStatus, TicketInventory};

pub struct NasEngine<'a> {
    state: &'a AppState,
    identity: EconomyIdentity,
}

impl<'a> NasEngine<'a> {
    pub fn new(state: &'a AppState, identity: EconomyIdentity) -> Result<Self, AppError> {
        let identity = identity.normalized();
        if identity.user_id.is_empty() {
            return Err(AppError::BadRequest("user_id must not be empty".to_string()));
        }
        if identity.team_id.is_empty() {
            return Err(AppError::BadRequest("team_id must not be empty".to_string()));
        }
        Ok(Self { state, identity })
    }

    pub fn identity(&self) -> &EconomyIdentity {
        &self.identity
    }

    fn now(&self) -> DateTime<Utc> {
        self.state.clock.now()
    }

    pub fn is_self_target(&self, candidate_recipient_id: &str) -> bool {
        quota_queries::is_self_target(&self.identity, candidate_recipient_id)
    }

    pub async fn sent_this_period(&self) -> Result<u64, AppError> {
        quota_queries::sent_this_period(self.state, &self.identity, self.now()).await
    }

    pub async fn sent_last_period(&self) -> Result<u64, AppError> {
        quota_queries::sent_last_period(self.state, &self.identity, self.now()).await
    }

    pub async fn bonus_allowance(&self) -> Result<u64, AppError> {
        quota_queries::bonus_allowance(self.state, &self.identity, self.now()).await
    }

    pub async fn remaining_allowance(&self) -> Result<i64, AppError> {
        quota_queries::remaining_allowance(self.state, &self.identity, self.now()).await
    }

    pub async fn quota_status(&self) -> Result<QuotaStatus, AppError> {
        quota_queries::quota_status(self.state, &self.identity, self.now()).await
    }

    pub async fn send_by_gesture(
        &self,
        recipient_id: &str,
        recipient_name: &str,
        gesture_token: &str,
    ) -> Result<bool, AppError> {
        send_commands::send_by_gesture(
            self.state,
            &self.identity,
            recipient_id,
            recipient_name,
            gesture_token,
            self.now(),
        )
        .await
    }

    pub async fn send_by_message(
        &self,
        recipient_id: &str,
        recipient_name: &str,
    ) -> Result<bool, AppError> {
        send_commands::send_by_message(
            self.state,
            &self.identity,
            recipient_id,
            recipient_name,
            self.now(),
        )
        .await
    }

    pub async fn lifetime_received(&self) -> Result<u64, AppError> {
        gacha_queries::lifetime_received(self.state, &self.identity).await
    }

    pub async fn latest_snapshot(&self) -> Result<Option<GachaSnapshot>, AppError> {
        gacha_queries::latest_snapshot(self.state, &self.identity).await
    }

    pub async fn draws_remaining(&self) -> Result<u64, AppError> {
        gacha_queries::draws_remaining(self.state, &self.identity).await
    }

    pub async fn can_draw(&self) -> Result<bool, AppError> {
        gacha_queries::can_draw(self.state, &self.identity).await
    }

    pub async fn tokens_until_next_draw(&self) -> Result<u64, AppError> {
        gacha_queries::tokens_until_next_draw(self.state, &self.identity).await
    }

    pub async fn gacha_status(&self) -> Result<GachaStatus, AppError> {
        gacha_queries::gacha_status(self.state, &self.identity).await
    }

    pub async fn draw(&self) -> Result<Option<String>, AppError> {
        gacha_commands::draw(self.state, &self.identity, self.now()).await
    }

    pub async fn ticket_inventory(&self) -> Result<TicketInventory, AppError> {
        gacha_queries::ticket_inventory(self.state, &self.identity).await
    }

    pub async fn consume_ticket(&self, prize_name: &str) -> Result<bool, AppError> {
        gacha_commands::consume_ticket(self.state, &self.identity, prize_name, self.now()).await
    }
}
