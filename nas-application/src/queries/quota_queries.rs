use chrono::{DateTime, Utc};

use crate::error::store_failure;
use crate::{AppError, AppState};
use nas_domain::{EconomyIdentity, PeriodWindow, QuotaStatus};

fn period_window(state: &AppState, now: DateTime<Utc>) -> PeriodWindow {
    PeriodWindow::containing(now, &state.config.period_anchor)
}

pub fn is_self_target(identity: &EconomyIdentity, candidate_recipient_id: &str) -> bool {
    identity.is_self_target(candidate_recipient_id)
}

pub async fn sent_this_period(
    state: &AppState,
    identity: &EconomyIdentity,
    now: DateTime<Utc>,
) -> Result<u64, AppError> {
    let window = period_window(state, now);
    state
        .event_repo
        .count_events_by_sender(
            &identity.user_id,
            &identity.team_id,
            window.current_start_seconds(),
            None,
        )
        .await
        .map_err(|err| store_failure(&state.metrics, "count sends this period", err))
}

pub async fn sent_last_period(
    state: &AppState,
    identity: &EconomyIdentity,
    now: DateTime<Utc>,
) -> Result<u64, AppError> {
    let window = period_window(state, now);
    state
        .event_repo
        .count_events_by_sender(
            &identity.user_id,
            &identity.team_id,
            window.previous_start_seconds(),
            Some(window.current_start_seconds()),
        )
        .await
        .map_err(|err| store_failure(&state.metrics, "count sends last period", err))
}

pub async fn bonus_allowance(
    state: &AppState,
    identity: &EconomyIdentity,
    now: DateTime<Utc>,
) -> Result<u64, AppError> {
    let last = sent_last_period(state, identity, now).await?;
    Ok(state.config.quota_policy().bonus_allowance(last))
}

pub async fn remaining_allowance(
    state: &AppState,
    identity: &EconomyIdentity,
    now: DateTime<Utc>,
) -> Result<i64, AppError> {
    let sent = sent_this_period(state, identity, now).await?;
    let last = sent_last_period(state, identity, now).await?;
    Ok(state.config.quota_policy().remaining_allowance(sent, last))
}

pub async fn quota_status(
    state: &AppState,
    identity: &EconomyIdentity,
    now: DateTime<Utc>,
) -> Result<QuotaStatus, AppError> {
    let policy = state.config.quota_policy();
    let sent = sent_this_period(state, identity, now).await?;
    let last = sent_last_period(state, identity, now).await?;
    Ok(QuotaStatus {
        sent_this_period: sent,
        sent_last_period: last,
        bonus_allowance: policy.bonus_allowance(last),
        remaining_allowance: policy.remaining_allowance(sent, last),
        period_start: period_window(state, now).current_start_seconds(),
    })
}
