use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::store_failure;
use crate::queries::gacha_queries;
use crate::{AppError, AppState};
use nas_domain::{consume_ticket_snapshot, datetime_to_seconds, EconomyIdentity};

fn gacha_lock_key(identity: &EconomyIdentity) -> String {
    format!("gacha/{}", identity.lock_key())
}

/// One lottery draw. `Ok(None)` covers both "cannot afford" and "won nothing".
pub async fn draw(
    state: &AppState,
    identity: &EconomyIdentity,
    now: DateTime<Utc>,
) -> Result<Option<String>, AppError> {
    let _guard = state
        .identity_locks
        .acquire(&gacha_lock_key(identity))
        .await;
    let policy = state.config.gacha_policy();
    let latest = gacha_queries::latest_snapshot(state, identity).await?;
    let received = gacha_queries::lifetime_received(state, identity).await?;
    if !policy.can_draw(latest.as_ref(), received) {
        debug!(
            user = %identity.user_id,
            received,
            used = latest.as_ref().map(|snapshot| snapshot.used).unwrap_or(0),
            "draw rejected: not enough received tokens"
        );
        state.metrics.record_draw_rejected();
        return Ok(None);
    }

    let roll = state.random.roll();
    let prize = {
        let table = state.prize_table.read().await;
        table.select(roll).map(str::to_string)
    };
    let snapshot = policy.draw_snapshot(
        identity,
        latest.as_ref(),
        received,
        prize.as_deref(),
        datetime_to_seconds(now),
    );
    state
        .gacha_repo
        .append_snapshot(&snapshot)
        .await
        .map_err(|err| store_failure(&state.metrics, "append gacha snapshot", err))?;
    state.metrics.record_draw(prize.is_some());
    info!(
        user = %identity.user_id,
        first_draw = latest.is_none(),
        used = snapshot.used,
        prize = prize.as_deref().unwrap_or("<none>"),
        "gacha draw"
    );
    Ok(prize)
}

pub async fn consume_ticket(
    state: &AppState,
    identity: &EconomyIdentity,
    prize_name: &str,
    now: DateTime<Utc>,
) -> Result<bool, AppError> {
    let _guard = state
        .identity_locks
        .acquire(&gacha_lock_key(identity))
        .await;
    let latest = gacha_queries::latest_snapshot(state, identity).await?;
    let Some(snapshot) =
        consume_ticket_snapshot(latest.as_ref(), prize_name.trim(), datetime_to_seconds(now))
    else {
        debug!(
            user = %identity.user_id,
            ticket = %prize_name,
            "ticket consume rejected: none held"
        );
        return Ok(false);
    };
    state
        .gacha_repo
        .append_snapshot(&snapshot)
        .await
        .map_err(|err| store_failure(&state.metrics, "append gacha snapshot", err))?;
    state.metrics.record_ticket_consumed();
    info!(user = %identity.user_id, ticket = %prize_name, "ticket consumed");
    Ok(true)
}
