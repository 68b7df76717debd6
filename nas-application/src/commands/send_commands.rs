use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::store_failure;
use crate::queries::quota_queries;
use crate::{AppError, AppState};
use nas_domain::{datetime_to_seconds, EconomyIdentity, GestureType, SendEvent};

/// Send triggered by a chat stamp. Unknown stamps are rejected before any store access.
pub async fn send_by_gesture(
    state: &AppState,
    identity: &EconomyIdentity,
    recipient_id: &str,
    recipient_name: &str,
    gesture_token: &str,
    now: DateTime<Utc>,
) -> Result<bool, AppError> {
    let recognized = state.gestures.read().await.is_send_trigger(gesture_token);
    if !recognized {
        debug!(
            sender = %identity.user_id,
            gesture = %gesture_token,
            "send rejected: gesture not in vocabulary"
        );
        state.metrics.record_send_rejected();
        return Ok(false);
    }
    dispatch_send(
        state,
        identity,
        recipient_id,
        recipient_name,
        GestureType::Stamp,
        now,
    )
    .await
}

pub async fn send_by_message(
    state: &AppState,
    identity: &EconomyIdentity,
    recipient_id: &str,
    recipient_name: &str,
    now: DateTime<Utc>,
) -> Result<bool, AppError> {
    dispatch_send(
        state,
        identity,
        recipient_id,
        recipient_name,
        GestureType::Message,
        now,
    )
    .await
}

async fn dispatch_send(
    state: &AppState,
    identity: &EconomyIdentity,
    recipient_id: &str,
    recipient_name: &str,
    gesture_type: GestureType,
    now: DateTime<Utc>,
) -> Result<bool, AppError> {
    let recipient_id = recipient_id.trim();
    if recipient_id.is_empty() || quota_queries::is_self_target(identity, recipient_id) {
        debug!(sender = %identity.user_id, "send rejected: missing or self recipient");
        state.metrics.record_send_rejected();
        return Ok(false);
    }

    let _guard = state.identity_locks.acquire(&identity.lock_key()).await;
    let remaining = quota_queries::remaining_allowance(state, identity, now).await?;
    if remaining <= 0 {
        debug!(
            sender = %identity.user_id,
            remaining,
            "send rejected: quota exhausted"
        );
        state.metrics.record_send_rejected();
        return Ok(false);
    }

    let event = SendEvent::from_identity(
        identity,
        recipient_id,
        recipient_name.trim(),
        gesture_type,
        datetime_to_seconds(now),
    );
    state
        .event_repo
        .append_send_event(&event)
        .await
        .map_err(|err| store_failure(&state.metrics, "append send event", err))?;
    state.metrics.record_send_accepted();
    debug!(
        sender = %event.sender_id,
        recipient = %event.recipient_id,
        team = %event.team_id,
        gesture = gesture_type.as_str(),
        "send recorded"
    );
    Ok(true)
}
