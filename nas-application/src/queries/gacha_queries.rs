use crate::error::store_failure;
use crate::{AppError, AppState};
use nas_domain::{EconomyIdentity, GachaSnapshot, GachaStatus, TicketInventory};

/// Every token ever received in the team; this pool never resets.
pub async fn lifetime_received(
    state: &AppState,
    identity: &EconomyIdentity,
) -> Result<u64, AppError> {
    state
        .event_repo
        .count_events_by_recipient(&identity.user_id, &identity.team_id)
        .await
        .map_err(|err| store_failure(&state.metrics, "count received tokens", err))
}

pub async fn latest_snapshot(
    state: &AppState,
    identity: &EconomyIdentity,
) -> Result<Option<GachaSnapshot>, AppError> {
    state
        .gacha_repo
        .latest_snapshot_for(&identity.user_id, &identity.team_id)
        .await
        .map_err(|err| store_failure(&state.metrics, "load gacha snapshot", err))
}

pub async fn draws_remaining(
    state: &AppState,
    identity: &EconomyIdentity,
) -> Result<u64, AppError> {
    let latest = latest_snapshot(state, identity).await?;
    if latest.is_none() {
        return Ok(state.config.gacha_policy().draws_remaining(None, 0));
    }
    let received = lifetime_received(state, identity).await?;
    Ok(state
        .config
        .gacha_policy()
        .draws_remaining(latest.as_ref(), received))
}

pub async fn can_draw(state: &AppState, identity: &EconomyIdentity) -> Result<bool, AppError> {
    Ok(draws_remaining(state, identity).await? >= 1)
}

pub async fn tokens_until_next_draw(
    state: &AppState,
    identity: &EconomyIdentity,
) -> Result<u64, AppError> {
    let latest = latest_snapshot(state, identity).await?;
    if latest.is_none() {
        return Ok(0);
    }
    let received = lifetime_received(state, identity).await?;
    Ok(state
        .config
        .gacha_policy()
        .tokens_until_next_draw(latest.as_ref(), received))
}

pub async fn ticket_inventory(
    state: &AppState,
    identity: &EconomyIdentity,
) -> Result<TicketInventory, AppError> {
    Ok(latest_snapshot(state, identity)
        .await?
        .map(|snapshot| snapshot.tickets)
        .unwrap_or_default())
}

pub async fn gacha_status(
    state: &AppState,
    identity: &EconomyIdentity,
) -> Result<GachaStatus, AppError> {
    let policy = state.config.gacha_policy();
    let latest = latest_snapshot(state, identity).await?;
    let received = lifetime_received(state, identity).await?;
    let draws = policy.draws_remaining(latest.as_ref(), received);
    Ok(GachaStatus {
        lifetime_received: received,
        has_snapshot: latest.is_some(),
        used: latest.as_ref().map(|snapshot| snapshot.used).unwrap_or(0),
        draws_remaining: draws,
        can_draw: draws >= 1,
        tokens_until_next_draw: policy.tokens_until_next_draw(latest.as_ref(), received),
        tickets: latest.map(|snapshot| snapshot.tickets).unwrap_or_default(),
    })
}
