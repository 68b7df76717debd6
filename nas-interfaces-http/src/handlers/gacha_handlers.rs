use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

use nas_application::{AppState, NasEngine};
use nas_domain::{
    DrawResponse, GachaStatus, IdentityQuery, TicketConsumeRequest, TicketConsumeResponse,
    TicketInventory,
};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_gacha_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<IdentityQuery>,
) -> Result<Json<GachaStatus>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let status = NasEngine::new(&state, query.into())?.gacha_status().await?;
    Ok(Json(status))
}

pub async fn draw(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<IdentityQuery>,
) -> Result<Json<DrawResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let prize = NasEngine::new(&state, payload.into())?.draw().await?;
    Ok(Json(DrawResponse { prize }))
}

pub async fn list_tickets(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<IdentityQuery>,
) -> Result<Json<TicketInventory>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let tickets = NasEngine::new(&state, query.into())?
        .ticket_inventory()
        .await?;
    Ok(Json(tickets))
}

pub async fn consume_ticket(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<TicketConsumeRequest>,
) -> Result<Json<TicketConsumeResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let consumed = NasEngine::new(&state, payload.owner.into())?
        .consume_ticket(&payload.ticket)
        .await?;
    Ok(Json(TicketConsumeResponse { consumed }))
}
