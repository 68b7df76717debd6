use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use nas_application::{AppState, NasEngine};
use nas_domain::{MessageSendRequest, SendResponse, StampSendRequest};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn send_stamp(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<StampSendRequest>,
) -> Result<Json<SendResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let engine = NasEngine::new(&state, payload.sender.into())?;
    let sent = engine
        .send_by_gesture(&payload.recipient_id, &payload.recipient_name, &payload.stamp)
        .await?;
    Ok(Json(SendResponse { sent }))
}

pub async fn send_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<MessageSendRequest>,
) -> Result<Json<SendResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let engine = NasEngine::new(&state, payload.sender.into())?;
    let sent = engine
        .send_by_message(&payload.recipient_id, &payload.recipient_name)
        .await?;
    Ok(Json(SendResponse { sent }))
}
