use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use nas_application::commands::config_commands;
use nas_application::queries::config_queries;
use nas_application::AppState;
use nas_domain::{GestureVocabulary, PrizeTable};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_prize_table(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PrizeTable>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(config_queries::get_prize_table(&state).await))
}

pub async fn update_prize_table(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PrizeTable>,
) -> Result<StatusCode, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    config_commands::update_prize_table(&state, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_stamps(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<GestureVocabulary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(config_queries::get_gesture_vocabulary(&state).await))
}

pub async fn update_stamps(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<GestureVocabulary>,
) -> Result<StatusCode, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    config_commands::update_gesture_vocabulary(&state, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}
