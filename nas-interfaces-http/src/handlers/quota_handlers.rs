use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

use nas_application::{AppState, NasEngine};
use nas_domain::{IdentityQuery, QuotaStatus};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_quota(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<IdentityQuery>,
) -> Result<Json<QuotaStatus>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let status = NasEngine::new(&state, query.into())?.quota_status().await?;
    Ok(Json(status))
}
