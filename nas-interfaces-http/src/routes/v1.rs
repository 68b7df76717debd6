use axum::routing::{get, post};
use axum::Router;

use nas_application::AppState;

use crate::handlers::{
    config_handlers, gacha_handlers, ops_handlers, quota_handlers, send_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/sends/stamp", post(send_handlers::send_stamp))
        .route("/v1/sends/message", post(send_handlers::send_message))
        .route("/v1/quota", get(quota_handlers::get_quota))
        .route("/v1/gacha/status", get(gacha_handlers::get_gacha_status))
        .route("/v1/gacha/draw", post(gacha_handlers::draw))
        .route("/v1/gacha/tickets", get(gacha_handlers::list_tickets))
        .route(
            "/v1/gacha/tickets/consume",
            post(gacha_handlers::consume_ticket),
        )
        .route(
            "/v1/config/prizes",
            get(config_handlers::get_prize_table).put(config_handlers::update_prize_table),
        )
        .route(
            "/v1/config/stamps",
            get(config_handlers::get_stamps).put(config_handlers::update_stamps),
        )
        .route("/v1/ops/health/live", get(ops_handlers::health_live))
        .route("/v1/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/v1/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
