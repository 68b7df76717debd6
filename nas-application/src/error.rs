use thiserror::Error;
use tracing::error;

use crate::Metrics;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Store faults abort the operation unchanged; nothing is retried here.
pub(crate) fn store_failure(metrics: &Metrics, operation: &str, err: anyhow::Error) -> AppError {
    error!("{} failed: {}", operation, err);
    metrics.record_store_error();
    AppError::Internal(err.context(format!("{operation} failed")))
}
