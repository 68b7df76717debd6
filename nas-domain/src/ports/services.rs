use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Uniform rolls in `[0, 1)` for prize selection.
pub trait RandomSource: Send + Sync {
    fn roll(&self) -> f64;
}

#[async_trait]
pub trait HealthCheckService: Send + Sync {
    async fn check_database(&self) -> anyhow::Result<bool>;
}
