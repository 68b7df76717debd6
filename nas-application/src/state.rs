use std::sync::Arc;

use nas_domain::ports::{
    Clock, ConfigRepository, GachaStateRepository, HealthCheckService, RandomSource,
    SendEventRepository,
};
use nas_domain::{GestureVocabulary, PrizeTable, RuntimeConfig};
use tokio::sync::RwLock;

use crate::ops::IdentityLocks;
use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub event_repo: Arc<dyn SendEventRepository>,
    pub gacha_repo: Arc<dyn GachaStateRepository>,
    pub config_repo: Arc<dyn ConfigRepository>,
    pub health: Arc<dyn HealthCheckService>,
    pub clock: Arc<dyn Clock>,
    pub random: Arc<dyn RandomSource>,
    pub gestures: Arc<RwLock<GestureVocabulary>>,
    pub prize_table: Arc<RwLock<PrizeTable>>,
    pub identity_locks: Arc<IdentityLocks>,
    pub metrics: Arc<Metrics>,
}
