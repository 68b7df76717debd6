use std::sync::Arc;

use anyhow::Result;
use clickhouse::Client;
use tokio::sync::RwLock;
use tracing::{info, warn};

use nas_application::ops::IdentityLocks;
use nas_application::{AppState, Metrics};
use nas_domain::{
    ConfigRepository, DbConfig, GachaStateRepository, GestureVocabulary, PrizeTable,
    SendEventRepository,
};
use nas_infrastructure::{
    AppConfig, ClickhouseRepo, ConfigFileRepository, DefaultHealthService, InMemoryRepo,
    SystemClock, ThreadRandomSource, STORAGE_MEMORY,
};

pub struct AppContext {
    pub state: AppState,
}

struct Stores {
    events: Arc<dyn SendEventRepository>,
    gacha: Arc<dyn GachaStateRepository>,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config()?;
        let db_config = config.to_db_config();

        let stores = open_stores(&db_config).await?;
        stores.events.ensure_schema().await?;

        let config_repo = Arc::new(ConfigFileRepository::new());
        let gestures = load_gestures(config_repo.as_ref(), &runtime_config.stamps_path).await;
        let prize_table = load_prize_table(config_repo.as_ref(), &runtime_config.prizes_path).await;

        let state = AppState {
            config: runtime_config,
            event_repo: stores.events.clone(),
            gacha_repo: stores.gacha,
            config_repo,
            health: Arc::new(DefaultHealthService::new(stores.events)),
            clock: Arc::new(SystemClock),
            random: Arc::new(ThreadRandomSource),
            gestures: Arc::new(RwLock::new(gestures)),
            prize_table: Arc::new(RwLock::new(prize_table)),
            identity_locks: Arc::new(IdentityLocks::default()),
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}

async fn open_stores(db_config: &DbConfig) -> Result<Stores> {
    if db_config.storage == STORAGE_MEMORY {
        warn!("using in-memory storage; sends and draws are lost on exit");
        let repo = Arc::new(InMemoryRepo::new());
        return Ok(Stores {
            events: repo.clone(),
            gacha: repo,
        });
    }

    let mut clickhouse = Client::default()
        .with_url(&db_config.clickhouse_url)
        .with_database(&db_config.clickhouse_database);
    if let Some(user) = &db_config.clickhouse_user {
        clickhouse = clickhouse.with_user(user);
    }
    if let Some(password) = &db_config.clickhouse_password {
        clickhouse = clickhouse.with_password(password);
    }
    info!(
        url = %db_config.clickhouse_url,
        database = %db_config.clickhouse_database,
        "using clickhouse storage"
    );
    let repo = Arc::new(ClickhouseRepo::new(
        clickhouse,
        db_config.clickhouse_database.clone(),
    ));
    Ok(Stores {
        events: repo.clone(),
        gacha: repo,
    })
}

async fn load_gestures(repo: &dyn ConfigRepository, path: &str) -> GestureVocabulary {
    let loaded = repo
        .load_gesture_vocabulary(path)
        .await
        .map(|vocabulary| vocabulary.normalized())
        .and_then(|vocabulary| {
            vocabulary.validate()?;
            Ok(vocabulary)
        });
    match loaded {
        Ok(vocabulary) => vocabulary,
        Err(err) => {
            warn!("stamps file {} unusable, using built-in stamps: {}", path, err);
            GestureVocabulary::default()
        }
    }
}

async fn load_prize_table(repo: &dyn ConfigRepository, path: &str) -> PrizeTable {
    let loaded = repo
        .load_prize_table(path)
        .await
        .map(|table| table.normalized())
        .and_then(|table| {
            table.validate()?;
            Ok(table)
        });
    match loaded {
        Ok(table) => table,
        Err(err) => {
            warn!("prize file {} unusable, using built-in prizes: {}", path, err);
            PrizeTable::default()
        }
    }
}
