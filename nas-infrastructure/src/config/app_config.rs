use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use nas_domain::{parse_weekday, rate_to_bps, DbConfig, PeriodAnchor, RuntimeConfig};

use crate::config::validation::{validate_bonus_rate, validate_storage, validate_utc_offset};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub storage: String,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub weekly_quota: u64,
    pub bonus_rate: f64,
    pub gacha_cost: u64,
    pub period_anchor_weekday: String,
    pub period_anchor_hour: u32,
    pub period_utc_offset_minutes: i32,
    pub stamps_path: String,
    pub prizes_path: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            storage: "clickhouse".to_string(),
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "nas".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            weekly_quota: 30,
            bonus_rate: 0.20,
            gacha_cost: 10,
            period_anchor_weekday: "monday".to_string(),
            period_anchor_hour: 0,
            period_utc_offset_minutes: 0,
            stamps_path: "./stamps.toml".to_string(),
            prizes_path: "./prizes.yaml".to_string(),
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("NAS_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str::<AppConfig>(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_overrides(|key| env::var(key).ok());
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        self.api_token = normalize_optional(self.api_token.take());
        self.clickhouse_user = normalize_optional(self.clickhouse_user.take());
        self.clickhouse_password = normalize_optional(self.clickhouse_password.take());
        self.storage = self.storage.trim().to_lowercase();
        self.period_anchor_weekday = self.period_anchor_weekday.trim().to_lowercase();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.stamps_path = resolve_path(base, &self.stamps_path);
        self.prizes_path = resolve_path(base, &self.prizes_path);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        validate_storage(&self.storage)?;
        if self.weekly_quota == 0 {
            return Err(anyhow!("weekly_quota must be greater than 0"));
        }
        validate_bonus_rate(self.bonus_rate)?;
        if self.gacha_cost == 0 {
            return Err(anyhow!("gacha_cost must be greater than 0"));
        }
        parse_weekday(&self.period_anchor_weekday)?;
        if self.period_anchor_hour > 23 {
            return Err(anyhow!("period_anchor_hour out of range"));
        }
        validate_utc_offset(self.period_utc_offset_minutes)?;
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> Result<RuntimeConfig> {
        Ok(RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            weekly_quota: self.weekly_quota,
            bonus_rate_bps: rate_to_bps(self.bonus_rate),
            gacha_cost: self.gacha_cost,
            period_anchor: PeriodAnchor {
                weekday: parse_weekday(&self.period_anchor_weekday)?,
                hour: self.period_anchor_hour,
                utc_offset_minutes: self.period_utc_offset_minutes,
            },
            stamps_path: self.stamps_path.clone(),
            prizes_path: self.prizes_path.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        })
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            storage: self.storage.clone(),
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("NAS_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("NAS_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Some(value) = lookup("NAS_STORAGE") {
            self.storage = value;
        }
        if let Some(value) = lookup("NAS_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Some(value) = lookup("NAS_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Some(value) = lookup("NAS_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Some(value) = lookup("NAS_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Some(value) = lookup("NAS_WEEKLY_QUOTA") {
            self.weekly_quota = value.parse().unwrap_or(self.weekly_quota);
        }
        if let Some(value) = lookup("NAS_BONUS_RATE") {
            self.bonus_rate = value.parse().unwrap_or(self.bonus_rate);
        }
        if let Some(value) = lookup("NAS_GACHA_COST") {
            self.gacha_cost = value.parse().unwrap_or(self.gacha_cost);
        }
        if let Some(value) = lookup("NAS_PERIOD_ANCHOR_WEEKDAY") {
            self.period_anchor_weekday = value;
        }
        if let Some(value) = lookup("NAS_PERIOD_ANCHOR_HOUR") {
            self.period_anchor_hour = value.parse().unwrap_or(self.period_anchor_hour);
        }
        if let Some(value) = lookup("NAS_PERIOD_UTC_OFFSET_MINUTES") {
            self.period_utc_offset_minutes =
                value.parse().unwrap_or(self.period_utc_offset_minutes);
        }
        if let Some(value) = lookup("NAS_STAMPS_PATH") {
            self.stamps_path = value;
        }
        if let Some(value) = lookup("NAS_PRIZES_PATH") {
            self.prizes_path = value;
        }
        if let Some(value) = lookup("NAS_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Some(value) = lookup("NAS_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
