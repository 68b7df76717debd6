// Runtime configuration shared by every layer

use crate::services::{GachaPolicy, PeriodAnchor, QuotaPolicy};

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub weekly_quota: u64,
    pub bonus_rate_bps: u64,
    pub gacha_cost: u64,
    pub period_anchor: PeriodAnchor,
    pub stamps_path: String,
    pub prizes_path: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl RuntimeConfig {
    pub fn quota_policy(&self) -> QuotaPolicy {
        QuotaPolicy {
            weekly_quota: self.weekly_quota,
            bonus_rate_bps: self.bonus_rate_bps,
        }
    }

    pub fn gacha_policy(&self) -> GachaPolicy {
        GachaPolicy {
            cost: self.gacha_cost,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            weekly_quota: 30,
            bonus_rate_bps: 2_000,
            gacha_cost: 10,
            period_anchor: PeriodAnchor::default(),
            stamps_path: "./stamps.toml".to_string(),
            prizes_path: "./prizes.yaml".to_string(),
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub storage: String,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}
