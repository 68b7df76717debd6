pub mod config_queries;
pub mod gacha_queries;
pub mod quota_queries;
