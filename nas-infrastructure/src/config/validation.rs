use anyhow::{anyhow, Result};

pub const STORAGE_CLICKHOUSE: &str = "clickhouse";
pub const STORAGE_MEMORY: &str = "memory";

const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;

pub fn validate_storage(value: &str) -> Result<()> {
    match value {
        STORAGE_CLICKHOUSE | STORAGE_MEMORY => Ok(()),
        other => Err(anyhow!(
            "storage must be '{}' or '{}', got '{}'",
            STORAGE_CLICKHOUSE,
            STORAGE_MEMORY,
            other
        )),
    }
}

pub fn validate_utc_offset(minutes: i32) -> Result<()> {
    if minutes.abs() > MAX_UTC_OFFSET_MINUTES {
        return Err(anyhow!(
            "period_utc_offset_minutes must be within +/-{}",
            MAX_UTC_OFFSET_MINUTES
        ));
    }
    Ok(())
}

pub fn validate_bonus_rate(rate: f64) -> Result<()> {
    if !rate.is_finite() || !(0.0..=10.0).contains(&rate) {
        return Err(anyhow!("bonus_rate must be within [0, 10]"));
    }
    Ok(())
}
