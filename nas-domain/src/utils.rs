use chrono::{DateTime, Utc};

pub fn datetime_to_seconds(value: DateTime<Utc>) -> f64 {
    value.timestamp_micros() as f64 / 1_000_000.0
}
