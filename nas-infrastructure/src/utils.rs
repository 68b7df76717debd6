use time::OffsetDateTime;

pub fn seconds_to_micros(seconds: f64) -> i64 {
    (seconds * 1_000_000.0).round() as i64
}

pub fn micros_to_seconds(micros: i64) -> f64 {
    micros as f64 / 1_000_000.0
}

pub fn seconds_to_utc(seconds: f64) -> OffsetDateTime {
    let nanos = i128::from(seconds_to_micros(seconds)).saturating_mul(1_000);
    OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

pub fn utc_to_seconds(value: OffsetDateTime) -> f64 {
    micros_to_seconds((value.unix_timestamp_nanos() / 1_000) as i64)
}
