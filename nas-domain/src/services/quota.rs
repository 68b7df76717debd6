// Weekly send quota with a bonus carried over from last period's usage.
// The bonus rate is held in basis points so the ceiling is exact integer math.

pub const BPS_SCALE: u64 = 10_000;

pub fn rate_to_bps(rate: f64) -> u64 {
    if !rate.is_finite() || rate <= 0.0 {
        return 0;
    }
    (rate * BPS_SCALE as f64).round() as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaPolicy {
    pub weekly_quota: u64,
    pub bonus_rate_bps: u64,
}

impl QuotaPolicy {
    /// `ceil(sent_last_period * rate)`; a single prior send already earns one.
    pub fn bonus_allowance(&self, sent_last_period: u64) -> u64 {
        sent_last_period
            .saturating_mul(self.bonus_rate_bps)
            .div_ceil(BPS_SCALE)
    }

    /// Not floored at zero; callers treat anything `<= 0` as exhausted.
    pub fn remaining_allowance(&self, sent_this_period: u64, sent_last_period: u64) -> i64 {
        let quota = i64::try_from(self.weekly_quota).unwrap_or(i64::MAX);
        let sent = i64::try_from(sent_this_period).unwrap_or(i64::MAX);
        let bonus = i64::try_from(self.bonus_allowance(sent_last_period)).unwrap_or(i64::MAX);
        quota.saturating_sub(sent).saturating_add(bonus)
    }

    pub fn can_send(&self, sent_this_period: u64, sent_last_period: u64) -> bool {
        self.remaining_allowance(sent_this_period, sent_last_period) > 0
    }
}
