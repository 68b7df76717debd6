use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    sends_accepted: AtomicU64,
    sends_rejected: AtomicU64,
    draws: AtomicU64,
    draws_rejected: AtomicU64,
    prizes_won: AtomicU64,
    tickets_consumed: AtomicU64,
    store_errors: AtomicU64,
}

impl Metrics {
    pub fn record_send_accepted(&self) {
        self.sends_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_send_rejected(&self) {
        self.sends_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_draw(&self, won_prize: bool) {
        self.draws.fetch_add(1, Ordering::Relaxed);
        if won_prize {
            self.prizes_won.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_draw_rejected(&self) {
        self.draws_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ticket_consumed(&self) {
        self.tickets_consumed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_error(&self) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn sends_accepted(&self) -> u64 {
        self.sends_accepted.load(Ordering::Relaxed)
    }

    pub fn sends_rejected(&self) -> u64 {
        self.sends_rejected.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let sends_accepted = self.sends_accepted.load(Ordering::Relaxed);
        let sends_rejected = self.sends_rejected.load(Ordering::Relaxed);
        let draws = self.draws.load(Ordering::Relaxed);
        let draws_rejected = self.draws_rejected.load(Ordering::Relaxed);
        let prizes_won = self.prizes_won.load(Ordering::Relaxed);
        let tickets_consumed = self.tickets_consumed.load(Ordering::Relaxed);
        let store_errors = self.store_errors.load(Ordering::Relaxed);

        format!(
            "# TYPE nas_sends_accepted_total counter\n\
nas_sends_accepted_total {}\n\
# TYPE nas_sends_rejected_total counter\n\
nas_sends_rejected_total {}\n\
# TYPE nas_gacha_draws_total counter\n\
nas_gacha_draws_total {}\n\
# TYPE nas_gacha_draws_rejected_total counter\n\
nas_gacha_draws_rejected_total {}\n\
# TYPE nas_gacha_prizes_won_total counter\n\
nas_gacha_prizes_won_total {}\n\
# TYPE nas_tickets_consumed_total counter\n\
nas_tickets_consumed_total {}\n\
# TYPE nas_store_errors_total counter\n\
nas_store_errors_total {}\n",
            sends_accepted,
            sends_rejected,
            draws,
            draws_rejected,
            prizes_won,
            tickets_consumed,
            store_errors
        )
    }
}
