use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::RwLock;

use nas_application::commands::config_commands;
use nas_application::ops::IdentityLocks;
use nas_application::queries::config_queries;
use nas_application::{AppError, AppState, Metrics, NasEngine};
use nas_domain::{
    datetime_to_seconds, Clock, ConfigRepository, EconomyIdentity, GachaSnapshot,
    GachaStateRepository, GestureType, GestureVocabulary, PrizeEntry, PrizeTable, RandomSource,
    RuntimeConfig, SendEvent, SendEventRepository,
};
use nas_infrastructure::{ConfigFileRepository, DefaultHealthService, InMemoryRepo};

const TEAM: &str = "T1";

struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Replays queued rolls, then rolls past every prize.
#[derive(Default)]
struct ScriptedRandom {
    rolls: Mutex<VecDeque<f64>>,
}

impl ScriptedRandom {
    fn push(&self, roll: f64) {
        self.rolls.lock().unwrap().push_back(roll);
    }
}

impl RandomSource for ScriptedRandom {
    fn roll(&self) -> f64 {
        self.rolls.lock().unwrap().pop_front().unwrap_or(0.999)
    }
}

struct UnavailableStore;

#[async_trait]
impl SendEventRepository for UnavailableStore {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn append_send_event(&self, _event: &SendEvent) -> anyhow::Result<()> {
        anyhow::bail!("store unavailable")
    }

    async fn count_events_by_sender(
        &self,
        _sender_id: &str,
        _team_id: &str,
        _from: f64,
        _to: Option<f64>,
    ) -> anyhow::Result<u64> {
        anyhow::bail!("store unavailable")
    }

    async fn count_events_by_recipient(
        &self,
        _recipient_id: &str,
        _team_id: &str,
    ) -> anyhow::Result<u64> {
        anyhow::bail!("store unavailable")
    }

    async fn ping(&self) -> anyhow::Result<()> {
        anyhow::bail!("store unavailable")
    }
}

#[async_trait]
impl GachaStateRepository for UnavailableStore {
    async fn append_snapshot(&self, _snapshot: &GachaSnapshot) -> anyhow::Result<()> {
        anyhow::bail!("store unavailable")
    }

    async fn latest_snapshot_for(
        &self,
        _user_id: &str,
        _team_id: &str,
    ) -> anyhow::Result<Option<GachaSnapshot>> {
        anyhow::bail!("store unavailable")
    }
}

struct Harness {
    state: AppState,
    repo: Arc<InMemoryRepo>,
    clock: Arc<FixedClock>,
    random: Arc<ScriptedRandom>,
}

/// Wednesday; the current period opened Monday 2026-10-12 00:00 UTC.
fn wednesday_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
}

fn harness() -> Harness {
    let repo = Arc::new(InMemoryRepo::new());
    let clock = Arc::new(FixedClock::at(wednesday_noon()));
    let random = Arc::new(ScriptedRandom::default());
    let state = AppState {
        config: RuntimeConfig::default(),
        event_repo: repo.clone(),
        gacha_repo: repo.clone(),
        config_repo: Arc::new(ConfigFileRepository::new()),
        health: Arc::new(DefaultHealthService::new(repo.clone())),
        clock: clock.clone(),
        random: random.clone(),
        gestures: Arc::new(RwLock::new(GestureVocabulary::default())),
        prize_table: Arc::new(RwLock::new(PrizeTable::default())),
        identity_locks: Arc::new(IdentityLocks::default()),
        metrics: Arc::new(Metrics::default()),
    };
    Harness {
        state,
        repo,
        clock,
        random,
    }
}

fn identity(user_id: &str) -> EconomyIdentity {
    EconomyIdentity::new(user_id, user_id, TEAM)
}

fn engine<'a>(state: &'a AppState, user_id: &str) -> NasEngine<'a> {
    NasEngine::new(state, identity(user_id)).unwrap()
}

async fn seed_event(repo: &InMemoryRepo, sender: &str, recipient: &str, at: DateTime<Utc>) {
    seed_event_in(repo, TEAM, sender, recipient, at).await;
}

async fn seed_event_in(
    repo: &InMemoryRepo,
    team: &str,
    sender: &str,
    recipient: &str,
    at: DateTime<Utc>,
) {
    repo.append_send_event(&SendEvent {
        sender_id: sender.to_string(),
        sender_name: sender.to_string(),
        recipient_id: recipient.to_string(),
        recipient_name: recipient.to_string(),
        team_id: team.to_string(),
        gesture_type: GestureType::Stamp,
        timestamp: datetime_to_seconds(at),
    })
    .await
    .unwrap();
}

async fn total_sent_by(repo: &InMemoryRepo, sender: &str) -> u64 {
    repo.count_events_by_sender(sender, TEAM, 0.0, None)
        .await
        .unwrap()
}

#[tokio::test]
async fn stamp_send_records_one_event_and_unknown_stamp_records_none() {
    let h = harness();
    let alice = engine(&h.state, "alice");
    assert!(alice.send_by_gesture("bob", "bob", "eggplant").await.unwrap());
    assert_eq!(total_sent_by(&h.repo, "alice").await, 1);
    assert_eq!(h.repo.count_events_by_recipient("bob", TEAM).await.unwrap(), 1);

    let carol = engine(&h.state, "carol");
    assert!(!carol
        .send_by_gesture("bob", "bob", "unknown_gesture")
        .await
        .unwrap());
    assert_eq!(total_sent_by(&h.repo, "carol").await, 0);
}

#[tokio::test]
async fn quota_exhausts_after_weekly_allowance() {
    let h = harness();
    let alice = engine(&h.state, "alice");
    for n in 0..30 {
        let recipient = format!("user_{n}");
        assert!(alice
            .send_by_message(&recipient, &recipient)
            .await
            .unwrap());
    }
    assert_eq!(alice.sent_this_period().await.unwrap(), 30);
    assert_eq!(alice.remaining_allowance().await.unwrap(), 0);
    assert!(!alice.send_by_gesture("bob", "bob", "eggplant").await.unwrap());
    assert!(!alice.send_by_message("bob", "bob").await.unwrap());
    assert_eq!(total_sent_by(&h.repo, "alice").await, 30);
    assert_eq!(h.state.metrics.sends_accepted(), 30);
    assert_eq!(h.state.metrics.sends_rejected(), 2);
}

#[tokio::test]
async fn fresh_identity_has_full_quota_and_no_bonus() {
    let h = harness();
    let alice = engine(&h.state, "alice");
    assert_eq!(alice.remaining_allowance().await.unwrap(), 30);
    assert_eq!(alice.bonus_allowance().await.unwrap(), 0);
    let status = alice.quota_status().await.unwrap();
    assert_eq!(status.sent_this_period, 0);
    assert_eq!(status.sent_last_period, 0);
    assert_eq!(status.remaining_allowance, 30);
}

#[tokio::test]
async fn bonus_is_ceiling_of_a_fifth_of_last_period() {
    for (last_period, bonus) in [(1, 1), (5, 1), (6, 2), (10, 2), (11, 3), (35, 7)] {
        let h = harness();
        let week_ago = wednesday_noon() - Duration::days(7);
        for n in 0..last_period {
            seed_event(&h.repo, "alice", &format!("user_{n}"), week_ago).await;
        }
        let alice = engine(&h.state, "alice");
        assert_eq!(alice.sent_last_period().await.unwrap(), last_period);
        assert_eq!(alice.bonus_allowance().await.unwrap(), bonus, "k={last_period}");
        assert_eq!(alice.remaining_allowance().await.unwrap(), 30 + bonus as i64);
    }
}

#[tokio::test]
async fn remaining_allowance_identity_holds_with_mixed_history() {
    let h = harness();
    let now = wednesday_noon();
    for n in 0..4 {
        seed_event(&h.repo, "alice", &format!("a{n}"), now - Duration::days(8)).await;
    }
    for n in 0..7 {
        seed_event(&h.repo, "alice", &format!("b{n}"), now - Duration::hours(n + 1)).await;
    }
    // Two periods back; ignored by both windows.
    seed_event(&h.repo, "alice", "old", now - Duration::days(20)).await;
    let alice = engine(&h.state, "alice");
    let sent = alice.sent_this_period().await.unwrap() as i64;
    let bonus = alice.bonus_allowance().await.unwrap() as i64;
    assert_eq!(sent, 7);
    assert_eq!(bonus, 1);
    assert_eq!(alice.remaining_allowance().await.unwrap(), 30 - sent + bonus);
}

#[tokio::test]
async fn event_at_period_start_counts_in_current_period() {
    let h = harness();
    let monday = Utc.with_ymd_and_hms(2026, 10, 12, 0, 0, 0).unwrap();
    seed_event(&h.repo, "alice", "bob", monday).await;
    seed_event(&h.repo, "alice", "bob", monday - Duration::milliseconds(1)).await;
    let alice = engine(&h.state, "alice");
    assert_eq!(alice.sent_this_period().await.unwrap(), 1);
    assert_eq!(alice.sent_last_period().await.unwrap(), 1);
}

#[tokio::test]
async fn rollover_resets_period_and_carries_bonus() {
    let h = harness();
    let sunday_night = Utc.with_ymd_and_hms(2026, 10, 18, 23, 59, 0).unwrap();
    h.clock.set(sunday_night);
    let alice = engine(&h.state, "alice");
    for n in 0..30 {
        let recipient = format!("user_{n}");
        assert!(alice.send_by_message(&recipient, &recipient).await.unwrap());
    }
    assert!(!alice.send_by_message("bob", "bob").await.unwrap());

    h.clock.set(sunday_night + Duration::minutes(2));
    assert_eq!(alice.sent_this_period().await.unwrap(), 0);
    assert_eq!(alice.sent_last_period().await.unwrap(), 30);
    assert_eq!(alice.bonus_allowance().await.unwrap(), 6);
    assert_eq!(alice.remaining_allowance().await.unwrap(), 36);
    assert!(alice.send_by_message("bob", "bob").await.unwrap());
}

#[tokio::test]
async fn self_send_is_rejected_without_writing() {
    let h = harness();
    let alice = engine(&h.state, "alice");
    assert!(alice.is_self_target("alice"));
    assert!(!alice.is_self_target("bob"));
    assert!(!alice.send_by_gesture("alice", "alice", "eggplant").await.unwrap());
    assert!(!alice.send_by_message("alice", "alice").await.unwrap());
    assert!(!alice.send_by_message("", "nobody").await.unwrap());
    assert_eq!(total_sent_by(&h.repo, "alice").await, 0);
}

#[tokio::test]
async fn sends_are_scoped_to_team() {
    let h = harness();
    let alice_t1 = engine(&h.state, "alice");
    assert!(alice_t1.send_by_message("bob", "bob").await.unwrap());
    let alice_t2 = NasEngine::new(&h.state, EconomyIdentity::new("alice", "alice", "T2")).unwrap();
    assert_eq!(alice_t2.sent_this_period().await.unwrap(), 0);
    let bob_t2 = NasEngine::new(&h.state, EconomyIdentity::new("bob", "bob", "T2")).unwrap();
    assert_eq!(bob_t2.lifetime_received().await.unwrap(), 0);
}

#[tokio::test]
async fn first_draw_is_free_then_costs_apply() {
    let h = harness();
    for n in 0..10 {
        seed_event(&h.repo, &format!("fan_{n}"), "alice", wednesday_noon()).await;
    }
    let alice = engine(&h.state, "alice");
    assert_eq!(alice.lifetime_received().await.unwrap(), 10);
    assert!(alice.latest_snapshot().await.unwrap().is_none());
    assert_eq!(alice.draws_remaining().await.unwrap(), 1);
    assert_eq!(alice.tokens_until_next_draw().await.unwrap(), 0);

    assert_eq!(alice.draw().await.unwrap(), None);
    let first = alice.latest_snapshot().await.unwrap().unwrap();
    assert_eq!(first.used, 0);
    assert_eq!(first.observed_received, 10);
    assert_eq!(alice.draws_remaining().await.unwrap(), 1);

    assert_eq!(alice.draw().await.unwrap(), None);
    let second = alice.latest_snapshot().await.unwrap().unwrap();
    assert_eq!(second.used, 10);
    assert!(second.timestamp > first.timestamp);
    assert_eq!(alice.draws_remaining().await.unwrap(), 0);
    assert!(!alice.can_draw().await.unwrap());

    assert_eq!(alice.draw().await.unwrap(), None);
    assert_eq!(alice.latest_snapshot().await.unwrap().unwrap(), second);

    for n in 0..3 {
        seed_event(&h.repo, &format!("late_{n}"), "alice", wednesday_noon()).await;
    }
    assert_eq!(alice.tokens_until_next_draw().await.unwrap(), 7);
}

#[tokio::test]
async fn first_draw_ignores_received_balance() {
    let h = harness();
    let alice = engine(&h.state, "alice");
    assert_eq!(alice.lifetime_received().await.unwrap(), 0);
    assert!(alice.can_draw().await.unwrap());
    alice.draw().await.unwrap();
    let status = alice.gacha_status().await.unwrap();
    assert!(status.has_snapshot);
    assert_eq!(status.used, 0);
    assert_eq!(status.draws_remaining, 0);
    assert!(!status.can_draw);
}

#[tokio::test]
async fn draws_remaining_floors_over_cost() {
    let h = harness();
    let alice = engine(&h.state, "alice");
    alice.draw().await.unwrap();
    for n in 0..27 {
        seed_event(&h.repo, &format!("fan_{n}"), "alice", wednesday_noon()).await;
    }
    assert_eq!(alice.draws_remaining().await.unwrap(), 2);
    assert_eq!(alice.tokens_until_next_draw().await.unwrap(), 3);
}

#[tokio::test]
async fn won_tickets_accumulate_and_consume_down_to_removal() {
    let h = harness();
    for n in 0..10 {
        seed_event(&h.repo, &format!("fan_{n}"), "alice", wednesday_noon()).await;
    }
    h.random.push(0.01);
    h.random.push(0.01);
    let alice = engine(&h.state, "alice");
    assert_eq!(alice.draw().await.unwrap().as_deref(), Some("prize_1"));
    assert_eq!(alice.draw().await.unwrap().as_deref(), Some("prize_1"));
    assert_eq!(alice.ticket_inventory().await.unwrap().get("prize_1"), Some(&2));

    assert!(alice.consume_ticket("prize_1").await.unwrap());
    assert_eq!(alice.ticket_inventory().await.unwrap().get("prize_1"), Some(&1));
    assert!(alice.consume_ticket("prize_1").await.unwrap());
    assert!(!alice.ticket_inventory().await.unwrap().contains_key("prize_1"));

    let before = alice.latest_snapshot().await.unwrap();
    assert!(!alice.consume_ticket("prize_1").await.unwrap());
    assert!(!alice.consume_ticket("prize_2").await.unwrap());
    assert_eq!(alice.latest_snapshot().await.unwrap(), before);
    assert_eq!(before.unwrap().used, 10);
}

#[tokio::test]
async fn consume_without_any_snapshot_is_rejected() {
    let h = harness();
    let alice = engine(&h.state, "alice");
    assert!(!alice.consume_ticket("prize_1").await.unwrap());
    assert!(alice.latest_snapshot().await.unwrap().is_none());
    assert!(alice.ticket_inventory().await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_sends_never_exceed_quota() {
    let h = harness();
    let mut tasks = Vec::new();
    for n in 0..45 {
        let state = h.state.clone();
        tasks.push(tokio::spawn(async move {
            let alice = NasEngine::new(&state, identity("alice")).unwrap();
            let recipient = format!("user_{n}");
            alice.send_by_message(&recipient, &recipient).await.unwrap()
        }));
    }
    let mut accepted = 0;
    for task in tasks {
        if task.await.unwrap() {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 30);
    assert_eq!(total_sent_by(&h.repo, "alice").await, 30);
}

#[tokio::test]
async fn concurrent_draws_spend_each_cost_once() {
    let h = harness();
    for n in 0..20 {
        seed_event(&h.repo, &format!("fan_{n}"), "alice", wednesday_noon()).await;
    }
    let mut tasks = Vec::new();
    for _ in 0..8 {
        let state = h.state.clone();
        tasks.push(tokio::spawn(async move {
            let alice = NasEngine::new(&state, identity("alice")).unwrap();
            alice.draw().await.unwrap()
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }
    // One free draw plus two paid draws out of 20 received.
    let latest = h.repo.latest_snapshot_for("alice", TEAM).await.unwrap().unwrap();
    assert_eq!(latest.used, 20);
}

#[tokio::test]
async fn blank_identity_is_rejected() {
    let h = harness();
    let result = NasEngine::new(&h.state, EconomyIdentity::new("  ", "x", TEAM));
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    let result = NasEngine::new(&h.state, EconomyIdentity::new("alice", "alice", ""));
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn store_outage_propagates_as_internal_error() {
    let h = harness();
    let store = Arc::new(UnavailableStore);
    let state = AppState {
        event_repo: store.clone(),
        gacha_repo: store,
        ..h.state.clone()
    };
    let alice = engine(&state, "alice");
    assert!(matches!(
        alice.remaining_allowance().await,
        Err(AppError::Internal(_))
    ));
    assert!(matches!(
        alice.send_by_message("bob", "bob").await,
        Err(AppError::Internal(_))
    ));
    assert!(matches!(alice.draw().await, Err(AppError::Internal(_))));
    assert!(matches!(
        alice.consume_ticket("prize_1").await,
        Err(AppError::Internal(_))
    ));
    // Self sends are settled before any store access.
    assert!(!alice.send_by_message("alice", "alice").await.unwrap());
    assert!(state
        .metrics
        .render_prometheus()
        .contains("nas_store_errors_total 4\n"));
}

#[tokio::test]
async fn gacha_balance_is_kept_per_team() {
    let h = harness();
    for n in 0..20 {
        seed_event(&h.repo, &format!("fan_{n}"), "alice", wednesday_noon()).await;
    }
    let alice_t1 = engine(&h.state, "alice");
    for _ in 0..3 {
        alice_t1.draw().await.unwrap();
    }
    assert_eq!(alice_t1.latest_snapshot().await.unwrap().unwrap().used, 20);

    for n in 0..10 {
        seed_event_in(&h.repo, "T2", &format!("fan_{n}"), "alice", wednesday_noon()).await;
    }
    let alice_t2 = NasEngine::new(&h.state, EconomyIdentity::new("alice", "alice", "T2")).unwrap();
    assert!(alice_t2.latest_snapshot().await.unwrap().is_none());
    assert_eq!(alice_t2.draws_remaining().await.unwrap(), 1);
    assert_eq!(alice_t2.tokens_until_next_draw().await.unwrap(), 0);

    alice_t2.draw().await.unwrap();
    let first = alice_t2.latest_snapshot().await.unwrap().unwrap();
    assert_eq!(first.team_id, "T2");
    assert_eq!(first.used, 0);
    assert_eq!(first.observed_received, 10);
    assert_eq!(alice_t2.draws_remaining().await.unwrap(), 1);
    assert!(alice_t2.can_draw().await.unwrap());

    assert_eq!(alice_t1.latest_snapshot().await.unwrap().unwrap().used, 20);
    assert_eq!(alice_t1.draws_remaining().await.unwrap(), 0);
}

fn harness_with_config_dir(dir: &tempfile::TempDir) -> Harness {
    let mut h = harness();
    h.state.config.stamps_path = dir.path().join("stamps.toml").to_string_lossy().to_string();
    h.state.config.prizes_path = dir.path().join("prizes.yaml").to_string_lossy().to_string();
    h
}

fn prize_table(entries: &[(&str, f64)]) -> PrizeTable {
    PrizeTable {
        entries: entries
            .iter()
            .map(|(name, probability)| PrizeEntry {
                name: name.to_string(),
                probability: *probability,
            })
            .collect(),
    }
}

#[tokio::test]
async fn invalid_prize_tables_are_rejected_and_change_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let h = harness_with_config_dir(&dir);
    for table in [
        prize_table(&[("mug", 0.7), ("pen", 0.6)]),
        prize_table(&[("mug", 0.1), (" mug ", 0.1)]),
        prize_table(&[("mug", -0.1)]),
    ] {
        let result = config_commands::update_prize_table(&h.state, table).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
    assert_eq!(config_queries::get_prize_table(&h.state).await, PrizeTable::default());
    assert!(!dir.path().join("prizes.yaml").exists());
}

#[tokio::test]
async fn vocabulary_with_disabled_default_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let h = harness_with_config_dir(&dir);
    let vocabulary = GestureVocabulary {
        default: "eggplant".to_string(),
        stamps: [("eggplant".to_string(), false), ("party".to_string(), true)]
            .into_iter()
            .collect(),
    };
    let result = config_commands::update_gesture_vocabulary(&h.state, vocabulary).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(
        config_queries::get_gesture_vocabulary(&h.state).await,
        GestureVocabulary::default()
    );
    assert!(!dir.path().join("stamps.toml").exists());
    let alice = engine(&h.state, "alice");
    assert!(alice.send_by_gesture("bob", "bob", "eggplant").await.unwrap());
}

#[tokio::test]
async fn updated_stamps_take_effect_on_next_send() {
    let dir = tempfile::tempdir().expect("tempdir");
    let h = harness_with_config_dir(&dir);
    let alice = engine(&h.state, "alice");
    assert!(!alice.send_by_gesture("bob", "bob", "party").await.unwrap());

    let vocabulary = GestureVocabulary {
        default: "eggplant".to_string(),
        stamps: [("eggplant".to_string(), true), (" :party: ".to_string(), true)]
            .into_iter()
            .collect(),
    };
    config_commands::update_gesture_vocabulary(&h.state, vocabulary)
        .await
        .unwrap();
    assert!(alice.send_by_gesture("bob", "bob", "party").await.unwrap());
    assert_eq!(total_sent_by(&h.repo, "alice").await, 1);

    let persisted = ConfigFileRepository::new()
        .load_gesture_vocabulary(&h.state.config.stamps_path)
        .await
        .unwrap();
    assert_eq!(persisted, config_queries::get_gesture_vocabulary(&h.state).await);
    assert!(persisted.is_send_trigger("party"));
}

#[tokio::test]
async fn updated_prize_table_drives_next_draw() {
    let dir = tempfile::tempdir().expect("tempdir");
    let h = harness_with_config_dir(&dir);
    let table = prize_table(&[("mug", 1.0)]);
    config_commands::update_prize_table(&h.state, table.clone())
        .await
        .unwrap();

    let alice = engine(&h.state, "alice");
    assert_eq!(alice.draw().await.unwrap().as_deref(), Some("mug"));
    assert_eq!(alice.ticket_inventory().await.unwrap().get("mug"), Some(&1));

    let persisted = ConfigFileRepository::new()
        .load_prize_table(&h.state.config.prizes_path)
        .await
        .unwrap();
    assert_eq!(persisted, table);
}
