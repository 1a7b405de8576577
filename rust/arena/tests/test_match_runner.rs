use std::sync::Arc;
use std::thread;
use std::time::Duration;

use felt_arena::config::ArenaConfig;
use felt_arena::events::{EventBus, MatchEvent};
use felt_arena::invoker::BotInvoker;
use felt_arena::registry::BotRegistration;
use felt_arena::run_match;
use felt_bots::{create_bot, Bot};
use felt_engine::action::BotAction;
use felt_engine::view::TableView;

fn reg(id: &str, bot: Arc<dyn Bot>) -> BotRegistration {
    BotRegistration {
        id: id.to_string(),
        bot,
    }
}

fn named(id: &str) -> BotRegistration {
    let kind = id.split('-').next().unwrap_or(id);
    reg(id, Arc::from(create_bot(kind).unwrap()))
}

fn quick_config() -> ArenaConfig {
    ArenaConfig {
        hands_per_match: 4,
        equity_samples: 40,
        decision_timeout_ms: 500,
        seed: Some(1),
        ..Default::default()
    }
}

struct Sleeper;
impl Bot for Sleeper {
    fn act(&self, _view: &TableView) -> BotAction {
        thread::sleep(Duration::from_secs(3));
        BotAction::Check
    }
    fn name(&self) -> &str {
        "sleeper"
    }
}

struct MinUnderRaiser;
impl Bot for MinUnderRaiser {
    fn act(&self, view: &TableView) -> BotAction {
        // Deliberately one chip under the legal minimum, never all-in.
        BotAction::Raise {
            amount: view.min_raise_to.saturating_sub(1),
        }
    }
    fn name(&self) -> &str {
        "underraiser"
    }
}

#[test]
fn matches_are_deterministic_for_a_seed() {
    let config = quick_config();
    let invoker = BotInvoker::new(config.decision_timeout());
    let events = EventBus::new();
    let run = || {
        let seating = vec![named("baseline-a"), named("station-b")];
        run_match("m1", &seating, &config, &invoker, &events, 42).unwrap()
    };
    let a = run();
    let b = run();
    assert_eq!(a, b);
    assert_eq!(a.hands_played, 4);
    assert_eq!(a.hands_faulted, 0);
}

#[test]
fn chip_deltas_balance_across_seats() {
    let config = quick_config();
    let invoker = BotInvoker::new(config.decision_timeout());
    let events = EventBus::new();
    let seating = vec![named("baseline-a"), named("station-b"), named("maniac-c")];
    let result = run_match("m2", &seating, &config, &invoker, &events, 7).unwrap();
    assert_eq!(result.deltas.iter().sum::<i64>(), 0);
    assert_eq!(result.hands.len(), result.hands_played as usize);
    for hand in &result.hands {
        assert_eq!(hand.deltas.iter().sum::<i64>(), 0);
        assert_eq!(hand.starting_stacks, vec![config.starting_stack; 3]);
    }
}

#[test]
fn button_rotates_every_hand() {
    let config = quick_config();
    let invoker = BotInvoker::new(config.decision_timeout());
    let events = EventBus::new();
    let seating = vec![named("station-a"), named("station-b")];
    let result = run_match("m3", &seating, &config, &invoker, &events, 11).unwrap();
    let buttons: Vec<usize> = result.hands.iter().map(|h| h.button).collect();
    assert_eq!(buttons, vec![0, 1, 0, 1]);
}

#[test]
fn slow_bot_gets_the_fallback_and_a_violation() {
    let config = ArenaConfig {
        hands_per_match: 2,
        decision_timeout_ms: 25,
        equity_samples: 20,
        seed: Some(5),
        ..Default::default()
    };
    let invoker = BotInvoker::new(config.decision_timeout());
    let events = EventBus::new();
    let seating = vec![reg("sleepy", Arc::new(Sleeper)), named("station-b")];
    let result = run_match("m4", &seating, &config, &invoker, &events, 13).unwrap();

    // The match finished despite the stalling strategy.
    assert_eq!(result.hands_played, 2);
    assert!(result.violations["sleepy"].timeouts >= 2);
    // The substituted actions are marked in the history.
    assert!(result
        .hands
        .iter()
        .flat_map(|h| h.actions.iter())
        .any(|a| a.forced));
    assert_eq!(result.deltas.iter().sum::<i64>(), 0);
}

#[test]
fn illegal_raises_are_replaced_and_tallied() {
    let config = ArenaConfig {
        hands_per_match: 2,
        equity_samples: 20,
        seed: Some(6),
        ..Default::default()
    };
    let invoker = BotInvoker::new(config.decision_timeout());
    let events = EventBus::new();
    let seating = vec![reg("cheater", Arc::new(MinUnderRaiser)), named("station-b")];
    let result = run_match("m5", &seating, &config, &invoker, &events, 17).unwrap();
    assert_eq!(result.hands_played, 2);
    assert!(result.violations["cheater"].illegal_actions >= 1);
    assert_eq!(result.deltas.iter().sum::<i64>(), 0);
}

#[tokio::test]
async fn street_equity_events_are_published() {
    let config = ArenaConfig {
        hands_per_match: 2,
        equity_samples: 30,
        seed: Some(8),
        ..Default::default()
    };
    let invoker = BotInvoker::new(config.decision_timeout());
    let events = EventBus::new();
    let mut sub = events.subscribe();
    let seating = vec![named("station-a"), named("station-b")];
    let result = run_match("m6", &seating, &config, &invoker, &events, 19).unwrap();

    let mut started = 0;
    let mut equity_snapshots = 0;
    let mut completed = 0;
    while let Ok(event) = sub.receiver().try_recv() {
        match event {
            MatchEvent::HandStarted { .. } => started += 1,
            MatchEvent::StreetEquity { equities, .. } => {
                equity_snapshots += 1;
                for se in &equities {
                    let sum = se.equity.win + se.equity.tie + se.equity.lose;
                    assert!((sum - 1.0).abs() < 1e-9);
                }
            }
            MatchEvent::HandCompleted { .. } => completed += 1,
            MatchEvent::MatchCompleted { .. } => {}
        }
    }
    assert_eq!(started, 2);
    assert_eq!(completed, result.hands_played as i32);
    // At least the preflop snapshot of every hand.
    assert!(equity_snapshots >= 2);
}
