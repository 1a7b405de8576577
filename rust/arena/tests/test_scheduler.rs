use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use felt_arena::config::ArenaConfig;
use felt_arena::registry::BotRegistry;
use felt_arena::scheduler::Scheduler;
use felt_arena::sink::MemorySink;
use felt_bots::{create_bot, Bot};
use felt_engine::action::BotAction;
use felt_engine::view::TableView;

fn quick_config() -> ArenaConfig {
    ArenaConfig {
        hands_per_match: 2,
        match_delay_secs: 0.01,
        equity_samples: 20,
        seed: Some(3),
        ..Default::default()
    }
}

fn roster(ids: &[&str]) -> BotRegistry {
    let mut registry = BotRegistry::new();
    for id in ids {
        let kind = id.split('-').next().unwrap_or(id);
        registry
            .register(*id, Arc::from(create_bot(kind).unwrap()))
            .unwrap();
    }
    registry
}

async fn wait_for_results(sink: &MemorySink, count: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(60);
    while sink.results().len() < count {
        assert!(
            tokio::time::Instant::now() < deadline,
            "scheduler produced no results in time"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn scheduler_records_matches_and_stops_on_signal() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .try_init();
    let sink = Arc::new(MemorySink::new());
    let scheduler = Scheduler::new(quick_config(), roster(&["station-a", "baseline-b"]), sink.clone());
    let (stop, stop_rx) = watch::channel(false);
    let handle = tokio::spawn(scheduler.run(stop_rx));

    wait_for_results(&sink, 1).await;
    stop.send(true).unwrap();
    handle.await.unwrap();

    let results = sink.results();
    assert!(!results.is_empty());
    let first = &results[0];
    assert_eq!(first.seats.len(), 2);
    assert_eq!(first.hands_played + first.hands_faulted, 2);
    assert_eq!(first.deltas.iter().sum::<i64>(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn disabled_worker_never_runs_a_match() {
    let config = ArenaConfig {
        worker_disabled: true,
        ..quick_config()
    };
    let sink = Arc::new(MemorySink::new());
    let scheduler = Scheduler::new(config, roster(&["station-a", "station-b"]), sink.clone());
    let (_stop, stop_rx) = watch::channel(false);
    // Returns immediately instead of looping.
    scheduler.run(stop_rx).await;
    assert!(sink.results().is_empty());
}

struct Bomber;
impl Bot for Bomber {
    fn act(&self, _view: &TableView) -> BotAction {
        panic!("strategy exploded");
    }
    fn name(&self) -> &str {
        "bomber"
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn panicking_strategy_does_not_stop_the_loop() {
    let sink = Arc::new(MemorySink::new());
    let mut registry = roster(&["station-a"]);
    registry.register("bomber", Arc::new(Bomber)).unwrap();

    let scheduler = Scheduler::new(quick_config(), registry, sink.clone());
    let (stop, stop_rx) = watch::channel(false);
    let handle = tokio::spawn(scheduler.run(stop_rx));

    // Two full matches despite a bot that panics on every decision.
    wait_for_results(&sink, 2).await;
    stop.send(true).unwrap();
    handle.await.unwrap();

    let results = sink.results();
    assert!(results.len() >= 2);
    let bombed: u32 = results
        .iter()
        .filter_map(|r| r.violations.get("bomber"))
        .map(|v| v.panics)
        .sum();
    assert!(bombed >= 1);
    for result in &results {
        assert_eq!(result.hands_played + result.hands_faulted, 2);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_interrupts_the_inter_match_pause() {
    let config = ArenaConfig {
        // Long delay: the test only passes if shutdown cuts it short.
        match_delay_secs: 300.0,
        ..quick_config()
    };
    let sink = Arc::new(MemorySink::new());
    let scheduler = Scheduler::new(config, roster(&["station-a", "station-b"]), sink.clone());
    let (stop, stop_rx) = watch::channel(false);
    let handle = tokio::spawn(scheduler.run(stop_rx));

    wait_for_results(&sink, 1).await;
    stop.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("scheduler ignored the shutdown signal")
        .unwrap();
}
