use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::config::ArenaConfig;
use crate::events::{EventBus, MatchEvent};
use crate::invoker::BotInvoker;
use crate::registry::BotRegistry;
use crate::runner::run_match;
use crate::sink::MatchSink;

/// The long-lived background loop: seat the next rotation, run a match,
/// record the result, pause, repeat.
///
/// The scheduler is the sole writer into the sink. Each match simulates
/// synchronously inside `spawn_blocking`; a match that errors or panics is
/// logged and excluded, and the loop moves on to the next seating. Nothing a
/// bot or a single hand does can terminate the loop; only the shutdown
/// signal (or the disabled flag) stops it.
pub struct Scheduler {
    config: ArenaConfig,
    registry: BotRegistry,
    invoker: BotInvoker,
    events: EventBus,
    sink: Arc<dyn MatchSink>,
}

impl Scheduler {
    pub fn new(config: ArenaConfig, registry: BotRegistry, sink: Arc<dyn MatchSink>) -> Self {
        let invoker = BotInvoker::new(config.decision_timeout());
        Self {
            config,
            registry,
            invoker,
            events: EventBus::new(),
            sink,
        }
    }

    /// Handle for external consumers (live streaming) to subscribe with.
    pub fn events(&self) -> EventBus {
        self.events.clone()
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        if self.config.worker_disabled {
            tracing::info!("background worker disabled by configuration");
            return;
        }

        let mut round: u64 = 0;
        while !*shutdown.borrow() {
            round += 1;

            let seating = match self.registry.next_seating(self.config.seats_per_match) {
                Ok(seating) => seating,
                Err(e) => {
                    tracing::warn!(error = %e, "cannot assemble a seating; waiting for bots");
                    if pause(&mut shutdown, self.config.match_delay()).await {
                        break;
                    }
                    continue;
                }
            };

            let match_id = uuid::Uuid::new_v4().to_string();
            let match_seed = self.match_seed(round);
            tracing::info!(
                match_id = %match_id,
                round,
                seats = seating.len(),
                seed = match_seed,
                "starting match"
            );

            let cfg = self.config.clone();
            let invoker = self.invoker.clone();
            let events = self.events.clone();
            let id = match_id.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                run_match(&id, &seating, &cfg, &invoker, &events, match_seed)
            })
            .await;

            match outcome {
                Ok(Ok(result)) => {
                    self.events.publish(MatchEvent::MatchCompleted {
                        match_id: result.match_id.clone(),
                        deltas: result.deltas.clone(),
                        hands_played: result.hands_played,
                    });
                    if let Err(e) = self.sink.record_match(&result) {
                        tracing::error!(
                            match_id = %result.match_id,
                            error = %e,
                            "failed to persist match result"
                        );
                    } else {
                        tracing::info!(
                            match_id = %result.match_id,
                            hands = result.hands_played,
                            faulted = result.hands_faulted,
                            "match recorded"
                        );
                    }
                }
                Ok(Err(e)) => {
                    tracing::error!(
                        match_id = %match_id,
                        error = %e,
                        "match aborted and excluded from results"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        match_id = %match_id,
                        error = %e,
                        "match task panicked; excluded from results"
                    );
                }
            }

            if pause(&mut shutdown, self.config.match_delay()).await {
                break;
            }
        }
        tracing::info!("match scheduler stopped");
    }

    /// Per-round seed: derived from the configured base for reproducible
    /// schedules, time-derived otherwise.
    fn match_seed(&self, round: u64) -> u64 {
        match self.config.seed {
            Some(base) => base.wrapping_add(round.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            None => {
                let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
                (nanos as u64) ^ round
            }
        }
    }
}

/// Sleeps the inter-match delay, waking early on shutdown.
/// Returns true when the loop should stop.
async fn pause(shutdown: &mut watch::Receiver<bool>, delay: Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(delay) => *shutdown.borrow(),
        changed = shutdown.changed() => match changed {
            Ok(()) => *shutdown.borrow(),
            // Sender gone: nobody can ever signal us again, stop cleanly.
            Err(_) => true,
        },
    }
}
