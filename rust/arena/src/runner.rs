use felt_engine::betting::{HandConfig, HandEngine};
use felt_engine::equity::EquityCalculator;
use felt_engine::errors::ApplyError;
use felt_engine::hand::EvalCache;

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::events::{EventBus, MatchEvent, SeatEquity};
use crate::invoker::{BotInvoker, InvokeResult, Violation, ViolationLog};
use crate::registry::BotRegistration;
use crate::sink::MatchResult;

/// Runs one match: a fixed number of hands, fresh stacks and a rotating
/// button each hand, every decision routed through the invoker.
///
/// A hand that hits an engine fault is logged, counted in `hands_faulted`
/// and excluded from the aggregate deltas; the match carries on with the
/// next hand. The whole match is deterministic given `match_seed` and
/// deterministic strategies.
pub fn run_match(
    match_id: &str,
    seating: &[BotRegistration],
    config: &ArenaConfig,
    invoker: &BotInvoker,
    events: &EventBus,
    match_seed: u64,
) -> Result<MatchResult, ArenaError> {
    let n = seating.len();
    if n < 2 {
        return Err(ArenaError::NotEnoughBots { have: n });
    }
    let seat_ids: Vec<String> = seating.iter().map(|b| b.id.clone()).collect();
    let violations = ViolationLog::new();
    let mut equity = EquityCalculator::with_samples(match_seed, config.equity_samples);
    let mut evals = EvalCache::new();
    let hand_cfg = HandConfig {
        small_blind: config.small_blind,
        big_blind: config.big_blind,
    };

    let mut deltas = vec![0i64; n];
    let mut hands = Vec::new();
    let mut hands_played = 0u32;
    let mut hands_faulted = 0u32;

    for hand_ix in 0..config.hands_per_match {
        let hand_id = format!("{}-{:06}", match_id, hand_ix + 1);
        let button = hand_ix as usize % n;
        let hand_seed = derive_hand_seed(match_seed, hand_ix);
        let stacks = vec![config.starting_stack; n];

        let mut engine = match HandEngine::new(&stacks, button, hand_cfg, hand_seed) {
            Ok(e) => e,
            Err(fault) => {
                tracing::error!(
                    hand_id = %hand_id,
                    error = %fault,
                    "hand aborted before the deal completed"
                );
                hands_faulted += 1;
                continue;
            }
        };

        events.publish(MatchEvent::HandStarted {
            match_id: match_id.to_string(),
            hand_id: hand_id.clone(),
            button,
            seats: seat_ids.clone(),
        });

        if let Err(e) = play_hand(
            &mut engine,
            &hand_id,
            match_id,
            seating,
            invoker,
            &violations,
            events,
            &mut equity,
            &mut evals,
        ) {
            tracing::error!(
                hand_id = %hand_id,
                error = %e,
                "hand aborted and excluded from results"
            );
            hands_faulted += 1;
            continue;
        }

        let Some(outcome) = engine.outcome() else {
            tracing::error!(hand_id = %hand_id, "hand ended without an outcome");
            hands_faulted += 1;
            continue;
        };
        for (seat, delta) in outcome.deltas.iter().enumerate() {
            deltas[seat] += delta;
        }
        hands_played += 1;
        events.publish(MatchEvent::HandCompleted {
            match_id: match_id.to_string(),
            hand_id: hand_id.clone(),
            deltas: outcome.deltas.clone(),
        });
        hands.push(engine.record(&hand_id));
    }

    Ok(MatchResult {
        match_id: match_id.to_string(),
        seats: seat_ids,
        deltas,
        hands_played,
        hands_faulted,
        hands,
        violations: violations.snapshot(),
    })
}

/// Drives one hand's decision loop. Bot misbehavior (timeout, panic,
/// illegal action) costs that bot the safe default action; only an engine
/// fault aborts the hand.
#[allow(clippy::too_many_arguments)]
fn play_hand(
    engine: &mut HandEngine,
    hand_id: &str,
    match_id: &str,
    seating: &[BotRegistration],
    invoker: &BotInvoker,
    violations: &ViolationLog,
    events: &EventBus,
    equity: &mut EquityCalculator,
    evals: &mut EvalCache,
) -> Result<(), ApplyError> {
    publish_equity(engine, hand_id, match_id, seating, events, equity, evals);
    let mut last_street = engine.phase().street();

    while let Some(seat) = engine.next_actor() {
        let Some(view) = engine.view_for(seat) else {
            break;
        };
        let bot = &seating[seat];

        let decision = match invoker.invoke(&bot.bot, view) {
            InvokeResult::Action(action) => Some(action),
            InvokeResult::TimedOut => {
                violations.record(&bot.id, Violation::Timeout);
                tracing::warn!(
                    bot = %bot.id,
                    seat,
                    hand_id = %hand_id,
                    "decision deadline exceeded, applying safe default"
                );
                None
            }
            InvokeResult::Panicked => {
                violations.record(&bot.id, Violation::Panic);
                tracing::warn!(
                    bot = %bot.id,
                    seat,
                    hand_id = %hand_id,
                    "strategy panicked, applying safe default"
                );
                None
            }
        };

        match decision {
            Some(action) => match engine.apply(seat, action) {
                Ok(_) => {}
                Err(ApplyError::Illegal(e)) => {
                    violations.record(&bot.id, Violation::IllegalAction);
                    tracing::warn!(
                        bot = %bot.id,
                        seat,
                        hand_id = %hand_id,
                        error = %e,
                        "illegal action, applying safe default"
                    );
                    engine.apply_fallback(seat)?;
                }
                Err(fault) => return Err(fault),
            },
            None => {
                engine.apply_fallback(seat)?;
            }
        }

        let street = engine.phase().street();
        if street != last_street {
            publish_equity(engine, hand_id, match_id, seating, events, equity, evals);
            last_street = street;
        }
    }
    Ok(())
}

/// Publishes a per-seat win/tie/lose snapshot for the current street.
/// Estimation errors are logged and skipped; live reporting must never
/// interfere with the match itself.
fn publish_equity(
    engine: &HandEngine,
    hand_id: &str,
    match_id: &str,
    seating: &[BotRegistration],
    events: &EventBus,
    equity: &mut EquityCalculator,
    evals: &mut EvalCache,
) {
    let Some(street) = engine.phase().street() else {
        return;
    };
    let live: Vec<usize> = (0..engine.seat_count())
        .filter(|&i| !engine.seat(i).folded())
        .collect();
    if live.len() < 2 {
        return;
    }
    let mut equities = Vec::with_capacity(live.len());
    for &seat in &live {
        match equity.estimate(
            engine.seat(seat).hole(),
            engine.board(),
            live.len() - 1,
            evals,
        ) {
            Ok(e) => equities.push(SeatEquity {
                seat,
                bot: seating[seat].id.clone(),
                equity: e,
            }),
            Err(e) => {
                tracing::debug!(seat, error = %e, "equity estimate skipped");
            }
        }
    }
    events.publish(MatchEvent::StreetEquity {
        match_id: match_id.to_string(),
        hand_id: hand_id.to_string(),
        street,
        board: engine.board().to_vec(),
        equities,
    });
}

fn derive_hand_seed(match_seed: u64, hand_ix: u32) -> u64 {
    match_seed.wrapping_add((u64::from(hand_ix) + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
