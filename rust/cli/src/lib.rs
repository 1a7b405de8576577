//! Helpers behind the `felt` binary: roster parsing and result formatting.

use std::fmt::Write as _;
use std::sync::Arc;

use felt_arena::registry::BotRegistration;
use felt_arena::sink::MatchResult;
use felt_bots::create_bot;

/// Parses a comma-separated strategy list ("baseline,station,station") into
/// seatable registrations. Repeated strategies get numbered ids so every
/// seat keeps a unique identifier.
pub fn parse_roster(spec: &str) -> Result<Vec<BotRegistration>, String> {
    let mut seating = Vec::new();
    let mut used: Vec<String> = Vec::new();
    for kind in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let bot = create_bot(kind).ok_or_else(|| format!("unknown strategy: {}", kind))?;
        let mut id = kind.to_string();
        let mut n = 1;
        while used.contains(&id) {
            n += 1;
            id = format!("{}-{}", kind, n);
        }
        used.push(id.clone());
        seating.push(BotRegistration {
            id,
            bot: Arc::from(bot),
        });
    }
    if seating.len() < 2 {
        return Err("at least two strategies are required".to_string());
    }
    Ok(seating)
}

/// Human-readable match summary: standings, hand counts, violations.
pub fn summarize(result: &MatchResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "match {}", result.match_id);
    let _ = writeln!(
        out,
        "hands played: {} (faulted: {})",
        result.hands_played, result.hands_faulted
    );

    let mut standings: Vec<(usize, i64)> = result.deltas.iter().copied().enumerate().collect();
    standings.sort_by_key(|&(_, delta)| std::cmp::Reverse(delta));
    for (seat, delta) in standings {
        let _ = writeln!(out, "  {:>8}  {}", format!("{:+}", delta), result.seats[seat]);
    }

    let mut offenders: Vec<_> = result
        .violations
        .iter()
        .filter(|(_, v)| v.total() > 0)
        .collect();
    offenders.sort_by_key(|(id, _)| id.clone());
    for (id, v) in offenders {
        let _ = writeln!(
            out,
            "  violations for {}: {} timeouts, {} panics, {} illegal",
            id, v.timeouts, v.panics, v.illegal_actions
        );
    }
    out
}
