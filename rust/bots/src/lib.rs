//! # felt-bots: Strategies for the Match Arena
//!
//! Bots are opaque strategies behind a fixed input/output contract: they see
//! a [`TableView`] (their own hole cards plus public information) and return
//! a [`BotAction`]. The arena never executes bot code inline; every decision
//! goes through the invoker's deadline-bound call path, so a strategy that
//! stalls, panics, or returns garbage costs itself the action, not the match.
//!
//! ## Provided Strategies
//!
//! - [`baseline`] - Rule-based strategy with hand strength and pot odds
//! - [`station`] - Calling station, never folds and never raises
//! - [`maniac`] - Seeded aggressive strategy, raises most streets
//!
//! ## Quick Start
//!
//! ```rust
//! use felt_bots::create_bot;
//!
//! let bot = create_bot("baseline").expect("known strategy");
//! assert_eq!(bot.name(), "baseline");
//! ```

use felt_engine::action::BotAction;
use felt_engine::view::TableView;

pub mod baseline;
pub mod maniac;
pub mod station;

/// An opaque poker strategy.
///
/// Implementations must be `Send + Sync`: decisions run on a watchdog thread
/// owned by the invoker, and a bot may be seated in consecutive matches.
/// `act` receives only the seat-visible view; there is no way to observe
/// opponents' hole cards or the deck.
pub trait Bot: Send + Sync {
    /// Decide one action. The returned raise amount is the total committed
    /// for the current street. Illegal or malformed decisions are replaced
    /// by the arena with the safe default and held against the bot.
    fn act(&self, view: &TableView) -> BotAction;

    /// Stable identifier used for seating, results and violation accounting.
    fn name(&self) -> &str;
}

/// Builds a bot from a strategy name, `None` for unknown names.
///
/// Seeded strategies derive their RNG from the name hash so the roster is
/// reproducible run to run.
pub fn create_bot(kind: &str) -> Option<Box<dyn Bot>> {
    match kind {
        "baseline" => Some(Box::new(baseline::BaselineBot::new())),
        "station" => Some(Box::new(station::CallingStation::new())),
        "maniac" => Some(Box::new(maniac::Maniac::new(0xA11CE))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_knows_all_strategies() {
        for kind in ["baseline", "station", "maniac"] {
            let bot = create_bot(kind).unwrap();
            assert_eq!(bot.name(), kind);
        }
    }

    #[test]
    fn factory_rejects_unknown_strategy() {
        assert!(create_bot("gto-oracle").is_none());
    }
}
