//! Rule-based baseline strategy.
//!
//! The reference opponent for the arena: preflop hand tiers, postflop made
//! hand strength via the engine's evaluator, pot odds for calling decisions.
//! Fully deterministic so fixed-seed matches replay exactly.

use felt_engine::action::BotAction;
use felt_engine::cards::Card;
use felt_engine::hand::{best_five, Category};
use felt_engine::view::TableView;

use crate::Bot;

/// Deterministic rule-based strategy.
///
/// Strength is scored 0-10 from the hole cards preflop and from the best
/// made hand postflop; the score picks between value raises, pot-odds calls
/// and folds. It never slow-plays and never bluffs, which makes it a stable
/// baseline to measure other strategies against.
#[derive(Debug, Clone, Default)]
pub struct BaselineBot;

impl BaselineBot {
    pub fn new() -> Self {
        Self
    }

    /// Score the hole cards 0-10: premium pairs and big suited aces at the
    /// top, junk offsuit hands at the bottom.
    fn preflop_strength(hole: [Card; 2]) -> u8 {
        let r1 = hole[0].rank as u8;
        let r2 = hole[1].rank as u8;
        let (high, low) = if r1 > r2 { (r1, r2) } else { (r2, r1) };
        let suited = hole[0].suit == hole[1].suit;

        if r1 == r2 {
            return match high {
                14 | 13 => 10,
                12 | 11 => 9,
                10 => 8,
                9 => 7,
                8 => 6,
                7 => 5,
                _ => 4,
            };
        }

        let base = match (high, low) {
            (14, 13) => 9,
            (14, 12) => 7,
            (14, 11) => 6,
            (14, 10) => 5,
            (14, _) => 4,
            (13, 12) => 6,
            (13, 11) | (12, 11) => 5,
            (13, 10) | (12, 10) => 4,
            _ if high >= 11 && low >= 9 => 4,
            _ if high - low <= 2 && high >= 9 => 3,
            _ => 2,
        };
        if suited {
            (base + 1).min(10)
        } else {
            base
        }
    }

    /// Score the made hand 0-10 from hole cards plus the visible board.
    fn postflop_strength(hole: [Card; 2], board: &[Card]) -> u8 {
        let mut cards = vec![hole[0], hole[1]];
        cards.extend_from_slice(board);
        let Ok(strength) = best_five(&cards) else {
            return 0;
        };
        let base = match strength.category {
            Category::HighCard => 1,
            Category::OnePair => 3,
            Category::TwoPair => 5,
            Category::ThreeOfAKind => 6,
            Category::Straight => 7,
            Category::Flush => 8,
            Category::FullHouse => 9,
            Category::FourOfAKind | Category::StraightFlush | Category::RoyalFlush => 10,
        };
        let kicker_boost = u8::from(strength.kickers[0] >= 12);
        (base + kicker_boost).min(10)
    }

    fn pot_odds(pot: u32, to_call: u32) -> f32 {
        if to_call == 0 {
            return 1.0;
        }
        pot as f32 / (pot + to_call) as f32
    }

    /// A value raise to roughly half pot over the current bet, clamped into
    /// the legal window. Falls back to a call when the stack cannot cover a
    /// legal raise.
    fn value_raise(view: &TableView) -> BotAction {
        let all_in_to = view.committed + view.stack;
        let target = view.street_bet + (view.pot_total / 2).max(view.big_blind);
        let to = target.max(view.min_raise_to);
        if all_in_to <= view.min_raise_to {
            // Raising is out of reach: shove-by-call keeps it legal.
            return BotAction::Call;
        }
        BotAction::Raise {
            amount: to.min(all_in_to),
        }
    }
}

impl Bot for BaselineBot {
    fn act(&self, view: &TableView) -> BotAction {
        let strength = if view.board.len() < 3 {
            Self::preflop_strength(view.hole)
        } else {
            Self::postflop_strength(view.hole, &view.board)
        };

        if view.to_call == 0 {
            return match strength {
                7..=10 => Self::value_raise(view),
                _ => BotAction::Check,
            };
        }

        let odds = Self::pot_odds(view.pot_total, view.to_call);
        match strength {
            9..=10 => Self::value_raise(view),
            7..=8 => BotAction::Call,
            5..=6 => {
                if odds >= 0.3 || view.to_call <= view.pot_total / 4 {
                    BotAction::Call
                } else {
                    BotAction::Fold
                }
            }
            3..=4 => {
                if odds >= 0.4 || view.to_call <= view.pot_total / 6 {
                    BotAction::Call
                } else {
                    BotAction::Fold
                }
            }
            _ => BotAction::Fold,
        }
    }

    fn name(&self) -> &str {
        "baseline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use felt_engine::cards::{Rank as R, Suit as S};
    use felt_engine::record::Street;
    use felt_engine::view::SeatPublic;

    fn c(s: S, r: R) -> Card {
        Card { suit: s, rank: r }
    }

    fn view(hole: [Card; 2], board: Vec<Card>, to_call: u32) -> TableView {
        let street = match board.len() {
            0 => Street::Preflop,
            3 => Street::Flop,
            4 => Street::Turn,
            _ => Street::River,
        };
        let street_bet = 100 + to_call;
        TableView {
            seat: 0,
            hole,
            street,
            board,
            button: 1,
            pot_total: 300,
            street_bet,
            to_call,
            min_raise_to: street_bet + 100,
            stack: 5_000,
            committed: 100,
            big_blind: 100,
            seats: vec![
                SeatPublic {
                    seat: 0,
                    stack: 5_000,
                    committed: 100,
                    folded: false,
                    all_in: false,
                },
                SeatPublic {
                    seat: 1,
                    stack: 5_000,
                    committed: street_bet,
                    folded: false,
                    all_in: false,
                },
            ],
            actions: Vec::new(),
        }
    }

    #[test]
    fn premium_pairs_score_top_tier() {
        let aces = [c(S::Hearts, R::Ace), c(S::Spades, R::Ace)];
        assert_eq!(BaselineBot::preflop_strength(aces), 10);
        let kings = [c(S::Hearts, R::King), c(S::Spades, R::King)];
        assert_eq!(BaselineBot::preflop_strength(kings), 10);
    }

    #[test]
    fn suited_hands_outscore_offsuit() {
        let aks = [c(S::Hearts, R::Ace), c(S::Hearts, R::King)];
        let ako = [c(S::Hearts, R::Ace), c(S::Spades, R::King)];
        assert!(BaselineBot::preflop_strength(aks) > BaselineBot::preflop_strength(ako));
    }

    #[test]
    fn junk_folds_to_a_bet() {
        let junk = [c(S::Hearts, R::Seven), c(S::Spades, R::Two)];
        let bot = BaselineBot::new();
        let action = bot.act(&view(junk, Vec::new(), 1_000));
        assert_eq!(action, BotAction::Fold);
    }

    #[test]
    fn premium_raises_with_a_legal_street_total() {
        let aces = [c(S::Hearts, R::Ace), c(S::Spades, R::Ace)];
        let bot = BaselineBot::new();
        let v = view(aces, Vec::new(), 100);
        match bot.act(&v) {
            BotAction::Raise { amount } => {
                assert!(amount >= v.min_raise_to);
                assert!(amount <= v.committed + v.stack);
            }
            other => panic!("expected a raise, got {:?}", other),
        }
    }

    #[test]
    fn made_flush_bets_when_checked_to() {
        let hole = [c(S::Hearts, R::Ace), c(S::Hearts, R::Nine)];
        let board = vec![
            c(S::Hearts, R::King),
            c(S::Hearts, R::Seven),
            c(S::Hearts, R::Two),
        ];
        let bot = BaselineBot::new();
        match bot.act(&view(hole, board, 0)) {
            BotAction::Raise { .. } => {}
            other => panic!("expected a bet, got {:?}", other),
        }
    }

    #[test]
    fn decisions_are_deterministic() {
        let hole = [c(S::Clubs, R::Queen), c(S::Diamonds, R::Jack)];
        let bot = BaselineBot::new();
        let v = view(hole, Vec::new(), 200);
        assert_eq!(bot.act(&v), bot.act(&v));
    }
}
