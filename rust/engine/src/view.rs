use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::record::{ActionRecord, Street};

/// Publicly visible state of one seat: stacks and commitments are open
/// information at a table, hole cards are not.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatPublic {
    pub seat: usize,
    pub stack: u32,
    pub committed: u32,
    pub folded: bool,
    pub all_in: bool,
}

/// The player-visible snapshot handed to a bot for one decision: the seat's
/// own hole cards plus everything public (board, pots, stacks, history).
/// Opponent hole cards never appear here.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub seat: usize,
    pub hole: [Card; 2],
    pub street: Street,
    pub board: Vec<Card>,
    pub button: usize,
    pub pot_total: u32,
    pub street_bet: u32,
    pub to_call: u32,
    pub min_raise_to: u32,
    pub stack: u32,
    pub committed: u32,
    pub big_blind: u32,
    pub seats: Vec<SeatPublic>,
    pub actions: Vec<ActionRecord>,
}

impl TableView {
    /// Opponents still contesting the hand.
    pub fn live_opponents(&self) -> usize {
        self.seats
            .iter()
            .filter(|s| s.seat != self.seat && !s.folded)
            .count()
    }
}
