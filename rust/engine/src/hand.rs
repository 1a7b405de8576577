use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{Card, Suit};

/// Hand categories in ascending order of strength.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

/// A totally ordered hand value: category first, then kicker tuple.
///
/// Kickers are ordered high to low; unused positions are zero. Comparing two
/// strengths with `<`/`>` implements standard poker precedence, including the
/// wheel (A-2-3-4-5) as the lowest straight (high card 5).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct HandStrength {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub kickers: [u8; 5],
}

pub fn compare_hands(a: &HandStrength, b: &HandStrength) -> Ordering {
    a.cmp(b)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("hand evaluation requires 5 to 7 cards, got {count}")]
    WrongCardCount { count: usize },
    #[error("duplicate card in evaluation input: {card}")]
    DuplicateCard { card: Card },
}

/// Rank exactly five cards.
fn rank_five(cards: &[Card; 5]) -> HandStrength {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    for c in cards.iter() {
        rank_counts[c.rank as usize] += 1;
    }
    let flush_suit: Option<Suit> = if cards.iter().all(|c| c.suit == cards[0].suit) {
        Some(cards[0].suit)
    } else {
        None
    };
    let straight_high = straight_high_of_five(&rank_counts);

    if let (Some(_), Some(high)) = (flush_suit, straight_high) {
        let category = if high == 14 {
            Category::RoyalFlush
        } else {
            Category::StraightFlush
        };
        return HandStrength {
            category,
            kickers: [high, 0, 0, 0, 0],
        };
    }

    // Group ranks by multiplicity, highest rank first within a multiplicity.
    let mut quads = Vec::new();
    let mut trips = Vec::new();
    let mut pairs = Vec::new();
    let mut singles = Vec::new();
    for r in (2..=14u8).rev() {
        match rank_counts[r as usize] {
            4 => quads.push(r),
            3 => trips.push(r),
            2 => pairs.push(r),
            1 => singles.push(r),
            _ => {}
        }
    }

    if let Some(&q) = quads.first() {
        let kicker = *singles.first().unwrap_or(&0);
        return HandStrength {
            category: Category::FourOfAKind,
            kickers: [q, kicker, 0, 0, 0],
        };
    }
    if let (Some(&t), Some(&p)) = (trips.first(), pairs.first()) {
        return HandStrength {
            category: Category::FullHouse,
            kickers: [t, p, 0, 0, 0],
        };
    }
    if flush_suit.is_some() {
        let mut k = [0u8; 5];
        k.copy_from_slice(&singles[..5]);
        return HandStrength {
            category: Category::Flush,
            kickers: k,
        };
    }
    if let Some(high) = straight_high {
        return HandStrength {
            category: Category::Straight,
            kickers: [high, 0, 0, 0, 0],
        };
    }
    if let Some(&t) = trips.first() {
        return HandStrength {
            category: Category::ThreeOfAKind,
            kickers: [t, singles[0], singles[1], 0, 0],
        };
    }
    if pairs.len() >= 2 {
        return HandStrength {
            category: Category::TwoPair,
            kickers: [pairs[0], pairs[1], singles[0], 0, 0],
        };
    }
    if let Some(&p) = pairs.first() {
        return HandStrength {
            category: Category::OnePair,
            kickers: [p, singles[0], singles[1], singles[2], 0],
        };
    }
    let mut k = [0u8; 5];
    k.copy_from_slice(&singles[..5]);
    HandStrength {
        category: Category::HighCard,
        kickers: k,
    }
}

/// Ranks the five cards left after skipping one or two indices.
fn rank_without(cards: &[Card], skip_a: usize, skip_b: usize) -> HandStrength {
    let mut five = [cards[0]; 5];
    let mut w = 0;
    for (i, c) in cards.iter().enumerate() {
        if i != skip_a && i != skip_b {
            five[w] = *c;
            w += 1;
        }
    }
    rank_five(&five)
}

/// Straight high card for a 5-card hand, if the five ranks are distinct and
/// consecutive. The wheel (A-2-3-4-5) reports 5 as its high card.
fn straight_high_of_five(rank_counts: &[u8; 15]) -> Option<u8> {
    if rank_counts.iter().any(|&c| c > 1) {
        return None;
    }
    for high in (6..=14u8).rev() {
        if (high - 4..=high).all(|r| rank_counts[r as usize] == 1) {
            return Some(high);
        }
    }
    // Ace-low: A,2,3,4,5
    if rank_counts[14] == 1 && (2..=5u8).all(|r| rank_counts[r as usize] == 1) {
        return Some(5);
    }
    None
}

/// Best achievable [`HandStrength`] from 5, 6, or 7 cards, found by ranking
/// every 5-card subset (C(7,5) = 21 worst case) and keeping the maximum.
pub fn best_five(cards: &[Card]) -> Result<HandStrength, EvalError> {
    for (i, a) in cards.iter().enumerate() {
        if cards[i + 1..].contains(a) {
            return Err(EvalError::DuplicateCard { card: *a });
        }
    }
    match cards.len() {
        5 => {
            let five: [Card; 5] = [cards[0], cards[1], cards[2], cards[3], cards[4]];
            Ok(rank_five(&five))
        }
        6 => {
            let mut best = rank_without(cards, 0, usize::MAX);
            for skip in 1..6 {
                best = best.max(rank_without(cards, skip, usize::MAX));
            }
            Ok(best)
        }
        7 => {
            let mut best = rank_without(cards, 0, 1);
            for i in 0..7 {
                for j in (i + 1)..7 {
                    best = best.max(rank_without(cards, i, j));
                }
            }
            Ok(best)
        }
        count => Err(EvalError::WrongCardCount { count }),
    }
}

/// Memoization table for [`best_five`], keyed by the sorted card multiset.
///
/// Identical 7-card sets recur across seats and across equity samples, so the
/// table pays for itself quickly. It is unbounded but limited in practice by
/// the finite space of card combinations; owners create one per match and
/// pass it explicitly rather than sharing hidden global state.
#[derive(Debug, Default)]
pub struct EvalCache {
    map: HashMap<Vec<u8>, HandStrength>,
}

impl EvalCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn best_five(&mut self, cards: &[Card]) -> Result<HandStrength, EvalError> {
        let mut key: Vec<u8> = cards.iter().map(|c| c.code()).collect();
        key.sort_unstable();
        if let Some(hit) = self.map.get(&key) {
            return Ok(*hit);
        }
        let strength = best_five(cards)?;
        self.map.insert(key, strength);
        Ok(strength)
    }
}
