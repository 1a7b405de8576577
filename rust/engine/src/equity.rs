use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{full_deck, Card};
use crate::hand::{EvalCache, EvalError};

/// Monte Carlo sample count used when exact enumeration is too wide.
pub const DEFAULT_SAMPLES: u32 = 2_000;

/// Win/tie/lose probabilities for one seat. Chopped pots count as ties, so
/// the three buckets always sum to 1 (within floating tolerance).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equity {
    pub win: f64,
    pub tie: f64,
    pub lose: f64,
}

impl Equity {
    fn from_counts(win: u64, tie: u64, lose: u64) -> Self {
        let total = (win + tie + lose) as f64;
        if total == 0.0 {
            return Self {
                win: 0.0,
                tie: 0.0,
                lose: 0.0,
            };
        }
        Self {
            win: win as f64 / total,
            tie: tie as f64 / total,
            lose: lose as f64 / total,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EquityError {
    #[error("board may hold at most 5 cards, got {count}")]
    TooManyBoardCards { count: usize },
    #[error("at least one live opponent is required")]
    NoOpponents,
    #[error("deck cannot cover {opponents} unknown opponents")]
    NotEnoughCards { opponents: usize },
    #[error("duplicate card across hole and board: {card}")]
    DuplicateCard { card: Card },
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Canonical memoization key: sorted hole cards, sorted board, opponent count.
/// The same partial information recurs across seats and across repeated
/// queries as a hand moves through streets, which is what makes the cache
/// worthwhile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EquityKey {
    hero: [u8; 2],
    board: Vec<u8>,
    opponents: usize,
}

impl EquityKey {
    fn new(hero: [Card; 2], board: &[Card], opponents: usize) -> Self {
        let mut h = [hero[0].code(), hero[1].code()];
        h.sort_unstable();
        let mut b: Vec<u8> = board.iter().map(|c| c.code()).collect();
        b.sort_unstable();
        Self {
            hero: h,
            board: b,
            opponents,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    win: u64,
    tie: u64,
    lose: u64,
}

/// Estimates win/tie/lose probability for a hero hand against a number of
/// live opponents with unknown holdings.
///
/// On the turn and river (at most one community card unknown) against a
/// single opponent the result is exact: every opponent hole combination and
/// every board completion is enumerated. Earlier streets and multiway spots
/// fall back to a fixed-size seeded Monte Carlo sample so compute cost stays
/// constant regardless of the combinatorics. Every sampled showdown goes
/// through the shared [`EvalCache`].
#[derive(Debug)]
pub struct EquityCalculator {
    samples: u32,
    rng: ChaCha20Rng,
    cache: HashMap<EquityKey, Equity>,
}

impl EquityCalculator {
    pub fn new(seed: u64) -> Self {
        Self::with_samples(seed, DEFAULT_SAMPLES)
    }

    pub fn with_samples(seed: u64, samples: u32) -> Self {
        Self {
            samples: samples.max(1),
            rng: ChaCha20Rng::seed_from_u64(seed),
            cache: HashMap::new(),
        }
    }

    /// Number of distinct (hero, board, opponents) states answered so far.
    pub fn cached_states(&self) -> usize {
        self.cache.len()
    }

    pub fn estimate(
        &mut self,
        hero: [Card; 2],
        board: &[Card],
        opponents: usize,
        evals: &mut EvalCache,
    ) -> Result<Equity, EquityError> {
        if board.len() > 5 {
            return Err(EquityError::TooManyBoardCards { count: board.len() });
        }
        if opponents == 0 {
            return Err(EquityError::NoOpponents);
        }
        let missing = 5 - board.len();
        if 2 + board.len() + missing + 2 * opponents > 52 {
            return Err(EquityError::NotEnoughCards { opponents });
        }
        let mut used = vec![hero[0], hero[1]];
        for c in board {
            if used.contains(c) {
                return Err(EquityError::DuplicateCard { card: *c });
            }
            used.push(*c);
        }
        if hero[0] == hero[1] {
            return Err(EquityError::DuplicateCard { card: hero[0] });
        }

        let key = EquityKey::new(hero, board, opponents);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(*hit);
        }

        let remaining: Vec<Card> = full_deck()
            .into_iter()
            .filter(|c| !used.contains(c))
            .collect();

        let counts = if missing <= 1 && opponents == 1 {
            exact_heads_up(hero, board, &remaining, missing, evals)?
        } else {
            self.sample(hero, board, &remaining, opponents, missing, evals)?
        };

        let equity = Equity::from_counts(counts.win, counts.tie, counts.lose);
        self.cache.insert(key, equity);
        Ok(equity)
    }

    fn sample(
        &mut self,
        hero: [Card; 2],
        board: &[Card],
        remaining: &[Card],
        opponents: usize,
        missing: usize,
        evals: &mut EvalCache,
    ) -> Result<Counts, EquityError> {
        let need = 2 * opponents + missing;
        let mut counts = Counts::default();
        let mut pool = remaining.to_vec();
        for _ in 0..self.samples {
            let (drawn, _) = pool.partial_shuffle(&mut self.rng, need);
            let mut board5: Vec<Card> = board.to_vec();
            board5.extend_from_slice(&drawn[2 * opponents..need]);
            let hero_strength = {
                let mut seven = vec![hero[0], hero[1]];
                seven.extend_from_slice(&board5);
                evals.best_five(&seven)?
            };
            let mut best_villain = None;
            for opp in 0..opponents {
                let mut seven = vec![drawn[2 * opp], drawn[2 * opp + 1]];
                seven.extend_from_slice(&board5);
                let s = evals.best_five(&seven)?;
                best_villain = Some(match best_villain {
                    Some(b) if b >= s => b,
                    _ => s,
                });
            }
            match best_villain {
                Some(v) if hero_strength > v => counts.win += 1,
                Some(v) if hero_strength == v => counts.tie += 1,
                Some(_) => counts.lose += 1,
                None => {}
            }
        }
        Ok(counts)
    }
}

/// Exact heads-up equity: enumerate every opponent hole combination and every
/// completion of the board (at most one unknown card).
fn exact_heads_up(
    hero: [Card; 2],
    board: &[Card],
    remaining: &[Card],
    missing: usize,
    evals: &mut EvalCache,
) -> Result<Counts, EquityError> {
    let mut counts = Counts::default();
    let n = remaining.len();
    for vi in 0..n {
        for vj in (vi + 1)..n {
            let villain = [remaining[vi], remaining[vj]];
            let rest: Vec<Card> = remaining
                .iter()
                .enumerate()
                .filter(|(k, _)| *k != vi && *k != vj)
                .map(|(_, c)| *c)
                .collect();
            for_each_completion(board, &rest, missing, |board5| {
                let mut hero7 = vec![hero[0], hero[1]];
                hero7.extend_from_slice(board5);
                let hs = evals.best_five(&hero7)?;
                let mut vill7 = vec![villain[0], villain[1]];
                vill7.extend_from_slice(board5);
                let vs = evals.best_five(&vill7)?;
                if hs > vs {
                    counts.win += 1;
                } else if hs < vs {
                    counts.lose += 1;
                } else {
                    counts.tie += 1;
                }
                Ok(())
            })?;
        }
    }
    Ok(counts)
}

fn for_each_completion(
    board: &[Card],
    rest: &[Card],
    missing: usize,
    mut f: impl FnMut(&[Card]) -> Result<(), EquityError>,
) -> Result<(), EquityError> {
    let mut board5: Vec<Card> = board.to_vec();
    match missing {
        0 => f(&board5),
        1 => {
            board5.push(rest[0]);
            for c in rest {
                board5[board.len()] = *c;
                f(&board5)?;
            }
            Ok(())
        }
        // callers only request exact enumeration for <= 1 unknown
        _ => Ok(()),
    }
}
