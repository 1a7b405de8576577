use felt_engine::cards::{Card, Rank as R, Suit as S};
use felt_engine::equity::{Equity, EquityCalculator};
use felt_engine::hand::EvalCache;

fn c(s: S, r: R) -> Card {
    Card { suit: s, rank: r }
}

fn assert_sums_to_one(e: Equity) {
    assert!((e.win + e.tie + e.lose - 1.0).abs() < 1e-9);
}

#[test]
fn probabilities_sum_to_one_on_every_street() {
    let mut calc = EquityCalculator::with_samples(42, 500);
    let mut evals = EvalCache::new();
    let hero = [c(S::Clubs, R::Ace), c(S::Diamonds, R::King)];
    let flop = [
        c(S::Hearts, R::Ten),
        c(S::Spades, R::Six),
        c(S::Clubs, R::Two),
    ];
    let turn = [flop[0], flop[1], flop[2], c(S::Diamonds, R::Queen)];
    let river = [flop[0], flop[1], flop[2], turn[3], c(S::Hearts, R::Three)];

    assert_sums_to_one(calc.estimate(hero, &[], 1, &mut evals).unwrap());
    assert_sums_to_one(calc.estimate(hero, &flop, 1, &mut evals).unwrap());
    assert_sums_to_one(calc.estimate(hero, &turn, 1, &mut evals).unwrap());
    assert_sums_to_one(calc.estimate(hero, &river, 1, &mut evals).unwrap());
}

#[test]
fn made_royal_flush_is_exactly_unbeatable_on_the_turn() {
    // One unknown board card: this path is exact enumeration, so the
    // probabilities are sharp, not sampled.
    let mut calc = EquityCalculator::new(1);
    let mut evals = EvalCache::new();
    let hero = [c(S::Spades, R::Ace), c(S::Spades, R::King)];
    let turn = [
        c(S::Spades, R::Queen),
        c(S::Spades, R::Jack),
        c(S::Spades, R::Ten),
        c(S::Hearts, R::Two),
    ];
    let e = calc.estimate(hero, &turn, 1, &mut evals).unwrap();
    assert_eq!(e.win, 1.0);
    assert_eq!(e.tie, 0.0);
    assert_eq!(e.lose, 0.0);
}

#[test]
fn river_enumeration_counts_chops_as_ties() {
    // The board plays for both seats: every opponent combo chops.
    let mut calc = EquityCalculator::new(1);
    let mut evals = EvalCache::new();
    let hero = [c(S::Clubs, R::Two), c(S::Diamonds, R::Three)];
    let board = [
        c(S::Hearts, R::Ten),
        c(S::Hearts, R::Jack),
        c(S::Hearts, R::Queen),
        c(S::Hearts, R::King),
        c(S::Hearts, R::Ace),
    ];
    let e = calc.estimate(hero, &board, 1, &mut evals).unwrap();
    assert_eq!(e.tie, 1.0);
    assert_eq!(e.win, 0.0);
    assert_eq!(e.lose, 0.0);
}

#[test]
fn monte_carlo_is_reproducible_for_a_seed() {
    let hero = [c(S::Hearts, R::Jack), c(S::Diamonds, R::Jack)];
    let mut evals = EvalCache::new();
    let mut first = EquityCalculator::with_samples(7, 300);
    let mut second = EquityCalculator::with_samples(7, 300);
    assert_eq!(
        first.estimate(hero, &[], 3, &mut evals).unwrap(),
        second.estimate(hero, &[], 3, &mut evals).unwrap()
    );
}

#[test]
fn more_opponents_mean_less_equity() {
    let hero = [c(S::Clubs, R::Ace), c(S::Spades, R::Ace)];
    let mut evals = EvalCache::new();
    let mut calc = EquityCalculator::with_samples(11, 2_000);
    let one = calc.estimate(hero, &[], 1, &mut evals).unwrap();
    let five = calc.estimate(hero, &[], 5, &mut evals).unwrap();
    assert!(one.win > five.win);
    assert!(one.win > 0.7);
}

#[test]
fn identical_states_are_answered_from_the_cache() {
    let hero = [c(S::Clubs, R::Nine), c(S::Diamonds, R::Nine)];
    let board = [
        c(S::Hearts, R::Ace),
        c(S::Spades, R::King),
        c(S::Clubs, R::Four),
        c(S::Diamonds, R::Two),
        c(S::Hearts, R::Eight),
    ];
    let mut evals = EvalCache::new();
    let mut calc = EquityCalculator::new(5);
    let a = calc.estimate(hero, &board, 1, &mut evals).unwrap();
    let states = calc.cached_states();
    let b = calc.estimate(hero, &board, 1, &mut evals).unwrap();
    assert_eq!(a, b);
    assert_eq!(calc.cached_states(), states);
}
