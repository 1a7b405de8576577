//! # felt-engine: Texas Hold'em Match Simulation Core
//!
//! A deterministic no-limit Texas Hold'em engine for unattended bot-vs-bot
//! play: a street-by-street betting state machine with side pots, a memoized
//! 5-of-7 hand evaluator, and a win/tie/lose equity estimator. All
//! randomness flows from per-hand recorded seeds so every hand can be
//! replayed exactly.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck construction
//! - [`deck`] - Deterministic deck shuffling with ChaCha20 RNG
//! - [`hand`] - Best-five hand evaluation with an explicit memo cache
//! - [`equity`] - Win/tie/lose estimation, exact or Monte Carlo per street
//! - [`pot`] - Side-pot layering and deterministic award splitting
//! - [`rules`] - Betting validation (street-total raise semantics)
//! - [`betting`] - The per-hand state machine, from deal to settlement
//! - [`action`] - The bot decision contract and resolved actions
//! - [`view`] - The player-visible snapshot handed to strategies
//! - [`record`] - Hand history records and the JSONL hand logger
//! - [`errors`] - Illegal-action and invariant-fault error types
//!
//! ## Quick Start
//!
//! ```rust
//! use felt_engine::betting::{HandConfig, HandEngine};
//! use felt_engine::action::BotAction;
//!
//! let mut engine = HandEngine::new(&[1000, 1000], 0, HandConfig::default(), 42)
//!     .expect("two funded seats");
//! while let Some(seat) = engine.next_actor() {
//!     // a real caller would consult the seat's strategy here
//!     let action = engine.fallback_action(seat);
//!     engine.apply(seat, action).expect("fallback is always legal");
//! }
//! assert!(engine.outcome().is_some());
//! ```
//!
//! ## Determinism
//!
//! The same stacks, button, configuration and seed always produce the same
//! deal, the same board and (given the same decisions) the same settlement:
//!
//! ```rust
//! use felt_engine::deck::Deck;
//!
//! let mut a = Deck::new_with_seed(7);
//! let mut b = Deck::new_with_seed(7);
//! a.shuffle();
//! b.shuffle();
//! assert_eq!(a.deal_card(), b.deal_card());
//! ```

pub mod action;
pub mod betting;
pub mod cards;
pub mod deck;
pub mod equity;
pub mod errors;
pub mod hand;
pub mod pot;
pub mod record;
pub mod rules;
pub mod view;
