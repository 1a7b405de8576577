//! # felt-arena: Unattended Bot-vs-Bot Match Service
//!
//! The service layer around [`felt_engine`]: a registry of opaque bot
//! strategies, a deadline-bound invoker that isolates untrusted decision
//! code, a match runner that plays configured-length matches hand by hand,
//! and a background scheduler that keeps matches flowing and survives
//! anything a single bot, hand or match can throw at it.
//!
//! ## Core Modules
//!
//! - [`config`] - Environment/file layered [`config::ArenaConfig`]
//! - [`registry`] - Bot registrations and round-robin seating rotation
//! - [`invoker`] - Watchdog-thread bot calls, violation accounting
//! - [`runner`] - One match: hands, button rotation, equity snapshots
//! - [`scheduler`] - The indefinite background loop and its shutdown signal
//! - [`events`] - Fan-out bus carrying hand/equity events to streamers
//! - [`sink`] - Match result destinations (memory, JSONL)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use felt_arena::config::ArenaConfig;
//! use felt_arena::registry::BotRegistry;
//! use felt_arena::scheduler::Scheduler;
//! use felt_arena::sink::MemorySink;
//! use felt_bots::create_bot;
//!
//! # async fn run() {
//! let mut registry = BotRegistry::new();
//! registry.register("baseline", Arc::from(create_bot("baseline").unwrap())).unwrap();
//! registry.register("station", Arc::from(create_bot("station").unwrap())).unwrap();
//!
//! let scheduler = Scheduler::new(ArenaConfig::default(), registry, Arc::new(MemorySink::new()));
//! let (stop, stop_rx) = tokio::sync::watch::channel(false);
//! tokio::spawn(scheduler.run(stop_rx));
//! // ... later:
//! let _ = stop.send(true);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod invoker;
pub mod registry;
pub mod runner;
pub mod scheduler;
pub mod sink;

pub use config::ArenaConfig;
pub use error::ArenaError;
pub use events::{EventBus, MatchEvent};
pub use invoker::{BotInvoker, ViolationLog};
pub use registry::{BotRegistration, BotRegistry};
pub use runner::run_match;
pub use scheduler::Scheduler;
pub use sink::{JsonlSink, MatchResult, MatchSink, MemorySink};
