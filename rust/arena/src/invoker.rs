use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use felt_bots::Bot;
use felt_engine::action::BotAction;
use felt_engine::view::TableView;

/// What came back from one bounded bot call.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InvokeResult {
    Action(BotAction),
    /// The deadline passed; the call was abandoned and any late result is
    /// discarded.
    TimedOut,
    /// The strategy panicked (or its thread died before answering).
    Panicked,
}

/// The kinds of contract violations recorded against a bot.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Violation {
    Timeout,
    Panic,
    IllegalAction,
}

/// Per-bot violation tallies for one match.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BotViolations {
    pub timeouts: u32,
    pub panics: u32,
    pub illegal_actions: u32,
}

impl BotViolations {
    pub fn total(&self) -> u32 {
        self.timeouts + self.panics + self.illegal_actions
    }
}

/// Shared tally of contract violations keyed by bot id. The scheduler reads
/// a snapshot into each match result; a persistent offender surfaces there
/// for an external suspension policy to act on.
#[derive(Debug, Default)]
pub struct ViolationLog {
    counts: Mutex<HashMap<String, BotViolations>>,
}

impl ViolationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, bot_id: &str, violation: Violation) {
        let mut guard = match self.counts.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let entry = guard.entry(bot_id.to_string()).or_default();
        match violation {
            Violation::Timeout => entry.timeouts += 1,
            Violation::Panic => entry.panics += 1,
            Violation::IllegalAction => entry.illegal_actions += 1,
        }
    }

    pub fn snapshot(&self) -> HashMap<String, BotViolations> {
        match self.counts.lock() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// The safety boundary around untrusted strategy code.
///
/// Each decision runs on its own watchdog thread under a fixed wall-clock
/// deadline. A panic is absorbed; a timeout abandons the thread (whatever it
/// eventually returns is dropped on a closed channel). The invoker never
/// executes bot code on the match thread, so a misbehaving bot cannot stall
/// the scheduler.
#[derive(Debug, Clone)]
pub struct BotInvoker {
    timeout: Duration,
}

impl BotInvoker {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn invoke(&self, bot: &Arc<dyn Bot>, view: TableView) -> InvokeResult {
        let (tx, rx) = mpsc::channel();
        let bot = Arc::clone(bot);
        thread::spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| bot.act(&view)));
            // The receiver may be gone already (deadline passed): that is
            // exactly the abandon-and-discard contract.
            let _ = tx.send(outcome);
        });
        match rx.recv_timeout(self.timeout) {
            Ok(Ok(action)) => InvokeResult::Action(action),
            Ok(Err(_)) => InvokeResult::Panicked,
            Err(RecvTimeoutError::Timeout) => InvokeResult::TimedOut,
            Err(RecvTimeoutError::Disconnected) => InvokeResult::Panicked,
        }
    }
}
