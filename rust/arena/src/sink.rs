use std::collections::HashMap;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use felt_engine::record::HandRecord;

use crate::invoker::BotViolations;

/// Everything one match produced: aggregate chip deltas for the leaderboard
/// layer, the full hand-by-hand history for audit/replay, and the contract
/// violations tallied against each seated bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_id: String,
    /// Bot id per seat index
    pub seats: Vec<String>,
    /// Net chips per seat summed over all completed hands
    pub deltas: Vec<i64>,
    pub hands_played: u32,
    /// Hands aborted by an engine fault, excluded from the deltas
    pub hands_faulted: u32,
    pub hands: Vec<HandRecord>,
    pub violations: HashMap<String, BotViolations>,
}

/// Destination for completed match results. The scheduler is the only
/// writer, so implementations do not need to deduplicate.
pub trait MatchSink: Send + Sync {
    fn record_match(&self, result: &MatchResult) -> std::io::Result<()>;
}

/// Collects results in memory; the sink for tests and one-shot CLI runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    results: Mutex<Vec<MatchResult>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> Vec<MatchResult> {
        match self.results.lock() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl MatchSink for MemorySink {
    fn record_match(&self, result: &MatchResult) -> std::io::Result<()> {
        match self.results.lock() {
            Ok(mut g) => g.push(result.clone()),
            Err(poisoned) => poisoned.into_inner().push(result.clone()),
        }
        Ok(())
    }
}

/// Appends one JSON line per match, the same shape the persistence layer
/// ingests.
#[derive(Debug)]
pub struct JsonlSink {
    writer: Mutex<BufWriter<File>>,
}

impl JsonlSink {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                let _ = create_dir_all(parent);
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(f)),
        })
    }
}

impl MatchSink for JsonlSink {
    fn record_match(&self, result: &MatchResult) -> std::io::Result<()> {
        let line = serde_json::to_string(result).map_err(std::io::Error::other)?;
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| std::io::Error::other("sink writer poisoned"))?;
        guard.write_all(line.as_bytes())?;
        guard.write_all(b"\n")?;
        guard.flush()?;
        Ok(())
    }
}
