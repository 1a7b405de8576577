use serde::{Deserialize, Serialize};

use crate::action::AppliedAction;
use crate::cards::Card;
use crate::hand::HandStrength;

/// Represents a betting street in Texas Hold'em poker.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    /// Before flop (hole cards dealt)
    Preflop,
    /// After flop (3 community cards)
    Flop,
    /// After turn (4th community card)
    Turn,
    /// After river (5th community card)
    River,
}

/// Records a single effective action during a hand.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: usize,
    pub street: Street,
    pub action: AppliedAction,
    /// True when the safe default was substituted for this seat's decision.
    #[serde(default)]
    pub forced: bool,
}

/// One seat's revealed holding at showdown.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownSeat {
    pub seat: usize,
    pub hole: [Card; 2],
    pub strength: HandStrength,
}

/// Complete record of one hand: enough to replay it exactly (seed, button,
/// blinds, starting stacks) and to audit it (actions, board, payouts).
/// Serialized one-per-line to JSONL for hand history storage.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    pub hand_id: String,
    /// RNG seed used for the deck shuffle (enables deterministic replay)
    pub seed: u64,
    pub button: usize,
    pub small_blind: u32,
    pub big_blind: u32,
    pub starting_stacks: Vec<u32>,
    /// Chronological list of all effective actions
    pub actions: Vec<ActionRecord>,
    /// Community cards on the board (up to 5 cards)
    pub board: Vec<Card>,
    /// Chips awarded per seat at hand end
    pub payouts: Vec<u32>,
    /// Net chip movement per seat over the hand
    pub deltas: Vec<i64>,
    /// Revealed hands if the hand reached showdown
    #[serde(default)]
    pub showdown: Option<Vec<ShowdownSeat>>,
    /// Timestamp when the hand was played (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Append-only JSONL writer for hand records.
pub struct HandLogger {
    writer: BufWriter<File>,
}

impl HandLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                let _ = create_dir_all(parent);
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(f),
        })
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
