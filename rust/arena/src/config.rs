use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Arena configuration: seating, match length, pacing, and the safety knobs
/// around bot decisions. Values come from defaults, then an optional TOML
/// file named by `FELT_CONFIG`, then `FELT_*` environment variables, last
/// writer wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArenaConfig {
    /// Seats assembled per match
    pub seats_per_match: usize,
    /// Hands played per match
    pub hands_per_match: u32,
    /// Pause between matches in the background loop, in seconds
    pub match_delay_secs: f64,
    /// Disables the background worker entirely (test/CI contexts)
    pub worker_disabled: bool,
    /// Chips each seat starts every hand with
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Wall-clock budget for a single bot decision, in milliseconds
    pub decision_timeout_ms: u64,
    /// Monte Carlo sample count for early-street equity
    pub equity_samples: u32,
    /// Base seed for reproducible schedules; unset means time-derived
    pub seed: Option<u64>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            seats_per_match: 6,
            hands_per_match: 50,
            match_delay_secs: 2.0,
            worker_disabled: false,
            starting_stack: 20_000,
            small_blind: 50,
            big_blind: 100,
            decision_timeout_ms: 500,
            equity_samples: 2_000,
            seed: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Optional-field mirror of [`ArenaConfig`] for TOML files.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seats_per_match: Option<usize>,
    #[serde(default)]
    hands_per_match: Option<u32>,
    #[serde(default)]
    match_delay_secs: Option<f64>,
    #[serde(default)]
    worker_disabled: Option<bool>,
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    decision_timeout_ms: Option<u64>,
    #[serde(default)]
    equity_samples: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
}

impl ArenaConfig {
    /// Load from the process environment (and the file it points at).
    pub fn load() -> Result<Self, ConfigError> {
        let file = match std::env::var("FELT_CONFIG") {
            Ok(path) => Some(std::fs::read_to_string(path)?),
            Err(_) => None,
        };
        Self::from_sources(file.as_deref(), |key| std::env::var(key).ok())
    }

    /// Layer defaults, optional TOML text, then environment lookups.
    /// Split from [`load`](Self::load) so tests can inject both sources.
    pub fn from_sources(
        file: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Some(text) = file {
            let f: FileConfig = toml::from_str(text)?;
            if let Some(v) = f.seats_per_match {
                cfg.seats_per_match = v;
            }
            if let Some(v) = f.hands_per_match {
                cfg.hands_per_match = v;
            }
            if let Some(v) = f.match_delay_secs {
                cfg.match_delay_secs = v;
            }
            if let Some(v) = f.worker_disabled {
                cfg.worker_disabled = v;
            }
            if let Some(v) = f.starting_stack {
                cfg.starting_stack = v;
            }
            if let Some(v) = f.small_blind {
                cfg.small_blind = v;
            }
            if let Some(v) = f.big_blind {
                cfg.big_blind = v;
            }
            if let Some(v) = f.decision_timeout_ms {
                cfg.decision_timeout_ms = v;
            }
            if let Some(v) = f.equity_samples {
                cfg.equity_samples = v;
            }
            if let Some(v) = f.seed {
                cfg.seed = Some(v);
            }
        }

        if let Some(v) = non_empty(env("FELT_SEATS")) {
            cfg.seats_per_match = parse(&v, "FELT_SEATS")?;
        }
        if let Some(v) = non_empty(env("FELT_HANDS")) {
            cfg.hands_per_match = parse(&v, "FELT_HANDS")?;
        }
        if let Some(v) = non_empty(env("FELT_MATCH_DELAY")) {
            cfg.match_delay_secs = parse(&v, "FELT_MATCH_DELAY")?;
        }
        if let Some(v) = non_empty(env("FELT_WORKER_DISABLED")) {
            cfg.worker_disabled = parse_bool(&v)
                .ok_or_else(|| ConfigError::Invalid("FELT_WORKER_DISABLED".into()))?;
        }
        if let Some(v) = non_empty(env("FELT_STARTING_STACK")) {
            cfg.starting_stack = parse(&v, "FELT_STARTING_STACK")?;
        }
        if let Some(v) = non_empty(env("FELT_SMALL_BLIND")) {
            cfg.small_blind = parse(&v, "FELT_SMALL_BLIND")?;
        }
        if let Some(v) = non_empty(env("FELT_BIG_BLIND")) {
            cfg.big_blind = parse(&v, "FELT_BIG_BLIND")?;
        }
        if let Some(v) = non_empty(env("FELT_DECISION_TIMEOUT_MS")) {
            cfg.decision_timeout_ms = parse(&v, "FELT_DECISION_TIMEOUT_MS")?;
        }
        if let Some(v) = non_empty(env("FELT_EQUITY_SAMPLES")) {
            cfg.equity_samples = parse(&v, "FELT_EQUITY_SAMPLES")?;
        }
        if let Some(v) = non_empty(env("FELT_SEED")) {
            cfg.seed = Some(parse(&v, "FELT_SEED")?);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=9).contains(&self.seats_per_match) {
            return Err(ConfigError::Invalid(
                "seats_per_match must be between 2 and 9".into(),
            ));
        }
        if self.hands_per_match == 0 {
            return Err(ConfigError::Invalid("hands_per_match must be >= 1".into()));
        }
        if self.match_delay_secs < 0.0 {
            return Err(ConfigError::Invalid(
                "match_delay_secs must not be negative".into(),
            ));
        }
        if self.big_blind == 0 || self.small_blind == 0 {
            return Err(ConfigError::Invalid("blinds must be positive".into()));
        }
        if self.small_blind > self.big_blind {
            return Err(ConfigError::Invalid(
                "small_blind must not exceed big_blind".into(),
            ));
        }
        if self.starting_stack < self.big_blind {
            return Err(ConfigError::Invalid(
                "starting_stack must cover the big blind".into(),
            ));
        }
        if self.decision_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "decision_timeout_ms must be >= 1".into(),
            ));
        }
        if self.equity_samples == 0 {
            return Err(ConfigError::Invalid("equity_samples must be >= 1".into()));
        }
        Ok(())
    }

    pub fn decision_timeout(&self) -> Duration {
        Duration::from_millis(self.decision_timeout_ms)
    }

    pub fn match_delay(&self) -> Duration {
        Duration::from_secs_f64(self.match_delay_secs)
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

fn parse<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{} has an invalid value", key)))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
