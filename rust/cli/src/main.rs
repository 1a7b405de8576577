use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};

use felt_arena::config::ArenaConfig;
use felt_arena::events::EventBus;
use felt_arena::invoker::BotInvoker;
use felt_arena::registry::BotRegistry;
use felt_arena::run_match;
use felt_arena::scheduler::Scheduler;
use felt_arena::sink::JsonlSink;
use felt_cli::{parse_roster, summarize};

#[derive(Parser)]
#[command(name = "felt", about = "Bot-vs-bot Texas Hold'em match arena")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single match and print the result
    Match {
        /// Comma-separated strategy names to seat
        #[arg(long, default_value = "baseline,station")]
        bots: String,
        /// Hands to play (overrides configuration)
        #[arg(long)]
        hands: Option<u32>,
        /// Deck seed for a reproducible match
        #[arg(long)]
        seed: Option<u64>,
        /// Print the full result as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Run the background scheduler until interrupted
    Run {
        /// Comma-separated strategy names for the rotation
        #[arg(long, default_value = "baseline,station,maniac")]
        bots: String,
        /// Append per-match results to this JSONL file
        #[arg(long, default_value = "felt-matches.jsonl")]
        matches_log: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Match {
            bots,
            hands,
            seed,
            json,
        } => {
            let mut config = ArenaConfig::load()?;
            if let Some(h) = hands {
                config.hands_per_match = h;
            }
            if let Some(s) = seed {
                config.seed = Some(s);
            }
            config.validate()?;

            let seating = parse_roster(&bots)?;
            let invoker = BotInvoker::new(config.decision_timeout());
            let events = EventBus::new();
            let match_seed = config.seed.unwrap_or_else(time_seed);

            let result = tokio::task::spawn_blocking(move || {
                run_match("cli", &seating, &config, &invoker, &events, match_seed)
            })
            .await??;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", summarize(&result));
            }
            Ok(())
        }
        Commands::Run { bots, matches_log } => {
            let config = ArenaConfig::load()?;
            let mut registry = BotRegistry::new();
            for seat in parse_roster(&bots)? {
                registry.register(seat.id, seat.bot)?;
            }
            let sink = Arc::new(JsonlSink::create(&matches_log)?);
            tracing::info!(path = %matches_log.display(), "recording match results");

            let scheduler = Scheduler::new(config, registry, sink);
            let (stop, stop_rx) = tokio::sync::watch::channel(false);
            let worker = tokio::spawn(scheduler.run(stop_rx));

            tokio::signal::ctrl_c().await?;
            tracing::info!("shutdown requested");
            let _ = stop.send(true);
            worker.await?;
            Ok(())
        }
    }
}

/// Time-derived seed for unseeded one-shot matches.
fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0xFE17)
}
