use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use maze_core::replay_to_end;
use tools::{describe_outcome, init_tracing, read_journal};

#[derive(Parser)]
#[command(author, version, about = "Replay a recorded input journal", long_about = None)]
struct Args {
    /// Path to the journal JSON file to replay
    #[arg(short, long)]
    journal: PathBuf,
    /// Stop after this many ticks when no one has burned
    #[arg(short, long, default_value_t = 100_000)]
    max_ticks: u64,
    /// Print the result as one JSON object
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let journal = read_journal(&args.journal)?;
    let result = replay_to_end(&journal, args.max_ticks)
        .with_context(|| format!("replay of {} failed", args.journal.display()))?;

    if args.json {
        println!("{}", serde_json::to_string(&result).context("failed to serialize result")?);
        return Ok(());
    }
    println!("Outcome: {}", describe_outcome(result.outcome));
    println!("Final Tick: {}", result.final_tick);
    println!("Snapshot Hash: 0x{:016x}", result.final_snapshot_hash);
    Ok(())
}
