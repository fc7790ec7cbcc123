use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tools::{init_tracing, load_rules, run_fuzz, write_journal};

#[derive(Parser)]
#[command(author, version, about = "Random-input soak test for round invariants", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 10_000)]
    ticks: u64,
    /// TOML file overriding the default rules
    #[arg(short, long)]
    rules: Option<PathBuf>,
    /// Write the first round's input journal here
    #[arg(long)]
    journal_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let rules = load_rules(args.rules.as_deref())?;
    println!("Starting fuzz harness on seed {} for {} ticks...", args.seed, args.ticks);
    let (summary, journal) = run_fuzz(args.seed, args.ticks, rules)?;

    if let Some(path) = &args.journal_out {
        write_journal(path, &journal)?;
        println!("First round journal written to {}", path.display());
    }
    println!("Fuzzing completed: {} ticks, {} rounds finished.", summary.ticks, summary.rounds_finished);
    Ok(())
}
