use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sword_manager::loader::format_outcome;
use sword_manager::{logger, simulate_file, EngineConfig, Result};

/// Run a sword-cleaning workload and print when each request was served
#[derive(Debug, Parser)]
#[command(name = "clean_swords", version)]
struct Args {
    /// Workload file: an `N M` header, N swords, then M requests
    input: PathBuf,

    /// JSON file with engine settings (table_capacity, queue_capacity, time_limit)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop before any event later than this time
    #[arg(long)]
    time_limit: Option<u64>,

    /// Print one JSON object per outcome instead of answer-file lines
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    if let Some(limit) = args.time_limit {
        config = config.with_time_limit(limit);
    }
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    log::debug!("Engine configuration: {:?}", config);

    let engine = simulate_file(&args.input, config)?;
    for outcome in engine.outcomes() {
        if args.json {
            println!("{}", serde_json::to_string(outcome)?);
        } else {
            println!("{}", format_outcome(outcome));
        }
    }

    let unresolved = engine.pending_requests() + engine.waiting_requests();
    if unresolved > 0 {
        log::warn!("{} requests were not resolved", unresolved);
    }
    Ok(())
}

fn main() -> ExitCode {
    logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
