use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sword_manager::loader::{random_workload, write_workload, WorkloadShape};
use sword_manager::logger;

/// Print a random, well-formed sword-cleaning workload
#[derive(Debug, Parser)]
#[command(name = "gen_workload", version)]
struct Args {
    #[arg(long, default_value_t = 20)]
    swords: usize,

    #[arg(long, default_value_t = 200)]
    requests: usize,

    /// Seed for the random generator; the same seed gives the same workload
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Largest gap between consecutive arrivals
    #[arg(long, default_value_t = 5)]
    max_gap: u64,

    /// Largest cleaning duration
    #[arg(long, default_value_t = 20)]
    max_duration: u64,

    /// Share of swords that start out dirty, between 0 and 1
    #[arg(long, default_value_t = 0.25)]
    dirty_ratio: f64,
}

fn main() {
    logger::init();
    let args = Args::parse();

    let shape = WorkloadShape {
        swords: args.swords,
        requests: args.requests,
        max_gap: args.max_gap,
        max_duration: args.max_duration,
        dirty_ratio: args.dirty_ratio,
    };
    let mut rng = StdRng::seed_from_u64(args.seed);
    let workload = random_workload(&mut rng, &shape);

    log::info!(
        "Generated {} swords and {} requests with seed {}",
        workload.swords.len(),
        workload.requests.len(),
        args.seed
    );
    print!("{}", write_workload(&workload));
}
