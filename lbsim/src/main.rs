//! lbsim CLI
//!
//! Simulate one dispatch policy on both queueing topologies.
//!
//! # Example
//!
//! ```bash
//! # 4 nodes, least connections, queue size 10, 10000 jobs, default seed
//! lbsim 4 leastcxns 10 10000
//!
//! # Only the single-queue model, fixed seed, JSON summaries in results/
//! lbsim 8 utilbased 5 50000 42 --model sqms --json --output-dir results
//! ```

use clap::Parser;
use lbsim::components::{LoadBalanceStrategy, SimulationConfig};
use lbsim::core::logging::init_simulation_logging_with_level;
use lbsim::core::{SimError, DEFAULT_SEED};
use lbsim::metrics::export::csv::export_distribution;
use lbsim::{run, selection_distribution, ModelSelection, RunError, RunOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Load-balancing dispatch simulator
///
/// Runs the chosen policy on a multi-queue (MQMS) and a single-queue (SQMS)
/// model and reports per-node statistics. Runs are reproducible for a given
/// seed.
#[derive(Parser, Debug)]
#[command(name = "lbsim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of service nodes
    nodes: usize,

    /// Load balancing algorithm: roundrobin, random, utilbased or leastcxns
    #[arg(value_parser = parse_policy)]
    policy: LoadBalanceStrategy,

    /// Queue size (per node for MQMS, shared for SQMS)
    queue_size: usize,

    /// Number of jobs to dispatch
    jobs: u64,

    /// Seed for the random number generator
    #[arg(default_value_t = DEFAULT_SEED)]
    seed: i64,

    /// Queueing model to simulate
    #[arg(long, value_enum, default_value_t = ModelSelection::Both)]
    model: ModelSelection,

    /// Directory for simlog.csv and the per-run files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Also write <model>_<policy>.json
    #[arg(long)]
    json: bool,

    /// Print results only; write no files
    #[arg(long)]
    no_files: bool,

    /// Write each policy's node selection pattern to this CSV file
    #[arg(long, value_name = "FILE")]
    distribution: Option<PathBuf>,

    /// Log level (written to stderr), overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_policy(name: &str) -> Result<LoadBalanceStrategy, String> {
    name.parse().map_err(|e: SimError| e.to_string())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_simulation_logging_with_level(&args.log_level);

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Simulation failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn execute(args: &Args) -> Result<(), RunError> {
    let config = SimulationConfig::new(args.nodes, args.policy, args.queue_size, args.jobs)
        .with_seed(args.seed);

    println!(
        "Running simulation with: {} Nodes, {} Algorithm, {} Queue length, {} Jobs, {} Seed.",
        args.nodes, args.policy, args.queue_size, args.jobs, args.seed
    );

    let mut options = RunOptions::new(config.clone())
        .with_models(args.model)
        .with_json(args.json);
    if !args.no_files {
        std::fs::create_dir_all(&args.output_dir)
            .map_err(|e| RunError::Metrics(e.into()))?;
        options = options.with_output_dir(&args.output_dir);
    }

    for summary in run(&options)? {
        println!("-------------------------------------------------");
        println!("{} SIMULATION:", summary.model.name().to_uppercase());
        print!("{summary}");
    }

    if let Some(path) = &args.distribution {
        println!("> Testing node choice distribution...");
        let traces =
            selection_distribution(config.nodes, config.jobs as usize, config.seed, config.service_mean)?;
        export_distribution(path, &traces)?;
        info!(path = %path.display(), "Wrote selection distribution");
        println!("> ... done");
    }

    Ok(())
}
