//! Scheduling policy simulator CLI
//!
//! Reads a scenario (mode, policies, horizon, processes) from a file or
//! stdin and prints a trace chart or a stats table per policy.
//!
//! ```bash
//! cpu-sched scenario.txt
//! cpu-sched --mode stats < scenario.txt
//! cpu-sched --random 40 --seed 7 --policies 1,2-2,4,7
//! ```

use std::{fs, io::Read, path::PathBuf, process::ExitCode};

use clap::Parser;
use cpu_sched::{
    HorizonMode, Mode, Scenario, Sim, SimConfig, SimError, Workload,
    report::{StatsTable, TraceChart},
    sim::parse_policies,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cpu-sched")]
#[command(version, about, long_about = None)]
struct Args {
    /// Scenario file. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Override the scenario's report mode (trace | stats)
    #[arg(long)]
    mode: Option<Mode>,

    /// Widen timelines instead of failing when a run outlives the horizon
    #[arg(long)]
    extend_horizon: bool,

    /// Skip the post-run invariant audit
    #[arg(long)]
    no_audit: bool,

    /// Generate a random workload over this many ticks instead of reading one
    #[arg(long, value_name = "TICKS")]
    random: Option<u64>,

    /// Seed for the generated workload. When omitted, a random seed is used.
    #[arg(long, requires = "random")]
    seed: Option<u64>,

    /// Per-tick arrival probability for the generated workload
    #[arg(long, default_value = "0.3")]
    p_arrival: f64,

    /// Probability that a generated process is short
    #[arg(long, default_value = "0.3")]
    p_short: f64,

    /// Service time of short generated processes
    #[arg(long, default_value = "2")]
    short_ticks: u64,

    /// Service time of long generated processes
    #[arg(long, default_value = "6")]
    long_ticks: u64,

    /// Policy list for the generated workload
    #[arg(long, default_value = "1,2-1,3,4,5,6,7")]
    policies: String,

    /// Horizon for the generated workload; defaults to the serial finish bound
    #[arg(long, requires = "random")]
    horizon: Option<u64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), SimError> {
    let scenario = match args.random {
        Some(ticks) => generated(&args, ticks)?,
        None => Scenario::parse(&read_input(args.input.as_ref())?)?,
    };
    let mode = args.mode.unwrap_or(scenario.mode);

    let horizon_mode = if args.extend_horizon {
        HorizonMode::Extend
    } else {
        HorizonMode::Strict
    };
    let config = SimConfig::new()
        .with_horizon_mode(horizon_mode)
        .with_audit(!args.no_audit);

    let sim = Sim::new(config, scenario.workload);
    for policy in &scenario.policies {
        let result = sim.run(*policy)?;
        match mode {
            Mode::Trace => print!("{}", TraceChart(&result)),
            Mode::Stats => {
                let stats = result.stats()?;
                print!("{}", StatsTable { result: &result, stats: &stats });
            }
        }
    }
    Ok(())
}

fn generated(args: &Args, ticks: u64) -> Result<Scenario, SimError> {
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(ticks, seed, p_arrival = args.p_arrival, p_short = args.p_short, "generating workload");

    let mut workload = Workload::bernoulli(
        ticks,
        args.p_arrival,
        args.p_short,
        args.short_ticks,
        args.long_ticks,
        seed,
    )?;
    if let Some(horizon) = args.horizon {
        workload.horizon = horizon;
    }

    Ok(Scenario {
        mode: args.mode.unwrap_or_default(),
        policies: parse_policies(&args.policies)?,
        workload,
    })
}

fn read_input(path: Option<&PathBuf>) -> Result<String, SimError> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}
