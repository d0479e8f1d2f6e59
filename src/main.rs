use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};

use marco::config::{Bias, Config, MaximizeStrategy};
use marco::enumerator::Emit;
use marco::error::MarcoError;
use marco::hub::{self, HubOutcome};
use marco::input::{self, FormatOverride};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BiasArg {
    /// Seek MUSes first: grow seeds toward satisfaction, shrink UNSAT
    /// results.
    Mus,
    /// Seek MSSes/MCSes first (`MCSes`).
    Mcs,
    /// Split the worker pool evenly between both biases.
    Half,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MaxArg {
    Always,
    Half,
}

/// Enumerates MUSes and MSSes/MCSes of a DIMACS CNF or Group CNF instance.
#[derive(Parser)]
#[command(name = "marco", author, version, about, long_about = None)]
struct Cli {
    /// Input file (DIMACS CNF or Group CNF, optionally gzip-compressed).
    /// Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Force CNF/GCNF parsing regardless of the file extension.
    #[arg(long, conflicts_with = "smt")]
    cnf: bool,

    /// Force SMT-LIB 2.0 parsing (recognised but not implemented by this
    /// build's solver backend).
    #[arg(long, conflicts_with = "cnf")]
    smt: bool,

    /// Which kind of result to seek first.
    #[arg(short, long, value_enum, default_value = "mus")]
    bias: BiasArg,

    /// Enumerate only minimum-cardinality MUSes (SMUS mode).
    #[arg(long)]
    smus: bool,

    /// Maximize every seed ("always") or only seeds already on the biased
    /// side ("half"), instead of letting the Map hand back extremal seeds
    /// directly.
    #[arg(short = 'm', long = "max", value_enum)]
    max: Option<MaxArg>,

    /// Force solver-side maximization even when `--max` is also given.
    #[arg(short = 'M', long = "MAX")]
    force_solver_max: bool,

    /// Disable seed maximization entirely.
    #[arg(long, conflicts_with = "max")]
    nomax: bool,

    /// Stop after emitting this many unique results.
    #[arg(short, long)]
    limit: Option<usize>,

    /// Stop after this many seconds, whatever has been found so far.
    #[arg(short = 'T', long)]
    timeout: Option<u64>,

    /// Increase log verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Prefix every result line with the elapsed time it was found at.
    #[arg(short, long)]
    alltimes: bool,

    /// Print a timing/count report to stderr on exit.
    #[arg(short = 's', long)]
    stats: bool,
}

fn format_override(cli: &Cli) -> FormatOverride {
    if cli.cnf {
        FormatOverride::Cnf
    } else if cli.smt {
        FormatOverride::Smt
    } else {
        FormatOverride::Auto
    }
}

fn maximize_strategy(cli: &Cli) -> MaximizeStrategy {
    if cli.smus {
        // SMUS mode needs every seed driven to its true cardinality
        // extremum before it is checked, not just a plausible witness.
        return MaximizeStrategy::Always;
    }
    if cli.nomax {
        return MaximizeStrategy::None;
    }
    if cli.force_solver_max {
        return MaximizeStrategy::Solver;
    }
    match cli.max {
        Some(MaxArg::Always) => MaximizeStrategy::Always,
        Some(MaxArg::Half) => MaximizeStrategy::Half,
        None => MaximizeStrategy::Solver,
    }
}

fn base_config(cli: &Cli, bias: Bias, maximize: MaximizeStrategy) -> Config {
    Config {
        bias,
        smus: cli.smus,
        maximize,
        mssguided: true,
        use_singletons: true,
        limit: cli.limit,
        timeout: cli.timeout.map(Duration::from_secs),
        verbose: cli.verbose,
        stats: cli.stats,
        alltimes: cli.alltimes,
    }
}

/// Builds the Hub's worker pool. `--bias mus`/`mcs` runs a single
/// Enumerator; `--bias half` runs the "typical three" the Hub Coordinator
/// is built around (MUS-biased, MCS-biased, and an unbiased
/// no-maximisation worker), each cross-propagating blocks to the others.
fn build_configs(cli: &Cli) -> Vec<Config> {
    let maximize = maximize_strategy(cli);
    match cli.bias {
        BiasArg::Mus => vec![base_config(cli, Bias::MUSes, maximize)],
        BiasArg::Mcs => vec![base_config(cli, Bias::MCSes, maximize)],
        BiasArg::Half => vec![
            base_config(cli, Bias::MUSes, maximize),
            base_config(cli, Bias::MCSes, maximize),
            base_config(cli, Bias::MUSes, MaximizeStrategy::None),
        ],
    }
}

fn print_emit(emit: &Emit, alltimes: bool, started: &Instant) {
    let (tag, subset) = match emit {
        Emit::Unsat(u) => ("U", u),
        Emit::Sat(s) => ("S", s),
    };
    let indices: Vec<String> = subset.iter().map(|i| (i + 1).to_string()).collect();
    if alltimes {
        println!("{:.6} {tag} {}", started.elapsed().as_secs_f64(), indices.join(" "));
    } else {
        println!("{tag} {}", indices.join(" "));
    }
}

fn run(cli: Cli) -> Result<HubOutcome, MarcoError> {
    let format = format_override(&cli);
    let instance = input::read_instance(cli.input.as_deref(), format)?;

    let shutdown = marco::signals::combined_shutdown_flag(cli.timeout.map(Duration::from_secs))?;
    let configs = build_configs(&cli);
    let limit = cli.limit;
    let alltimes = cli.alltimes;
    let started = Instant::now();

    let report = hub::run(&instance, configs, limit, shutdown.clone(), |emit| {
        print_emit(emit, alltimes, &started);
    });

    if cli.stats {
        for (i, stats) in report.worker_stats.iter().enumerate() {
            eprintln!("--- worker {i} ({:.3}s total) ---", stats.total_time());
            stats.report();
        }
    }

    if shutdown.load(Ordering::SeqCst) && report.outcome == HubOutcome::Interrupted {
        return Err(MarcoError::InterruptSignal);
    }

    Ok(report.outcome)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("marco: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
