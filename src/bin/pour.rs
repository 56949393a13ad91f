use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;

use lazy_pour::scenario::ScenarioSpec;
use lazy_pour::scenarios;
use lazy_pour::telemetry::init_stderr_tracing;

/// Find the shortest ways to measure an amount of water with fixed vessels.
#[derive(Parser, Debug)]
#[command(name = "pour", about = "Breadth-first search for water-pouring puzzles")]
struct Args {
    /// Built-in scenario name (see --list).
    #[arg(long, conflicts_with_all = ["config", "capacities"])]
    scenario: Option<String>,

    /// JSON scenario file.
    #[arg(long, conflicts_with = "capacities")]
    config: Option<PathBuf>,

    /// Vessel capacities, e.g. `4,9`.
    #[arg(long, value_delimiter = ',')]
    capacities: Option<Vec<u32>>,

    /// Amount to measure; overrides the scenario's target.
    #[arg(long)]
    target: Option<u32>,

    /// Print the first N solutions instead of only the shortest.
    #[arg(long, default_value_t = 1)]
    all: usize,

    /// Stop after this many breadth-first generations.
    #[arg(long)]
    max_generations: Option<usize>,

    /// List built-in scenarios and exit.
    #[arg(long)]
    list: bool,
}

fn load_spec(args: &Args) -> Result<ScenarioSpec> {
    let mut spec = if let Some(name) = &args.scenario {
        match scenarios::by_name(name) {
            Some(spec) => spec,
            None => bail!(
                "unknown scenario: {name}\n\nAvailable scenarios:\n  - {}",
                scenarios::available_names().join("\n  - ")
            ),
        }
    } else if let Some(path) = &args.config {
        ScenarioSpec::from_json_file(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?
    } else if let Some(capacities) = &args.capacities {
        ScenarioSpec::new("cli", capacities.clone())
    } else {
        scenarios::classic()
    };

    if let Some(target) = args.target {
        spec.target = Some(target);
    }
    if let Some(max) = args.max_generations {
        spec.limits.max_generations = max;
    }
    spec.validate().context("invalid scenario")?;
    Ok(spec)
}

fn run(args: &Args) -> Result<ExitCode> {
    if args.list {
        for name in scenarios::available_names() {
            println!("{name}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let spec = load_spec(args)?;
    let Some(target) = spec.target else {
        bail!("scenario {} has no target; pass --target", spec.name);
    };

    println!("Scenario: {}", spec.name);
    println!("  capacities: {:?}", spec.capacities);
    println!("  target: {target}");

    let search = spec.search()?;
    let solutions = search.solutions(target);
    let mut found = 0;
    for path in solutions.iter().take(args.all.max(1)) {
        println!("{path}");
        found += 1;
    }

    if let Some(err) = search.stopped() {
        eprintln!("Search stopped: {err}");
        return Ok(ExitCode::from(1));
    }
    if found == 0 {
        println!("No sequence of moves measures {target}.");
        return Ok(ExitCode::from(1));
    }

    let progress = search.progress();
    println!("  explored: {} states in {} generations", progress.explored, progress.generations);
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_stderr_tracing("info");
    let args = Args::parse();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::from(2)
        }
    }
}
