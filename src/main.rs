use crate::algos::{Neighborhood, Strategy};
use crate::config::Config;
use crate::orchestrate::{Settings, finalize, run_all, run_all_parallel, run_comparison};
use clap::{ArgAction, Parser};
use eyre::Result;
use std::path::{Path, PathBuf};
use tracing::{Level, info};

mod algos;
mod checks;
mod config;
mod display;
mod loaders;
mod model;
mod orchestrate;
mod remap;
mod scoring;
mod stats;

const DEFAULT_CONFIG: &str = "rteams.toml";

/// Automatically partition tutorial groups into balanced student teams
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// CSV file listing the students
    input: PathBuf,
    /// Write the teams to FILE
    #[arg(short, long, value_name = "FILE", default_value = "final_teams.csv")]
    output: PathBuf,
    /// Use FILE instead of rteams.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Strategy used to build the initial teams
    #[arg(short, long, value_enum)]
    strategy: Option<Strategy>,
    /// Swaps explored by the optimizer at every iteration
    #[arg(long, value_enum)]
    neighborhood: Option<Neighborhood>,
    /// Keep the initial teams as built by the strategy
    #[arg(long)]
    no_optimize: bool,
    /// Seed for the random baseline
    #[arg(long)]
    seed: Option<u64>,
    /// Do not write the teams to the output file
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Run the standard pipelines and compare their results
    #[arg(long)]
    compare: bool,
    /// Process tutorial groups concurrently
    #[arg(long)]
    parallel: bool,
    /// Write the time spent on every tutorial group to FILE
    #[arg(long, value_name = "FILE")]
    timings: Option<PathBuf>,
    /// Display the members of every team
    #[arg(short, long)]
    details: bool,
    /// Set verbosity level
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(file_name) => Config::load(file_name)?,
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(Path::new(DEFAULT_CONFIG))?,
        None => Config::default(),
    };
    if let Some(strategy) = args.strategy {
        config.solver.strategy = strategy;
    }
    if let Some(neighborhood) = args.neighborhood {
        config.optimizer.neighborhood = neighborhood;
    }
    if let Some(seed) = args.seed {
        config.solver.seed = Some(seed);
    }
    if args.no_optimize {
        config.optimizer.enabled = false;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    let config = load_config(&args)?;
    let settings = Settings::from_config(&config);
    let weights = config.optimizer.weights;

    let students = loaders::load(&args.input)?;
    let groups = remap::split_by_tutorial_group(students);
    info!(
        groups = groups.len(),
        strategy = %settings.strategy,
        optimize = settings.optimizer.is_some(),
        "tutorial groups loaded"
    );

    if args.compare {
        let results = run_comparison(&groups, &settings, weights)?;
        display::display_comparison(&results, weights);
        return Ok(());
    }

    let outcomes = if args.parallel {
        run_all_parallel(groups, &settings).await?
    } else {
        run_all(groups, &settings)?
    };
    for outcome in &outcomes {
        checks::check_diversity(&outcome.group, &outcome.partition);
    }
    let assignments = finalize(&outcomes);
    if !args.dry_run {
        loaders::save_assignments(&args.output, &assignments)?;
        info!(
            students = assignments.len(),
            output = %args.output.display(),
            "teams saved"
        );
    }
    if let Some(timings) = &args.timings {
        loaders::save_timings(timings, &outcomes)?;
    }
    if args.details {
        display::display_details(&outcomes);
    }
    display::display_stats(&outcomes, weights);
    Ok(())
}
