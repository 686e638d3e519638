//! Command-line driver: runs the tractor-trailer optimizer one or more times.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trailer_evo::algorithms::simple_ga::TrailerGA;
use trailer_evo::config::OptimizerConfig;
use trailer_evo::diagnostics::{JsonLinesSink, NullSink, StatsSink};
use trailer_evo::report::{append_record, RunRecord};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON configuration file; missing fields use the reference scenario
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of independent runs
    #[arg(short, long, default_value_t = 1)]
    runs: u64,

    /// Base seed; run `i` uses `seed + i`. Defaults to the configured seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the number of generations
    #[arg(short, long)]
    generations: Option<usize>,

    /// Append one JSON line per run to this file
    #[arg(long)]
    record: Option<PathBuf>,

    /// Stream per-generation statistics as JSON lines to this file
    #[arg(long)]
    stats: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => OptimizerConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => OptimizerConfig::default(),
    };
    if let Some(generations) = args.generations {
        config = config.with_max_generations(generations);
    }
    config.validate().context("invalid configuration")?;

    let optimizer = TrailerGA::from_config(&config)?;
    let base_seed = args.seed.unwrap_or(config.random_seed);

    let mut sink: Box<dyn StatsSink> = match &args.stats {
        Some(path) => Box::new(
            JsonLinesSink::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(NullSink),
    };

    for run in 0..args.runs {
        let seed = base_seed.wrapping_add(run);
        info!(run, seed, "starting run");

        let mut rng = StdRng::seed_from_u64(seed);
        let result = optimizer.run_with_sink(&mut rng, sink.as_mut())?;

        println!("run {run} (seed {seed})\n{}", result.stats.summary());
        if !result.is_feasible() {
            info!(run, "no feasible control sequence found");
        }

        if let Some(path) = &args.record {
            let record = RunRecord::from_result(&result).with_seed(seed);
            append_record(path, &record)
                .with_context(|| format!("failed to append run record to {}", path.display()))?;
        }
    }

    Ok(())
}
