//! hebbian — build a Hebbian weight matrix from bipolar patterns.
//!
//! This is the CLI binary entry point.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use hebbian::config::{DEFAULT_NEURONS, DEFAULT_PARALLEL_CHUNK, DEFAULT_PATTERNS, DEFAULT_SEED};
use hebbian::pattern::generate::{hammed_patterns, random_patterns};
use hebbian::pattern::Pattern;
use hebbian::weights::capacity::{absolute_capacity, exceeds_capacity, hebbian_capacity};
use hebbian::weights::{BuilderConfig, Strategy, WeightMatrixBuilder};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Pairwise,
    OuterProduct,
    Parallel,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Pairwise => Strategy::Pairwise,
            StrategyArg::OuterProduct => Strategy::OuterProduct,
            StrategyArg::Parallel => Strategy::Parallel,
        }
    }
}

/// Hebbian weight-matrix CLI.
#[derive(Parser, Debug)]
#[command(
    name = "hebbian",
    about = "Build the Hebbian weight matrix of a bipolar associative memory",
    version
)]
struct Cli {
    /// Explicit training pattern, e.g. "-1,1,1,1,-1". Repeatable.
    #[arg(short, long = "pattern", allow_hyphen_values = true)]
    patterns: Vec<String>,

    /// Units per random pattern (ignored when patterns are given).
    #[arg(short, long, default_value_t = DEFAULT_NEURONS)]
    neurons: usize,

    /// Number of random patterns (ignored when patterns are given).
    #[arg(short, long, default_value_t = DEFAULT_PATTERNS)]
    count: usize,

    /// Train on a random origin plus `count - 1` patterns exactly this many
    /// flips away from it, instead of independent random patterns.
    #[arg(short, long)]
    radius: Option<usize>,

    /// Seed for random pattern generation.
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Accumulation strategy.
    #[arg(long, value_enum, default_value_t = StrategyArg::OuterProduct)]
    strategy: StrategyArg,

    /// Patterns per task for the parallel strategy.
    #[arg(long, default_value_t = DEFAULT_PARALLEL_CHUNK)]
    chunk: usize,

    /// Write the matrix to this file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not print the matrix.
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    tracing::info!("hebbian v{}", env!("CARGO_PKG_VERSION"));

    let patterns = if cli.patterns.is_empty() {
        if cli.count == 0 {
            bail!("--count must be at least 1");
        }
        let mut rng = StdRng::seed_from_u64(cli.seed);
        match cli.radius {
            Some(radius) => {
                tracing::info!(
                    "Generating origin plus {} patterns at radius {} over {} units (seed {})",
                    cli.count - 1,
                    radius,
                    cli.neurons,
                    cli.seed,
                );
                let origin = Pattern::random(cli.neurons, &mut rng)
                    .context("failed to generate origin pattern")?;
                let mut patterns = hammed_patterns(&origin, cli.count - 1, radius, &mut rng)
                    .context("failed to generate patterns around origin")?;
                patterns.insert(0, origin);
                patterns
            }
            None => {
                tracing::info!(
                    "Generating {} random patterns over {} units (seed {})",
                    cli.count,
                    cli.neurons,
                    cli.seed,
                );
                random_patterns(cli.neurons, cli.count, &mut rng)
                    .context("failed to generate patterns")?
            }
        }
    } else {
        cli.patterns
            .iter()
            .map(|s| {
                s.parse::<Pattern>()
                    .with_context(|| format!("invalid pattern '{}'", s))
            })
            .collect::<Result<Vec<_>>>()?
    };

    let n = patterns.first().map(Pattern::len).unwrap_or(0);
    tracing::info!(
        "Capacity for {} units: {:.1} reliable, {} absolute",
        n,
        hebbian_capacity(n),
        absolute_capacity(n),
    );
    if exceeds_capacity(n, patterns.len()) {
        tracing::warn!(
            "{} patterns exceed the reliable capacity of {} units; recall will degrade",
            patterns.len(),
            n,
        );
    }

    let builder = WeightMatrixBuilder::new(BuilderConfig {
        strategy: cli.strategy.into(),
        parallel_chunk: cli.chunk,
        ..Default::default()
    });
    let weights = builder
        .build_patterns(&patterns)
        .context("failed to build weight matrix")?;

    tracing::info!(
        "Built {}x{} matrix from {} patterns (max |w| = {:.3})",
        weights.dim(),
        weights.dim(),
        weights.pattern_count(),
        weights.max_abs(),
    );

    if !cli.quiet {
        print!("{}", weights);
    }

    if let Some(path) = &cli.output {
        weights
            .save(path)
            .with_context(|| format!("failed to write weights to {}", path.display()))?;
        tracing::info!("Wrote weights to {}", path.display());
    }

    Ok(())
}
