use crate::filter::DEFAULT_MIN_LENGTH;
use crate::optimizer::{FitnessKind, GaParams};
use crate::overlap::{ErrorModel, ScoringConfig, DEFAULT_ERROR_RATE};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Default number of strand classification passes
pub const DEFAULT_STRAND_ITERATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StrategyKind {
    /// Genetic search (a parameter sweep when --sweep is given)
    #[default]
    Ga,
    /// Nearest-neighbour chaining from every start fragment
    Greedy,
}

#[derive(Debug, Parser, Clone)]
#[command(name = "fragasm", version, about)]
pub struct AssemblyArgs {
    /// FASTA file of fragments, optionally gzipped.
    pub input: PathBuf,

    /// Directory to write the matrices, tour, layout and assembly into.
    #[clap(short, long)]
    pub out_dir: PathBuf,

    /// Fragments at or below this length are dropped on load.
    #[clap(long, default_value_t = DEFAULT_MIN_LENGTH)]
    pub min_length: usize,

    /// Fraction of an overlap window allowed to mismatch.
    #[clap(long, default_value_t = DEFAULT_ERROR_RATE)]
    pub error_rate: f64,

    /// How the mismatch budget grows with the window length.
    #[clap(long, value_enum, default_value_t = ErrorModel::Linear)]
    pub error_model: ErrorModel,

    /// Overlaps shorter than this are treated as no overlap.
    #[clap(long, default_value_t = 0)]
    pub min_overlap: usize,

    /// Maximum number of strand classification passes; 0 keeps every fragment.
    #[clap(long, default_value_t = DEFAULT_STRAND_ITERATIONS)]
    pub strand_iterations: usize,

    /// Population size of the genetic search.
    #[clap(long, default_value_t = 80)]
    pub population: usize,

    /// Generations to evolve.
    #[clap(long, default_value_t = 5000)]
    pub generations: usize,

    /// Per-position swap probability.
    #[clap(long, default_value_t = 0.03)]
    pub mutation_rate: f64,

    /// Probability that a selected pair is recombined.
    #[clap(long, default_value_t = 1.0)]
    pub crossover_rate: f64,

    /// Run this many genetic searches with randomly drawn parameters and keep the best.
    #[clap(long)]
    pub sweep: Option<usize>,

    /// Ordering search to run.
    #[clap(long, value_enum, default_value_t = StrategyKind::Ga)]
    pub strategy: StrategyKind,

    /// Objective the search optimizes.
    #[clap(long, value_enum, default_value_t = FitnessKind::Overlap)]
    pub fitness: FitnessKind,

    /// Random seed.
    #[clap(long, default_value_t = 0)]
    pub seed: u64,

    /// Stop once the best score has not improved for this many generations.
    #[clap(long)]
    pub stall: Option<usize>,
}

/// Validated settings for a whole assembly run
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyConfig {
    pub min_length: usize,
    pub scoring: ScoringConfig,
    pub strand_iterations: usize,
    pub ga: GaParams,
    pub sweep_runs: Option<usize>,
    pub strategy: StrategyKind,
    pub fitness: FitnessKind,
    pub out_dir: PathBuf,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        AssemblyConfig {
            min_length: DEFAULT_MIN_LENGTH,
            scoring: ScoringConfig::default(),
            strand_iterations: DEFAULT_STRAND_ITERATIONS,
            ga: GaParams::default(),
            sweep_runs: None,
            strategy: StrategyKind::default(),
            fitness: FitnessKind::default(),
            out_dir: PathBuf::from("."),
        }
    }
}

impl AssemblyConfig {
    /// Create a new configuration from CLI arguments
    pub fn from_args(args: &AssemblyArgs) -> Result<Self> {
        validate_args(args)?;

        let out_dir = if args.out_dir.is_absolute() {
            args.out_dir.clone()
        } else {
            std::env::current_dir()?.join(&args.out_dir)
        };

        let ga = GaParams {
            population_size: args.population,
            generations: args.generations,
            mutation_rate: args.mutation_rate,
            crossover_rate: args.crossover_rate,
            seed: args.seed,
            stall_generations: args.stall,
        };
        ga.validate()?;

        Ok(AssemblyConfig {
            min_length: args.min_length,
            scoring: ScoringConfig {
                error_rate: args.error_rate,
                error_model: args.error_model,
                min_overlap: args.min_overlap,
            },
            strand_iterations: args.strand_iterations,
            ga,
            sweep_runs: args.sweep,
            strategy: args.strategy,
            fitness: args.fitness,
            out_dir,
        })
    }

    /// Search description for logging
    pub fn strategy_description(&self) -> String {
        match (self.strategy, self.sweep_runs) {
            (StrategyKind::Greedy, _) => format!("greedy chaining ({:?} fitness)", self.fitness),
            (StrategyKind::Ga, Some(runs)) => format!("GA sweep of {runs} runs ({:?} fitness)", self.fitness),
            (StrategyKind::Ga, None) => format!("GA ({}, {:?} fitness)", self.ga, self.fitness),
        }
    }
}

fn validate_args(args: &AssemblyArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(anyhow::anyhow!(
            "Input file does not exist: {}",
            args.input.display()
        ));
    }

    if !(0.0..1.0).contains(&args.error_rate) {
        return Err(anyhow::anyhow!(
            "error-rate ({}) must be at least 0 and below 1",
            args.error_rate
        ));
    }

    if args.sweep == Some(0) {
        return Err(anyhow::anyhow!("sweep must be greater than 0 when given"));
    }

    if args.out_dir.exists() && !args.out_dir.is_dir() {
        return Err(anyhow::anyhow!(
            "Output path is not a directory: {}",
            args.out_dir.display()
        ));
    }

    Ok(())
}
