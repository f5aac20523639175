use crate::config::{AssemblyArgs, AssemblyConfig, StrategyKind};
use crate::error::Result;
use crate::filter::dedupe;
use crate::fragment::Fragment;
use crate::graph::{build_matrices, OverlapGraph};
use crate::io::{
    read_fragments, write_assembly, write_fragments, write_layout_csv, write_matrix, write_tour,
};
use crate::layout::Layout;
use crate::optimizer::{
    sweep, GaParams, GeneticOptimizer, GreedyChain, RunContext, Solution, Strategy,
};
use crate::strand::classify_until_stable;
use std::time::Instant;
use tracing::{info, warn};

/// Everything one assembly run produced
#[derive(Debug, Clone)]
pub struct AssemblyOutput {
    /// Fragments that were ordered, after redundancy and strand filtering
    pub fragments: Vec<Fragment>,
    /// Fragments dropped as belonging to the opposite strand
    pub antisense: Vec<Fragment>,
    pub graph: OverlapGraph,
    pub solution: Solution,
    pub layout: Layout,
    /// GA parameters behind `solution`; None for non-genetic searches
    pub params: Option<GaParams>,
}

/// Filter, classify, score and order `fragments`, then lay out the result
pub fn assemble(fragments: Vec<Fragment>, config: &AssemblyConfig) -> Result<AssemblyOutput> {
    let loaded = fragments.len();
    let fragments = dedupe(&fragments);
    info!("redundancy filter: {loaded} -> {} fragments", fragments.len());

    let classification = classify_until_stable(&fragments, config.strand_iterations, &config.scoring)?;
    if !classification.converged && config.strand_iterations > 0 {
        warn!(
            "strand classification still removing fragments after {} passes",
            classification.passes
        );
    }
    let fragments = classification.fragments;

    let start = Instant::now();
    let graph = build_matrices(&fragments, &config.scoring)?;
    info!(
        "scored {n}x{n} overlap matrices in {:.2?}",
        start.elapsed(),
        n = graph.len()
    );

    let ctx = RunContext::new(&fragments, &graph, config.scoring.clone())?;
    info!("ordering {} fragments with {}", ctx.len(), config.strategy_description());
    let start = Instant::now();
    let (solution, params) = match (config.strategy, config.sweep_runs) {
        (StrategyKind::Greedy, _) => {
            let strategy = GreedyChain::new(config.fitness.boxed());
            (strategy.search(&ctx), None)
        }
        (StrategyKind::Ga, Some(runs)) => {
            let result = sweep(&ctx, runs, &config.ga, config.fitness);
            (result.solution, Some(result.params))
        }
        (StrategyKind::Ga, None) => {
            let strategy = GeneticOptimizer::new(config.ga.clone()).with_fitness(config.fitness.boxed());
            (strategy.search(&ctx), Some(config.ga.clone()))
        }
    };
    info!(
        "best score {} after {} generations in {:.2?}",
        solution.score,
        solution.generations,
        start.elapsed()
    );

    let layout = Layout::from_tour(&ctx, &solution.tour);
    info!("reconstructed {} bp from {} fragments", layout.span(), fragments.len());

    Ok(AssemblyOutput {
        fragments,
        antisense: classification.antisense,
        graph,
        solution,
        layout,
        params,
    })
}

/// Write every artifact of `output` into `config.out_dir`, creating it if needed
pub fn write_outputs(output: &AssemblyOutput, config: &AssemblyConfig) -> Result<()> {
    let dir = &config.out_dir;
    std::fs::create_dir_all(dir)?;
    write_matrix(&dir.join("overlap.txt"), &output.graph.sense)?;
    write_matrix(&dir.join("revcomp.txt"), &output.graph.rev_comp)?;
    write_fragments(&dir.join("fragments.txt"), &output.fragments)?;
    write_tour(&dir.join("alignmentOrder.txt"), &output.solution, output.params.as_ref())?;
    write_layout_csv(&dir.join("alignments.csv"), &output.layout, &output.fragments)?;
    write_assembly(&dir.join("assembly.fasta"), "assembly", &output.layout)?;
    info!("results written to {}", dir.display());
    Ok(())
}

/// Main entry point for the command line
pub fn run(args: &AssemblyArgs) -> anyhow::Result<()> {
    // Create configuration from arguments (includes validation)
    let config = AssemblyConfig::from_args(args)?;

    info!("Loading fragments from {}", args.input.display());
    let fragments = read_fragments(&args.input, config.min_length)?;
    info!("Loaded {} fragments longer than {} bp", fragments.len(), config.min_length);

    let output = assemble(fragments, &config)?;
    write_outputs(&output, &config)?;
    Ok(())
}
