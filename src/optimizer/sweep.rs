use super::{FitnessKind, GaParams, GeneticOptimizer, RunContext, Solution, Strategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Best run of a parameter sweep and the parameters that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub solution: Solution,
    pub params: GaParams,
}

/// Draw one set of GA knobs: crossover 0.20-0.95 in steps of 0.05, mutation
/// 0.00-0.14 in steps of 0.01, population 10-140 in steps of 10.
fn draw_params(base: &GaParams, rng: &mut StdRng) -> GaParams {
    GaParams {
        crossover_rate: rng.gen_range(4..20) as f64 * 0.05,
        mutation_rate: rng.gen_range(0..15) as f64 / 100.0,
        population_size: rng.gen_range(1..15) * 10,
        seed: rng.gen(),
        ..base.clone()
    }
}

/// Repeat the genetic search `runs` times with randomly drawn parameters and
/// keep the best result. Ties keep the earlier run.
pub fn sweep(ctx: &RunContext, runs: usize, base: &GaParams, fitness: FitnessKind) -> SweepResult {
    let mut rng = StdRng::seed_from_u64(base.seed);
    let mut best: Option<SweepResult> = None;

    for run in 0..runs.max(1) {
        let params = draw_params(base, &mut rng);
        let solution = GeneticOptimizer::new(params.clone())
            .with_fitness(fitness.boxed())
            .search(ctx);
        info!("sweep run {}: score {} ({params})", run + 1, solution.score);

        if best.as_ref().map_or(true, |b| solution.score > b.solution.score) {
            best = Some(SweepResult { solution, params });
        }
    }

    // runs.max(1) guarantees one iteration
    best.unwrap_or_else(|| SweepResult {
        solution: Solution::trivial(ctx.len()),
        params: base.clone(),
    })
}
