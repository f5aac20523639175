use super::{Fitness, RunContext};
use clap::ValueEnum;

/// Total overlap chained along the tour
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainedOverlap;

impl Fitness for ChainedOverlap {
    fn fitness(&self, ctx: &RunContext, tour: &[usize]) -> i64 {
        ctx.chained_overlap(tour)
    }
}

/// Negated length of the reconstructed sequence, so shorter assemblies win
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestSpan;

impl Fitness for ShortestSpan {
    fn fitness(&self, ctx: &RunContext, tour: &[usize]) -> i64 {
        -(ctx.evaluate(tour) as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FitnessKind {
    /// Maximize the summed overlap of consecutive fragments
    #[default]
    Overlap,
    /// Minimize the length of the reconstructed sequence
    Span,
}

impl FitnessKind {
    pub fn boxed(self) -> Box<dyn Fitness> {
        match self {
            FitnessKind::Overlap => Box::new(ChainedOverlap),
            FitnessKind::Span => Box::new(ShortestSpan),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::test_support::chain;
    use crate::overlap::ScoringConfig;

    #[test]
    fn test_fitness_ranks_chain_first() {
        let (fragments, graph) = chain();
        let ctx = RunContext::new(&fragments, &graph, ScoringConfig::default()).unwrap();
        for kind in [FitnessKind::Overlap, FitnessKind::Span] {
            let fitness = kind.boxed();
            let best = fitness.fitness(&ctx, &[0, 1, 2]);
            for tour in [[0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
                assert!(fitness.fitness(&ctx, &tour) < best, "{kind:?} {tour:?}");
            }
        }
        assert_eq!(ShortestSpan.fitness(&ctx, &[0, 1, 2]), -12);
        assert_eq!(ChainedOverlap.fitness(&ctx, &[0, 1, 2]), 6);
    }
}
