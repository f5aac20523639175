use super::{ChainedOverlap, Fitness, RunContext, Solution, Strategy, Tour};
use rayon::prelude::*;
use std::fmt;

/// Nearest-neighbour chaining: from every start fragment, keep following the
/// heaviest edge to an unvisited fragment, then keep the fittest chain.
pub struct GreedyChain {
    fitness: Box<dyn Fitness>,
}

impl GreedyChain {
    pub fn new(fitness: Box<dyn Fitness>) -> Self {
        GreedyChain { fitness }
    }
}

impl Default for GreedyChain {
    fn default() -> Self {
        GreedyChain::new(Box::new(ChainedOverlap))
    }
}

impl fmt::Debug for GreedyChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreedyChain").finish_non_exhaustive()
    }
}

/// Chain starting at `start`; ties go to the lowest index
fn chain_from(ctx: &RunContext, start: usize) -> Tour {
    let n = ctx.len();
    let sense = &ctx.graph().sense;
    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n);
    let mut current = start;
    visited[current] = true;
    tour.push(current);

    while tour.len() < n {
        let mut next = None;
        let mut best_weight = i64::MIN;
        for j in (0..n).filter(|&j| !visited[j]) {
            let weight = sense.weight(current, j);
            if weight > best_weight {
                best_weight = weight;
                next = Some(j);
            }
        }
        let Some(next) = next else { break };
        visited[next] = true;
        tour.push(next);
        current = next;
    }
    tour
}

impl Strategy for GreedyChain {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn search(&self, ctx: &RunContext) -> Solution {
        let n = ctx.len();
        if n < 2 {
            return Solution::trivial(n);
        }

        let chains: Vec<(Tour, i64)> = (0..n)
            .into_par_iter()
            .map(|start| {
                let tour = chain_from(ctx, start);
                let fitness = self.fitness.fitness(ctx, &tour);
                (tour, fitness)
            })
            .collect();

        let mut best = &chains[0];
        for candidate in &chains[1..] {
            if candidate.1 > best.1 {
                best = candidate;
            }
        }
        Solution {
            tour: best.0.clone(),
            score: best.1,
            generations: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::test_support::{chain, shuffled_tiling};
    use crate::optimizer::{is_permutation, ShortestSpan};
    use crate::overlap::ScoringConfig;

    #[test]
    fn test_greedy_chain() {
        let (fragments, graph) = chain();
        let ctx = RunContext::new(&fragments, &graph, ScoringConfig::default()).unwrap();
        let solution = GreedyChain::default().search(&ctx);
        assert_eq!(solution.tour, vec![0, 1, 2]);
        assert_eq!(solution.score, 6);
    }

    #[test]
    fn test_greedy_tiling() {
        let (fragments, graph, expected) = shuffled_tiling();
        let ctx = RunContext::new(&fragments, &graph, ScoringConfig::default()).unwrap();
        for start in 0..fragments.len() {
            assert!(is_permutation(&chain_from(&ctx, start), fragments.len()));
        }
        let solution = GreedyChain::default().search(&ctx);
        assert_eq!(solution.tour, expected);
        assert_eq!(solution.score, 40);

        let span = GreedyChain::new(Box::new(ShortestSpan)).search(&ctx);
        assert_eq!(span.score, -40);
    }
}
