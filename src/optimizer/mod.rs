//! Fragment ordering search.
//!
//! Ordering the fragments is an open maximum-weight Hamiltonian path over the
//! sense overlap matrix. The search is heuristic: a [`Strategy`] gets a
//! [`RunContext`] owning everything one run needs and returns the best
//! [`Solution`] it saw.

pub mod fitness;
pub mod genetic;
pub mod greedy;
pub mod operators;
pub mod sweep;

use crate::error::{AssemblyError, Result};
use crate::fragment::{validate, Fragment};
use crate::graph::OverlapGraph;
use crate::overlap::{align, ScoringConfig};
use dashmap::DashMap;
use rand::rngs::StdRng;

pub use fitness::{ChainedOverlap, FitnessKind, ShortestSpan};
pub use genetic::{GaParams, GeneticOptimizer, RunState};
pub use greedy::GreedyChain;
pub use operators::{OrderCrossover, ShuffleInitializer, SwapMutation, TournamentSelection};
pub use sweep::{sweep, SweepResult};

/// A proposed assembly order: a permutation of fragment indices
pub type Tour = Vec<usize>;

/// Everything one optimizer run reads, plus the memo cache it fills.
///
/// The cache maps an ordered pair to the advance from the first fragment to
/// the second. It lives exactly as long as the context, so a new fragment set
/// always starts with an empty cache.
#[derive(Debug)]
pub struct RunContext<'a> {
    fragments: &'a [Fragment],
    graph: &'a OverlapGraph,
    scoring: ScoringConfig,
    memo: DashMap<(usize, usize), usize>,
}

impl<'a> RunContext<'a> {
    pub fn new(
        fragments: &'a [Fragment],
        graph: &'a OverlapGraph,
        scoring: ScoringConfig,
    ) -> Result<Self> {
        if fragments.len() != graph.len() {
            return Err(AssemblyError::InvalidConfig(format!(
                "{} fragments but a {n}x{n} overlap graph",
                fragments.len(),
                n = graph.len()
            )));
        }
        for fragment in fragments {
            validate(fragment.seq())?;
        }
        Ok(RunContext {
            fragments,
            graph,
            scoring,
            memo: DashMap::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn fragments(&self) -> &'a [Fragment] {
        self.fragments
    }

    pub fn graph(&self) -> &'a OverlapGraph {
        self.graph
    }

    /// Bases fragment `i` contributes before fragment `j` takes over: where
    /// the overlap with `j` starts in `i`, or all of `i` when they do not
    /// overlap.
    pub fn advance(&self, i: usize, j: usize) -> usize {
        if let Some(cached) = self.memo.get(&(i, j)) {
            return *cached;
        }
        let offset = align(self.fragments[i].seq(), self.fragments[j].seq(), &self.scoring).offset;
        // concurrent writers always store the same value for a key
        self.memo.insert((i, j), offset);
        offset
    }

    /// Length of the sequence a tour reconstructs: every advance along the
    /// tour plus the full length of the last fragment.
    pub fn evaluate(&self, tour: &[usize]) -> usize {
        match tour.last() {
            None => 0,
            Some(&last) => {
                tour.windows(2)
                    .map(|pair| self.advance(pair[0], pair[1]))
                    .sum::<usize>()
                    + self.fragments[last].len()
            }
        }
    }

    /// Sum of the sense overlap weights of consecutive pairs
    pub fn chained_overlap(&self, tour: &[usize]) -> i64 {
        tour.windows(2)
            .map(|pair| self.graph.sense.weight(pair[0], pair[1]))
            .sum()
    }

    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }
}

/// Best tour found by a search and its fitness
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub tour: Tour,
    pub score: i64,
    /// Generations evolved before the search stopped
    pub generations: usize,
}

impl Solution {
    /// Identity tour with score 0, returned when there is nothing to order
    pub fn trivial(n: usize) -> Self {
        Solution {
            tour: (0..n).collect(),
            score: 0,
            generations: 0,
        }
    }
}

/// A tour with its fitness
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub tour: Tour,
    pub fitness: i64,
}

/// Builds one starting individual
pub trait Initializer: Send + Sync {
    fn initialize(&self, n: usize, rng: &mut StdRng) -> Tour;
}

/// Higher is better
pub trait Fitness: Send + Sync {
    fn fitness(&self, ctx: &RunContext, tour: &[usize]) -> i64;
}

/// Recombines two parents into two children; children must be permutations
pub trait Crossover: Send + Sync {
    fn crossover(&self, first: &[usize], second: &[usize], rng: &mut StdRng) -> (Tour, Tour);
}

/// Perturbs a tour in place without breaking the permutation
pub trait Mutation: Send + Sync {
    fn mutate(&self, tour: &mut [usize], rate: f64, rng: &mut StdRng);
}

/// Picks a parent from a scored population
pub trait Selection: Send + Sync {
    fn select<'p>(&self, population: &'p [Scored], rng: &mut StdRng) -> &'p Scored;
}

/// A complete ordering search
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn search(&self, ctx: &RunContext) -> Solution;
}

/// True if `tour` holds every index in `0..n` exactly once
pub fn is_permutation(tour: &[usize], n: usize) -> bool {
    if tour.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &i in tour {
        if i >= n || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

/// Run the default genetic search with the given knobs
pub fn optimize(
    ctx: &RunContext,
    population_size: usize,
    mutation_rate: f64,
    crossover_rate: f64,
    generations: usize,
) -> Solution {
    let params = GaParams {
        population_size,
        mutation_rate,
        crossover_rate,
        generations,
        ..GaParams::default()
    };
    GeneticOptimizer::new(params).search(ctx)
}
