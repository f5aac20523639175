use super::{
    is_permutation, ChainedOverlap, Crossover, Fitness, Initializer, Mutation, OrderCrossover,
    RunContext, Scored, Selection, ShuffleInitializer, Solution, Strategy, SwapMutation,
    TournamentSelection, Tour,
};
use crate::error::{AssemblyError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, info, trace};

/// How often the best score is reported
const REPORT_EVERY: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct GaParams {
    pub population_size: usize,
    pub generations: usize,
    /// Per-position swap probability
    pub mutation_rate: f64,
    /// Probability that a selected pair is recombined rather than copied
    pub crossover_rate: f64,
    pub seed: u64,
    /// Stop once the best score has not improved for this many generations
    pub stall_generations: Option<usize>,
}

impl Default for GaParams {
    fn default() -> Self {
        GaParams {
            population_size: 80,
            generations: 5000,
            mutation_rate: 0.03,
            crossover_rate: 1.0,
            seed: 0,
            stall_generations: None,
        }
    }
}

impl GaParams {
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(AssemblyError::InvalidConfig(format!(
                "population size ({}) must be at least 2",
                self.population_size
            )));
        }
        for (name, rate) in [
            ("mutation rate", self.mutation_rate),
            ("crossover rate", self.crossover_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(AssemblyError::InvalidConfig(format!(
                    "{name} ({rate}) must be between 0 and 1"
                )));
            }
        }
        if self.stall_generations == Some(0) {
            return Err(AssemblyError::InvalidConfig(
                "stall generations must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for GaParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pop size: {}, Crossover rate: {}, Mutation rate: {}",
            self.population_size, self.crossover_rate, self.mutation_rate
        )
    }
}

/// Lifecycle of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Initialized,
    Evolving { generation: usize },
    Converged,
}

/// Population-based search assembled from swappable operators
pub struct GeneticOptimizer {
    params: GaParams,
    initializer: Box<dyn Initializer>,
    fitness: Box<dyn Fitness>,
    crossover: Box<dyn Crossover>,
    mutation: Box<dyn Mutation>,
    selection: Box<dyn Selection>,
}

impl GeneticOptimizer {
    /// Random initial tours, chained overlap fitness, OX, swap mutation and
    /// binary tournaments
    pub fn new(params: GaParams) -> Self {
        GeneticOptimizer::from_parts(
            params,
            Box::new(ShuffleInitializer),
            Box::new(ChainedOverlap),
            Box::new(OrderCrossover),
            Box::new(SwapMutation),
            Box::new(TournamentSelection::default()),
        )
    }

    pub fn from_parts(
        params: GaParams,
        initializer: Box<dyn Initializer>,
        fitness: Box<dyn Fitness>,
        crossover: Box<dyn Crossover>,
        mutation: Box<dyn Mutation>,
        selection: Box<dyn Selection>,
    ) -> Self {
        GeneticOptimizer {
            params,
            initializer,
            fitness,
            crossover,
            mutation,
            selection,
        }
    }

    pub fn with_fitness(mut self, fitness: Box<dyn Fitness>) -> Self {
        self.fitness = fitness;
        self
    }

    pub fn params(&self) -> &GaParams {
        &self.params
    }

    fn evaluate(&self, ctx: &RunContext, population: Vec<Tour>) -> Vec<Scored> {
        population
            .into_par_iter()
            .map(|tour| {
                let fitness = self.fitness.fitness(ctx, &tour);
                Scored { tour, fitness }
            })
            .collect()
    }

    fn breed(&self, scored: &[Scored], elite: &Scored, rng: &mut StdRng) -> Vec<Tour> {
        let size = scored.len();
        let crossover_rate = self.params.crossover_rate.clamp(0.0, 1.0);
        let mut next: Vec<Tour> = Vec::with_capacity(size);
        next.push(elite.tour.clone());

        while next.len() < size {
            let first = &self.selection.select(scored, rng).tour;
            let second = &self.selection.select(scored, rng).tour;
            let (a, b) = if rng.gen_bool(crossover_rate) {
                self.crossover.crossover(first, second, rng)
            } else {
                (first.clone(), second.clone())
            };
            for mut child in [a, b] {
                if next.len() == size {
                    break;
                }
                self.mutation.mutate(&mut child, self.params.mutation_rate, rng);
                next.push(child);
            }
        }
        next
    }
}

impl fmt::Debug for GeneticOptimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneticOptimizer")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// First individual with the highest fitness
fn fittest(scored: &[Scored]) -> &Scored {
    let mut best = &scored[0];
    for candidate in &scored[1..] {
        if candidate.fitness > best.fitness {
            best = candidate;
        }
    }
    best
}

impl Strategy for GeneticOptimizer {
    fn name(&self) -> &'static str {
        "genetic"
    }

    fn search(&self, ctx: &RunContext) -> Solution {
        let n = ctx.len();
        if n < 2 {
            return Solution::trivial(n);
        }

        let params = &self.params;
        let mut rng = StdRng::seed_from_u64(params.seed);
        let size = params.population_size.max(2);
        let mut population: Vec<Tour> = (0..size)
            .map(|_| self.initializer.initialize(n, &mut rng))
            .collect();
        let mut state = RunState::Initialized;
        debug!("{state:?}: {n} fragments, {params}");

        let mut scored = self.evaluate(ctx, population);
        let mut best = fittest(&scored).clone();
        let mut stalled_for = 0;
        let mut generation = 0;
        loop {
            if generation % REPORT_EVERY == 0 {
                info!("generation {generation}: best score {}", best.fitness);
            }
            if generation >= params.generations
                || params.stall_generations.is_some_and(|limit| stalled_for >= limit)
            {
                break;
            }

            state = RunState::Evolving { generation };
            trace!("{state:?}");
            population = self.breed(&scored, fittest(&scored), &mut rng);
            debug_assert!(population.iter().all(|tour| is_permutation(tour, n)));
            generation += 1;

            scored = self.evaluate(ctx, population);
            let contender = fittest(&scored);
            if contender.fitness > best.fitness {
                best = contender.clone();
                stalled_for = 0;
            } else {
                stalled_for += 1;
            }
        }

        state = RunState::Converged;
        debug!("{state:?} after {generation} generations: best score {}", best.fitness);

        Solution {
            tour: best.tour,
            score: best.fitness,
            generations: generation,
        }
    }
}
