use super::{Crossover, Initializer, Mutation, Scored, Selection, Tour};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Uniformly random permutation
#[derive(Debug, Clone, Copy, Default)]
pub struct ShuffleInitializer;

impl Initializer for ShuffleInitializer {
    fn initialize(&self, n: usize, rng: &mut StdRng) -> Tour {
        let mut tour: Tour = (0..n).collect();
        tour.shuffle(rng);
        tour
    }
}

/// Order crossover (OX): each child keeps a slice of one parent in place and
/// fills the remaining positions with the other parent's genes in their
/// relative order, starting after the slice.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderCrossover;

impl Crossover for OrderCrossover {
    fn crossover(&self, first: &[usize], second: &[usize], rng: &mut StdRng) -> (Tour, Tour) {
        let n = first.len();
        if n < 2 {
            return (first.to_vec(), second.to_vec());
        }
        let lo = rng.gen_range(0..n);
        let hi = rng.gen_range(lo + 1..=n);
        (
            order_crossover(first, second, lo, hi),
            order_crossover(second, first, lo, hi),
        )
    }
}

/// Child of OX keeping `keep[lo..hi]` in place; both parents must be
/// permutations of `0..n`
pub fn order_crossover(keep: &[usize], fill: &[usize], lo: usize, hi: usize) -> Tour {
    let n = keep.len();
    let mut child = vec![0; n];
    let mut used = vec![false; n];
    for k in lo..hi {
        child[k] = keep[k];
        used[keep[k]] = true;
    }

    let mut free = (hi..n).chain(0..lo);
    for &gene in fill[hi..].iter().chain(&fill[..hi]) {
        if used[gene] {
            continue;
        }
        used[gene] = true;
        if let Some(pos) = free.next() {
            child[pos] = gene;
        }
    }
    child
}

/// Each position is swapped with a random partner with probability `rate`
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapMutation;

impl Mutation for SwapMutation {
    fn mutate(&self, tour: &mut [usize], rate: f64, rng: &mut StdRng) {
        let rate = rate.clamp(0.0, 1.0);
        if tour.len() < 2 || rate == 0.0 {
            return;
        }
        for i in 0..tour.len() {
            if rng.gen_bool(rate) {
                let j = rng.gen_range(0..tour.len());
                tour.swap(i, j);
            }
        }
    }
}

/// Best of `size` uniformly drawn individuals
#[derive(Debug, Clone, Copy)]
pub struct TournamentSelection {
    pub size: usize,
}

impl Default for TournamentSelection {
    fn default() -> Self {
        TournamentSelection { size: 2 }
    }
}

impl Selection for TournamentSelection {
    fn select<'p>(&self, population: &'p [Scored], rng: &mut StdRng) -> &'p Scored {
        let mut best = &population[rng.gen_range(0..population.len())];
        for _ in 1..self.size.max(1) {
            let challenger = &population[rng.gen_range(0..population.len())];
            if challenger.fitness > best.fitness {
                best = challenger;
            }
        }
        best
    }
}
