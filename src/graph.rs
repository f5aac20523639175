use crate::error::Result;
use crate::fragment::{reverse_complement, validate, Fragment};
use crate::overlap::{align, OverlapScore, ScoringConfig};
use rayon::prelude::*;

/// Weight read from a masked cell, below every valid overlap
pub const MASKED_WEIGHT: i64 = -1;

/// n x n table of overlap scores; cell (i, j) aligns the suffix of i against
/// the prefix of j. Masked cells (the diagonal) hold `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    rows: Vec<Vec<Option<OverlapScore>>>,
}

impl WeightMatrix {
    fn from_rows(rows: Vec<Vec<Option<OverlapScore>>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == rows.len()));
        WeightMatrix { rows }
    }

    pub fn empty() -> Self {
        WeightMatrix { rows: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&OverlapScore> {
        self.rows[i][j].as_ref()
    }

    /// Matched length of (i, j), or [`MASKED_WEIGHT`] for masked cells
    pub fn weight(&self, i: usize, j: usize) -> i64 {
        self.get(i, j)
            .map_or(MASKED_WEIGHT, |score| score.matched as i64)
    }

    /// Mask the diagonal so a fragment never wins a maximum search against itself
    pub fn mask_diagonal(&mut self) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row[i] = None;
        }
    }

    /// Best weight with `i` as the first element of a pair
    pub fn row_max(&self, i: usize) -> i64 {
        (0..self.len()).map(|j| self.weight(i, j)).max().unwrap_or(MASKED_WEIGHT)
    }

    /// Best weight with `j` as the second element of a pair
    pub fn col_max(&self, j: usize) -> i64 {
        (0..self.len()).map(|i| self.weight(i, j)).max().unwrap_or(MASKED_WEIGHT)
    }

    /// Every column achieving the row maximum of `i`
    pub fn row_argmax(&self, i: usize) -> Vec<usize> {
        let best = self.row_max(i);
        (0..self.len()).filter(|&j| self.weight(i, j) == best).collect()
    }

    /// Every row achieving the column maximum of `j`
    pub fn col_argmax(&self, j: usize) -> Vec<usize> {
        let best = self.col_max(j);
        (0..self.len()).filter(|&i| self.weight(i, j) == best).collect()
    }

    /// Row-major matched lengths, masked cells as [`MASKED_WEIGHT`]
    pub fn weights(&self) -> Vec<Vec<i64>> {
        (0..self.len())
            .map(|i| (0..self.len()).map(|j| self.weight(i, j)).collect())
            .collect()
    }
}

/// Sense-to-sense and reverse-complement-to-sense overlap weights over one fragment set
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapGraph {
    pub sense: WeightMatrix,
    pub rev_comp: WeightMatrix,
}

impl OverlapGraph {
    pub fn len(&self) -> usize {
        self.sense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sense.is_empty()
    }
}

/// Build both matrices by scoring every ordered pair. Rows are computed in
/// parallel and each worker owns the row it fills. A single malformed
/// fragment aborts the whole build.
pub fn build_matrices(fragments: &[Fragment], config: &ScoringConfig) -> Result<OverlapGraph> {
    if fragments.is_empty() {
        return Ok(OverlapGraph {
            sense: WeightMatrix::empty(),
            rev_comp: WeightMatrix::empty(),
        });
    }

    fragments.par_iter().try_for_each(|f| validate(f.seq()))?;
    let rev_comps: Vec<Fragment> = fragments
        .par_iter()
        .map(reverse_complement)
        .collect::<Result<_>>()?;

    let score_rows = |firsts: &[Fragment]| -> Vec<Vec<Option<OverlapScore>>> {
        firsts
            .par_iter()
            .map(|a| {
                fragments
                    .iter()
                    .map(|b| Some(align(a.seq(), b.seq(), config)))
                    .collect()
            })
            .collect()
    };

    let mut sense = WeightMatrix::from_rows(score_rows(fragments));
    let mut rev_comp = WeightMatrix::from_rows(score_rows(&rev_comps));
    sense.mask_diagonal();
    rev_comp.mask_diagonal();

    Ok(OverlapGraph { sense, rev_comp })
}
