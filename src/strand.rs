//! Sense / antisense classification.
//!
//! Every pass rebuilds both weight matrices from the current survivors and
//! drops fragments whose reverse complement fits the assembly better than
//! the fragment itself, in both the "first" and the "second" role of a pair:
//!
//! ```text
//! max_j R[i][j] > max_j S[i][j]  &&  max_j R[j][i] > max_j S[j][i]
//! ```
//!
//! Fragment 0 anchors the sense strand and is never dropped. Candidates are
//! removed in order of decreasing margin; a candidate whose best
//! reverse-complement partner was already dropped in the same pass waits for
//! the next pass, since its evidence came from that partner.

use crate::error::Result;
use crate::fragment::Fragment;
use crate::graph::{build_matrices, OverlapGraph};
use crate::overlap::ScoringConfig;
use tracing::{debug, info};

/// Outcome of strand classification
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Surviving fragments, in input order
    pub fragments: Vec<Fragment>,
    /// Fragments judged to belong to the opposite strand, in removal order
    pub antisense: Vec<Fragment>,
    /// Passes that were run
    pub passes: usize,
    /// True when the last pass removed nothing
    pub converged: bool,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    margin: i64,
}

/// Indices a single pass over `graph` would drop, in removal order
pub fn antisense_indices(graph: &OverlapGraph) -> Vec<usize> {
    let (sense, rev_comp) = (&graph.sense, &graph.rev_comp);

    let mut candidates: Vec<Candidate> = (1..graph.len())
        .filter_map(|i| {
            let first = rev_comp.row_max(i) - sense.row_max(i);
            let second = rev_comp.col_max(i) - sense.col_max(i);
            (first > 0 && second > 0).then_some(Candidate {
                index: i,
                margin: first + second,
            })
        })
        .collect();
    // stable: equal margins keep index order
    candidates.sort_by(|a, b| b.margin.cmp(&a.margin));

    let mut removed: Vec<usize> = Vec::with_capacity(candidates.len());
    for Candidate { index, .. } in candidates {
        let supported_by_removed = rev_comp
            .row_argmax(index)
            .into_iter()
            .chain(rev_comp.col_argmax(index))
            .any(|k| removed.contains(&k));
        if !supported_by_removed {
            removed.push(index);
        }
    }
    removed
}

/// Run exactly `iterations` classification passes, stopping early once a
/// pass removes nothing since later passes would be identical.
pub fn classify_strands(
    fragments: &[Fragment],
    iterations: usize,
    config: &ScoringConfig,
) -> Result<Vec<Fragment>> {
    Ok(classify(fragments, iterations, config)?.fragments)
}

/// Iterate until a pass removes nothing or `max_iterations` passes have run
pub fn classify_until_stable(
    fragments: &[Fragment],
    max_iterations: usize,
    config: &ScoringConfig,
) -> Result<Classification> {
    classify(fragments, max_iterations, config)
}

fn classify(
    fragments: &[Fragment],
    max_passes: usize,
    config: &ScoringConfig,
) -> Result<Classification> {
    let mut survivors: Vec<Fragment> = fragments.to_vec();
    let mut antisense = Vec::new();
    let mut passes = 0;
    let mut converged = false;

    while passes < max_passes {
        passes += 1;
        let graph = build_matrices(&survivors, config)?;
        let removed = antisense_indices(&graph);
        debug!("strand pass {passes}: {} of {} fragments flagged", removed.len(), survivors.len());
        if removed.is_empty() {
            converged = true;
            break;
        }

        for &i in &removed {
            antisense.push(survivors[i].clone());
        }
        survivors = survivors
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !removed.contains(i))
            .map(|(_, f)| f)
            .collect();
    }

    info!(
        "strand classification: {} -> {} fragments in {passes} passes ({} antisense)",
        fragments.len(),
        survivors.len(),
        antisense.len()
    );

    Ok(Classification {
        fragments: survivors,
        antisense,
        passes,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::fragments_from_strs;

    const GENOME: &str = "ATGCGTACCTTGAGCAAGTCCGATTGCAGTAACGGATCTG";

    fn sense(range: std::ops::Range<usize>) -> Fragment {
        GENOME[range].parse().unwrap()
    }

    fn antisense(range: std::ops::Range<usize>) -> Fragment {
        sense(range).reverse_complement().unwrap()
    }

    fn tiled() -> Vec<Fragment> {
        vec![sense(0..16), sense(10..26), sense(20..36)]
    }

    #[test]
    fn test_antisense_fragment_removed() {
        let mut fragments = tiled();
        fragments.push(antisense(5..21));
        let graph = build_matrices(&fragments, &ScoringConfig::default()).unwrap();
        // fragment 1 is also flagged but only through fragment 3
        assert_eq!(antisense_indices(&graph), vec![3]);

        let kept = classify_strands(&fragments, 5, &ScoringConfig::default()).unwrap();
        assert_eq!(kept, tiled());
    }

    #[test]
    fn test_two_antisense_fragments_in_one_pass() {
        let mut fragments = tiled();
        fragments.push(antisense(5..21));
        fragments.push(antisense(14..30));

        let single = classify_strands(&fragments, 1, &ScoringConfig::default()).unwrap();
        assert_eq!(single, tiled());

        let result = classify_until_stable(&fragments, 10, &ScoringConfig::default()).unwrap();
        assert_eq!(result.fragments, tiled());
        assert_eq!(result.antisense, vec![antisense(5..21), antisense(14..30)]);
        assert_eq!(result.passes, 2);
        assert!(result.converged);
    }

    #[test]
    fn test_all_sense_fragments_kept() {
        let mut fragments = tiled();
        fragments.push(sense(26..40));
        let result = classify_until_stable(&fragments, 5, &ScoringConfig::default()).unwrap();
        assert_eq!(result.fragments, fragments);
        assert!(result.antisense.is_empty());
        assert_eq!(result.passes, 1);
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let mut fragments = tiled();
        fragments.push(antisense(5..21));
        let result = classify_until_stable(&fragments, 0, &ScoringConfig::default()).unwrap();
        assert_eq!(result.fragments, fragments);
        assert_eq!(result.passes, 0);
        assert!(!result.converged);
    }

    #[test]
    fn test_anchor_fragment_never_removed() {
        // fragment 0 is the reverse complement of the rest of the chain
        let fragments = vec![antisense(0..16), sense(10..26), sense(20..36)];
        let kept = classify_strands(&fragments, 5, &ScoringConfig::default()).unwrap();
        assert_eq!(kept[0], fragments[0]);
    }

    #[test]
    fn test_degenerate_sets() {
        assert!(classify_strands(&[], 3, &ScoringConfig::default()).unwrap().is_empty());
        let one = fragments_from_strs(&["ACGT"]).unwrap();
        assert_eq!(classify_strands(&one, 3, &ScoringConfig::default()).unwrap(), one);
    }
}
