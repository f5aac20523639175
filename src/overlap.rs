//! Error-tolerant suffix/prefix overlap scoring.
//!
//! `score(a, b)` scans candidate start offsets `p` of `a` from its end toward
//! its start and aligns `a[p..]` against the prefix of `b` over the shorter of
//! the two remaining lengths. Each candidate has its own mismatch budget that
//! grows with the window, so long overlaps tolerate a few sequencing errors
//! while short ones must match exactly.

use crate::error::Result;
use crate::fragment::{validate, Fragment};
use clap::ValueEnum;

/// Default fraction of a window allowed to mismatch
pub const DEFAULT_ERROR_RATE: f64 = 0.05;

/// How the mismatch budget of one candidate window is derived from its length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ErrorModel {
    /// `budget = window * rate`
    #[default]
    Linear,
    /// `budget = ceil(sqrt(window) * rate)`
    Sqrt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub error_rate: f64,
    pub error_model: ErrorModel,
    /// Best matches shorter than this are reported as no overlap
    pub min_overlap: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            error_rate: DEFAULT_ERROR_RATE,
            error_model: ErrorModel::Linear,
            min_overlap: 0,
        }
    }
}

impl ScoringConfig {
    /// Exact matching only
    pub fn exact() -> Self {
        ScoringConfig {
            error_rate: 0.0,
            ..Default::default()
        }
    }

    /// Mismatch count at which a candidate of `window` bases is abandoned
    pub fn budget(&self, window: usize) -> f64 {
        match self.error_model {
            ErrorModel::Linear => window as f64 * self.error_rate,
            ErrorModel::Sqrt => ((window as f64).sqrt() * self.error_rate).ceil(),
        }
    }
}

/// Best overlap of a suffix of `a` with a prefix of `b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlapScore {
    /// Number of matching bases in the winning alignment
    pub matched: usize,
    /// Where the winning suffix starts in `a`; `len(a)` when nothing matched
    pub offset: usize,
}

impl OverlapScore {
    pub fn none(a_len: usize) -> Self {
        OverlapScore {
            matched: 0,
            offset: a_len,
        }
    }

    pub fn is_overlap(&self) -> bool {
        self.matched > 0
    }
}

/// Score the overlap of `a`'s suffix against `b`'s prefix.
///
/// Not symmetric: `score(a, b)` and `score(b, a)` answer different questions.
pub fn score(a: &Fragment, b: &Fragment, config: &ScoringConfig) -> Result<OverlapScore> {
    score_seqs(a.seq(), b.seq(), config)
}

/// Same as [`score`] over raw bytes. Both inputs are validated first so a
/// malformed base never yields a silently wrong score.
pub fn score_seqs(a: &[u8], b: &[u8], config: &ScoringConfig) -> Result<OverlapScore> {
    validate(a)?;
    validate(b)?;
    Ok(align(a, b, config))
}

/// Scoring core over sequences already known to be valid
pub(crate) fn align(a: &[u8], b: &[u8], config: &ScoringConfig) -> OverlapScore {
    let mut best = OverlapScore::none(a.len());

    for p in (0..a.len()).rev() {
        let window = (a.len() - p).min(b.len());
        // a window can never hold more matches than its length
        if window <= best.matched {
            continue;
        }
        if let Some(matches) = count_matches(&a[p..p + window], &b[..window], config.budget(window)) {
            if matches > best.matched {
                best = OverlapScore {
                    matched: matches,
                    offset: p,
                };
            }
        }
    }

    if best.matched < config.min_overlap {
        return OverlapScore::none(a.len());
    }
    best
}

/// Matches over two equal-length windows, or None once mismatches reach the budget
#[inline]
fn count_matches(x: &[u8], y: &[u8], budget: f64) -> Option<usize> {
    let mut matches = 0;
    let mut mismatches = 0usize;
    for (a, b) in x.iter().zip(y) {
        if a == b {
            matches += 1;
        } else {
            mismatches += 1;
            if mismatches as f64 >= budget {
                return None;
            }
        }
    }
    Some(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssemblyError;

    fn frag(s: &str) -> Fragment {
        s.parse().unwrap()
    }

    fn score_str(a: &str, b: &str) -> OverlapScore {
        score(&frag(a), &frag(b), &ScoringConfig::default()).unwrap()
    }

    #[test]
    fn test_exact_suffix_prefix() {
        assert_eq!(score_str("AAACCC", "CCCGGG"), OverlapScore { matched: 3, offset: 3 });
        assert_eq!(score_str("CCCGGG", "GGGTTT"), OverlapScore { matched: 3, offset: 3 });
        // reversed order finds nothing
        assert_eq!(score_str("CCCGGG", "AAACCC"), OverlapScore::none(6));
    }

    #[test]
    fn test_no_overlap_offset_is_length() {
        let s = score_str("AAAA", "CCCC");
        assert_eq!(s.matched, 0);
        assert_eq!(s.offset, 4);
        assert!(!s.is_overlap());
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(score_str("", "ACGT"), OverlapScore::none(0));
        assert_eq!(score_str("ACGT", ""), OverlapScore::none(4));
        assert_eq!(score_str("", ""), OverlapScore::none(0));
    }

    #[test]
    fn test_containment() {
        // b sits entirely inside a
        assert_eq!(score_str("AAACCCGGG", "CCC"), OverlapScore { matched: 3, offset: 3 });
        // a is a prefix of b
        assert_eq!(score_str("ACG", "ACGTTT"), OverlapScore { matched: 3, offset: 0 });
    }

    #[test]
    fn test_ties_keep_first_found() {
        // b matches at offsets 4 and 0; scanning from the end finds 4 first
        assert_eq!(score_str("CCCACCC", "CCC"), OverlapScore { matched: 3, offset: 4 });
    }

    #[test]
    fn test_mismatch_tolerance_scales_with_window() {
        let repeat = "ACGT".repeat(10);
        let a = format!("GGGGG{repeat}");
        let mut b = repeat.clone().into_bytes();
        b[20] = b'T'; // was 'A'
        let b = format!("{}TTTTT", String::from_utf8(b).unwrap());

        // a 40 base window may hold one mismatch at 5%
        let tolerant = score(&frag(&a), &frag(&b), &ScoringConfig::default()).unwrap();
        assert_eq!(tolerant, OverlapScore { matched: 39, offset: 5 });

        // exact matching falls back to the longest clean period-aligned suffix
        let exact = score(&frag(&a), &frag(&b), &ScoringConfig::exact()).unwrap();
        assert_eq!(exact, OverlapScore { matched: 20, offset: 25 });
    }

    #[test]
    fn test_sqrt_budget() {
        let config = ScoringConfig {
            error_rate: 1.0,
            error_model: ErrorModel::Sqrt,
            min_overlap: 0,
        };
        assert_eq!(config.budget(16), 4.0);
        assert_eq!(config.budget(10), 4.0);
        assert_eq!(ScoringConfig::default().budget(40), 2.0);
        // one mismatch in eight bases survives a budget of ceil(sqrt(8)) = 3
        let s = score(&frag("TTTTACGTACGA"), &frag("ACGTACGTGG"), &config).unwrap();
        assert_eq!(s.matched, 7);
        assert_eq!(s.offset, 4);
    }

    #[test]
    fn test_min_overlap() {
        let config = ScoringConfig {
            min_overlap: 4,
            ..Default::default()
        };
        let s = score(&frag("AAACCC"), &frag("CCCGGG"), &config).unwrap();
        assert_eq!(s, OverlapScore::none(6));
    }

    #[test]
    fn test_matched_length_bounds() {
        let seqs = ["", "A", "ACGT", "AAACCC", "CCCGGG", "GATTACA", "TTTTTTTT", "ACGTACGTAC"];
        for a in seqs {
            for b in seqs {
                let s = score_str(a, b);
                assert!(s.matched <= a.len().min(b.len()), "{a} vs {b}: {s:?}");
                assert!(s.offset <= a.len());
            }
        }
    }

    #[test]
    fn test_invalid_symbol_is_surfaced() {
        let bad = Fragment::from_unchecked(b"ACGN".to_vec());
        let err = score(&bad, &frag("ACGT"), &ScoringConfig::default()).unwrap_err();
        assert!(matches!(err, AssemblyError::InvalidSymbol { symbol: b'N', position: 3 }));
        let err = score(&frag("ACGT"), &bad, &ScoringConfig::default()).unwrap_err();
        assert!(matches!(err, AssemblyError::InvalidSymbol { .. }));
    }
}
