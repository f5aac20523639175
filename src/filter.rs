use crate::fragment::Fragment;
use rayon::prelude::*;
use tracing::debug;

/// Default loader threshold: fragments at or below this length are dropped
pub const DEFAULT_MIN_LENGTH: usize = 3;

/// Drop fragments whose length is at or below `min_len`
pub fn filter_min_length(fragments: Vec<Fragment>, min_len: usize) -> Vec<Fragment> {
    let original_len = fragments.len();
    let kept: Vec<Fragment> = fragments
        .into_iter()
        .filter(|f| f.len() > min_len)
        .collect();
    if kept.len() != original_len {
        debug!(
            "length filter: {original_len} -> {} fragments (min length {min_len})",
            kept.len()
        );
    }
    kept
}

/// Remove every fragment that occurs as an exact substring of another one.
///
/// Identical copies contain each other; the first copy survives and later
/// ones are dropped. Relative order of the survivors is preserved.
pub fn dedupe(fragments: &[Fragment]) -> Vec<Fragment> {
    let kept: Vec<Fragment> = (0..fragments.len())
        .into_par_iter()
        .filter(|&i| !is_redundant(fragments, i))
        .map(|i| fragments[i].clone())
        .collect();

    let removed = fragments.len() - kept.len();
    if removed > 0 {
        debug!(
            "substring filter: {} -> {} fragments ({removed} removed)",
            fragments.len(),
            kept.len()
        );
    }
    kept
}

fn is_redundant(fragments: &[Fragment], i: usize) -> bool {
    let candidate = &fragments[i];
    fragments.iter().enumerate().any(|(j, other)| {
        if i == j || !candidate.is_substring_of(other) {
            return false;
        }
        // an identical copy only counts when it comes first
        candidate.len() < other.len() || j < i
    })
}
