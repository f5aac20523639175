use crate::error::{AssemblyError, Result};
use std::fmt;

/// A DNA read over {A, C, G, T}.
///
/// Fragments are identified by their index in a fragment set and are never
/// mutated once loaded, only filtered out or reordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fragment(Vec<u8>);

impl Fragment {
    /// Build a fragment from raw bytes, uppercasing and validating every base
    pub fn new(seq: &[u8]) -> Result<Self> {
        let seq: Vec<u8> = seq.iter().map(|b| b.to_ascii_uppercase()).collect();
        validate(&seq)?;
        Ok(Fragment(seq))
    }

    /// Wrap bytes without validation. Scoring and transforms still check
    /// every symbol they touch.
    pub fn from_unchecked(seq: Vec<u8>) -> Self {
        Fragment(seq)
    }

    pub fn seq(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `self` occurs as an exact substring of `other`
    pub fn is_substring_of(&self, other: &Fragment) -> bool {
        is_substring(&self.0, &other.0)
    }

    pub fn reverse_complement(&self) -> Result<Fragment> {
        reverse_complement(self)
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl std::str::FromStr for Fragment {
    type Err = AssemblyError;

    fn from_str(s: &str) -> Result<Self> {
        Fragment::new(s.as_bytes())
    }
}

impl AsRef<[u8]> for Fragment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Fail on the first base outside {A, C, G, T}
pub fn validate(seq: &[u8]) -> Result<()> {
    match seq.iter().position(|b| !is_base(*b)) {
        Some(position) => Err(AssemblyError::InvalidSymbol {
            symbol: seq[position],
            position,
        }),
        None => Ok(()),
    }
}

#[inline]
pub fn is_base(b: u8) -> bool {
    matches!(b, b'A' | b'C' | b'G' | b'T')
}

#[inline]
fn complement(base: u8, position: usize) -> Result<u8> {
    match base {
        b'A' => Ok(b'T'),
        b'T' => Ok(b'A'),
        b'G' => Ok(b'C'),
        b'C' => Ok(b'G'),
        symbol => Err(AssemblyError::InvalidSymbol { symbol, position }),
    }
}

/// Compute the reverse complement of a DNA fragment.
/// Ambiguous bases are rejected, not kept or substituted.
pub fn reverse_complement(fragment: &Fragment) -> Result<Fragment> {
    let seq = fragment.seq();
    let mut out = Vec::with_capacity(seq.len());
    for (position, &base) in seq.iter().enumerate().rev() {
        out.push(complement(base, position)?);
    }
    Ok(Fragment(out))
}

pub(crate) fn is_substring(sub: &[u8], main: &[u8]) -> bool {
    if sub.is_empty() {
        return true;
    }
    if sub.len() > main.len() {
        return false;
    }
    main.windows(sub.len()).any(|window| window == sub)
}

/// Parse a list of string literals into fragments
pub fn fragments_from_strs<S: AsRef<str>>(seqs: &[S]) -> Result<Vec<Fragment>> {
    seqs.iter().map(|s| s.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(s: &str) -> Fragment {
        s.parse().unwrap()
    }

    #[test]
    fn test_reverse_complement_palindrome() {
        assert_eq!(reverse_complement(&frag("ACGT")).unwrap(), frag("ACGT"));
    }

    #[test]
    fn test_reverse_complement_involution() {
        for s in ["", "A", "AAACCC", "GATTACA", "CCCGGGTTTAAAC"] {
            let f = frag(s);
            let rc = reverse_complement(&f).unwrap();
            assert_eq!(rc.len(), f.len());
            assert!(rc.seq().iter().all(|b| is_base(*b)));
            assert_eq!(reverse_complement(&rc).unwrap(), f);
        }
        assert_eq!(frag("AAACCC").reverse_complement().unwrap(), frag("GGGTTT"));
    }

    #[test]
    fn test_reverse_complement_rejects_ambiguous_base() {
        let f = Fragment::from_unchecked(b"ACNT".to_vec());
        match reverse_complement(&f) {
            Err(AssemblyError::InvalidSymbol { symbol, position }) => {
                assert_eq!(symbol, b'N');
                assert_eq!(position, 2);
            }
            other => panic!("expected InvalidSymbol, got {:?}", other),
        }
    }

    #[test]
    fn test_new_uppercases_and_validates() {
        assert_eq!(Fragment::new(b"acgt").unwrap().seq(), b"ACGT");
        assert!(Fragment::new(b"ACGU").is_err());
        assert!("AC GT".parse::<Fragment>().is_err());
    }

    #[test]
    fn test_is_substring_of() {
        assert!(frag("CCC").is_substring_of(&frag("AAACCCGGG")));
        assert!(!frag("CCCC").is_substring_of(&frag("AAACCCGGG")));
        assert!(frag("AAACCCGGG").is_substring_of(&frag("AAACCCGGG")));
    }
}
