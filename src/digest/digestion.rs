use crate::errors::Result;
use regex::Regex;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestionEnd {
    CTerm,
    NTerm,
}

#[derive(Debug, Clone)]
pub struct DigestionPattern {
    pub regex: Regex,
    pub skip_suffix: Option<char>,
    pub skip_prefix: Option<char>,
}

impl DigestionPattern {
    /// Builds a pattern cleaving at any of `residues`.
    pub fn from_residues(residues: &str, skip_suffix: Option<char>) -> Result<Self> {
        let regex = Regex::new(&format!("[{}]", regex::escape(residues)))?;
        Ok(DigestionPattern {
            regex,
            skip_suffix,
            skip_prefix: None,
        })
    }

    pub fn trypsin() -> Self {
        Self::from_residues("KR", Some('P')).expect("trypsin pattern is a valid regex")
    }

    pub fn trypsin_norestriction() -> Self {
        Self::from_residues("KR", None).expect("trypsin pattern is a valid regex")
    }
}

/// In-silico digestion used to estimate how many peptides a protein could
/// produce. Only the fragment count feeds the abundance estimate.
#[derive(Debug, Clone)]
pub struct DigestionParameters {
    pub pattern: DigestionPattern,
    pub digestion_end: DigestionEnd,
}

impl Default for DigestionParameters {
    fn default() -> Self {
        Self {
            pattern: DigestionPattern::trypsin(),
            digestion_end: DigestionEnd::CTerm,
        }
    }
}

impl DigestionParameters {
    /// Fully cleaved fragments of `sequence`, in order, covering it end to end.
    ///
    /// A cleavage at the very end of the sequence does not open a new fragment.
    pub fn cleavage_sites(&self, sequence: &str) -> Vec<Range<usize>> {
        let mut sites = Vec::new();
        let mut left = 0;
        for mat in self.pattern.regex.find_iter(sequence) {
            let right = match self.digestion_end {
                DigestionEnd::CTerm => mat.end(),
                DigestionEnd::NTerm => mat.start(),
            };

            // The regex crate has no lookarounds, so the proline rule lives here.
            if let Some(skip) = self.pattern.skip_suffix {
                if right < sequence.len() && sequence[right..].starts_with(skip) {
                    continue;
                }
            }

            if let Some(skip) = self.pattern.skip_prefix {
                if right > 0 && sequence[..right].ends_with(skip) {
                    continue;
                }
            }

            if right == left {
                continue;
            }
            sites.push(left..right);
            left = right;
        }
        if left < sequence.len() {
            sites.push(left..sequence.len());
        }
        sites
    }

    /// Number of theoretical fragments, never below 1.
    pub fn fragment_count(&self, sequence: &str) -> usize {
        self.cleavage_sites(sequence).len().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleavage_sites() {
        let params = DigestionParameters::default();
        let seq = "PEPTIKDEPINK";
        let sites = params.cleavage_sites(seq);
        assert_eq!(
            sites.len(),
            2,
            "There should be 2 cleavage sites got: {:?}",
            sites
        );
        assert_eq!(sites[0], 0..6);
        assert_eq!(sites[1], 6..12);
    }

    #[test]
    fn test_proline_blocks_cleavage() {
        let params = DigestionParameters::default();
        // K at 1 is followed by P, K at 4 and R at 5 are not.
        let sites = params.cleavage_sites("MKPVKRAG");
        assert_eq!(sites, vec![0..5, 5..6, 6..8]);
        assert_eq!(params.fragment_count("MKPVKRAG"), 3);
    }

    #[test]
    fn test_no_restriction() {
        let params = DigestionParameters {
            pattern: DigestionPattern::trypsin_norestriction(),
            digestion_end: DigestionEnd::CTerm,
        };
        assert_eq!(params.fragment_count("MKPVKRAG"), 4);
    }

    #[test]
    fn test_fragment_count_matches_site_rule() {
        let params = DigestionParameters::default();
        let cases = ["K", "MK", "KKKK", "AAAA", "RPRPR", "MAKRPGGKLLR", "PEPTIDEPINK"];
        for seq in cases {
            let bytes = seq.as_bytes();
            let expected = 1 + (0..bytes.len().saturating_sub(1))
                .filter(|&i| matches!(bytes[i], b'K' | b'R') && bytes[i + 1] != b'P')
                .count();
            assert_eq!(params.fragment_count(seq), expected, "sequence {}", seq);
        }
    }

    #[test]
    fn test_digest_nterm() {
        let params = DigestionParameters {
            pattern: DigestionPattern::trypsin(),
            digestion_end: DigestionEnd::NTerm,
        };
        let sites = params.cleavage_sites("PEPTIKDEPINK");
        assert_eq!(sites, vec![0..5, 5..11, 11..12], "got: {:?}", sites);
    }
}
