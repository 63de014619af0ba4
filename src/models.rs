use crate::digest::digestion::DigestionParameters;
use crate::errors::{ModhunterError, Result};
use serde::Serialize;
use std::ops::Range;
use std::sync::Arc;

/// Evidence counters for a single residue.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResidueRecord {
    /// Weighted count of experimental peptides covering the residue.
    pub gator_coverage: f64,
    pub predicted_coverage: u32,
    /// Number of distinct sources (not peptides) covering the residue.
    pub reader_coverage: u32,
    pub snp_coverage: u32,
    pub conservation: Option<f64>,
    pub score: u8,
}

/// A residue a source asserts to carry a named modification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmedModification {
    /// 0-based residue index.
    pub position: usize,
    pub label: String,
}

/// Running totals of evidence that could not be placed on the sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DroppedEvidence {
    pub unresolved_peptides: usize,
    pub unresolved_positions: usize,
    pub malformed_weights: usize,
    pub malformed_values: usize,
    pub unknown_sources: usize,
}

impl DroppedEvidence {
    pub fn total(&self) -> usize {
        self.unresolved_peptides
            + self.unresolved_positions
            + self.malformed_weights
            + self.malformed_values
            + self.unknown_sources
    }

    pub fn add(&mut self, other: &DroppedEvidence) {
        self.unresolved_peptides += other.unresolved_peptides;
        self.unresolved_positions += other.unresolved_positions;
        self.malformed_weights += other.malformed_weights;
        self.malformed_values += other.malformed_values;
        self.unknown_sources += other.unknown_sources;
    }
}

/// Per-protein accumulator of evidence and the scores derived from it.
///
/// Created once with [`SequenceModel::load`], fed by
/// [`SequenceModel::aggregate`] as sources report, and re-scored with
/// [`SequenceModel::recompute`] as often as needed.
///
/// ```
/// use modhunter::models::SequenceModel;
///
/// let mut model = SequenceModel::load("MKPVKRAG").unwrap();
/// model.recompute();
/// assert_eq!(model.tryptic_total, 3);
/// assert!(model.residues.iter().all(|r| r.score == 0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceModel {
    pub whole_sequence: Arc<str>,
    pub residues: Vec<ResidueRecord>,
    pub predicted_total: u32,
    pub peptide_total: f64,
    pub tryptic_total: usize,
    pub abundance_score: u8,
    /// Last residue index of the N-terminal processing zone.
    pub n_terminal: Option<usize>,
    /// First residue index of the C-terminal processing zone.
    pub c_terminal: Option<usize>,
    pub confirmed_mods: Vec<ConfirmedModification>,
    pub dropped: DroppedEvidence,
}

impl SequenceModel {
    /// Builds an empty model for a cleaned sequence, digesting it with trypsin.
    pub fn load(sequence: &str) -> Result<Self> {
        Self::load_with_digestion(sequence, &DigestionParameters::default())
    }

    pub fn load_with_digestion(sequence: &str, digestion: &DigestionParameters) -> Result<Self> {
        if sequence.is_empty() {
            return Err(ModhunterError::InvalidInput(
                "cannot load an empty sequence".to_string(),
            ));
        }
        if let Some((idx, c)) = sequence
            .char_indices()
            .find(|(_, c)| !c.is_ascii_uppercase())
        {
            return Err(ModhunterError::InvalidInput(format!(
                "sequence is not cleaned, found {:?} at position {}",
                c, idx
            )));
        }

        Ok(Self {
            whole_sequence: sequence.into(),
            residues: vec![ResidueRecord::default(); sequence.len()],
            predicted_total: 0,
            peptide_total: 0.0,
            tryptic_total: digestion.fragment_count(sequence),
            abundance_score: 0,
            n_terminal: None,
            c_terminal: None,
            confirmed_mods: Vec::new(),
            dropped: DroppedEvidence::default(),
        })
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Residue span of the first exact occurrence of `peptide`.
    pub fn locate(&self, peptide: &str) -> Option<Range<usize>> {
        if peptide.is_empty() {
            return None;
        }
        self.whole_sequence
            .find(peptide)
            .map(|start| start..start + peptide.len())
    }

    pub fn in_terminal_zone(&self, index: usize) -> bool {
        self.n_terminal.is_some_and(|n| index <= n) || self.c_terminal.is_some_and(|c| index >= c)
    }

    pub fn total_gator_coverage(&self) -> f64 {
        self.residues.iter().map(|r| r.gator_coverage).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_initializes_counters() {
        let model = SequenceModel::load("MKPVKRAG").unwrap();
        assert_eq!(model.len(), 8);
        assert_eq!(model.tryptic_total, 3);
        assert_eq!(model.predicted_total, 0);
        assert_eq!(model.peptide_total, 0.0);
        assert_eq!(model.abundance_score, 0);
        assert!(model.n_terminal.is_none());
        assert!(model.c_terminal.is_none());
        assert!(model.confirmed_mods.is_empty());
        assert!(model.residues.iter().all(|r| *r == ResidueRecord::default()));
    }

    #[test]
    fn test_load_rejects_bad_input() {
        assert!(matches!(
            SequenceModel::load(""),
            Err(ModhunterError::InvalidInput(_))
        ));
        assert!(matches!(
            SequenceModel::load("MK PV"),
            Err(ModhunterError::InvalidInput(_))
        ));
        assert!(matches!(
            SequenceModel::load("mkpv"),
            Err(ModhunterError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_tryptic_total_is_at_least_one() {
        for seq in ["A", "K", "R", "KP", "PPPP"] {
            let model = SequenceModel::load(seq).unwrap();
            assert_eq!(model.tryptic_total, 1, "sequence {}", seq);
        }
    }

    #[test]
    fn test_locate_first_match() {
        let model = SequenceModel::load("PEPTIDEPEPTIDE").unwrap();
        assert_eq!(model.locate("PEPTIDE"), Some(0..7));
        assert_eq!(model.locate("TIDEP"), Some(3..8));
        assert_eq!(model.locate("XYZ"), None);
        assert_eq!(model.locate(""), None);
    }

    #[test]
    fn test_terminal_zone_membership() {
        let mut model = SequenceModel::load("AAAAAAAAAA").unwrap();
        assert!(!model.in_terminal_zone(0));
        model.n_terminal = Some(1);
        model.c_terminal = Some(8);
        assert!(model.in_terminal_zone(0));
        assert!(model.in_terminal_zone(1));
        assert!(!model.in_terminal_zone(2));
        assert!(!model.in_terminal_zone(7));
        assert!(model.in_terminal_zone(8));
        assert!(model.in_terminal_zone(9));
    }
}
