use crate::evidence::normalize::{ModificationSite, NormalizedEvidence, SiteAnchor, WeightedPeptide};
use crate::evidence::source::{Evidence, EvidenceSource};
use crate::models::{ConfirmedModification, DroppedEvidence, SequenceModel};
use log::{debug, warn};

/// What a single aggregation call did to the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationReport {
    /// Evidence items that landed on the sequence.
    pub applied: usize,
    pub dropped: DroppedEvidence,
}

impl SequenceModel {
    /// Folds one completed source into the model.
    ///
    /// Sources can report in any order and any number of times. Items that
    /// do not fit the sequence are skipped and counted, never fatal; a
    /// source without a kind is a no-op.
    pub fn aggregate<S: EvidenceSource>(&mut self, evidence: &Evidence<S>) -> AggregationReport {
        let Some(normalized) = evidence.normalize() else {
            warn!("Ignoring evidence from unknown source {}", evidence.name);
            let mut report = AggregationReport::default();
            report.dropped.unknown_sources = 1;
            self.dropped.add(&report.dropped);
            return report;
        };

        let mut report = self.fold(&normalized.evidence);
        report.dropped.malformed_weights += normalized.malformed_weights;
        report.dropped.malformed_values += normalized.malformed_values;
        self.dropped.add(&report.dropped);

        debug!(
            "Aggregated {}: {} applied, {} dropped",
            evidence.name,
            report.applied,
            report.dropped.total()
        );
        report
    }

    /// Applies already-normalized evidence. Dropped items are reported but
    /// not added to `self.dropped`.
    pub fn fold(&mut self, evidence: &NormalizedEvidence) -> AggregationReport {
        match evidence {
            NormalizedEvidence::Peptides(peptides) => self.fold_peptides(peptides),
            NormalizedEvidence::PredictedPeptides(peptides) => self.fold_predicted(peptides),
            NormalizedEvidence::Variants(positions) => self.fold_variants(positions),
            NormalizedEvidence::ModificationSites(sites) => self.fold_modification_sites(sites),
            NormalizedEvidence::Conservation(values) => self.fold_conservation(values),
        }
    }

    fn fold_peptides(&mut self, peptides: &[WeightedPeptide]) -> AggregationReport {
        let mut report = AggregationReport::default();
        // Residues this call already counted towards reader_coverage.
        let mut touched = vec![false; self.len()];
        for peptide in peptides {
            let Some(span) = self.locate(&peptide.sequence) else {
                debug!("Peptide {} not found in sequence", peptide.sequence);
                report.dropped.unresolved_peptides += 1;
                continue;
            };
            self.peptide_total += peptide.weight;
            for idx in span {
                let residue = &mut self.residues[idx];
                residue.gator_coverage += peptide.weight;
                if !touched[idx] {
                    residue.reader_coverage += 1;
                    touched[idx] = true;
                }
            }
            report.applied += 1;
        }
        report
    }

    fn fold_predicted(&mut self, peptides: &[String]) -> AggregationReport {
        let mut report = AggregationReport::default();
        for peptide in peptides {
            let Some(span) = self.locate(peptide) else {
                debug!("Predicted peptide {} not found in sequence", peptide);
                report.dropped.unresolved_peptides += 1;
                continue;
            };
            self.predicted_total += 1;
            for idx in span {
                self.residues[idx].predicted_coverage += 1;
            }
            report.applied += 1;
        }
        report
    }

    fn fold_variants(&mut self, positions: &[usize]) -> AggregationReport {
        let mut report = AggregationReport::default();
        for &position in positions {
            match position
                .checked_sub(1)
                .and_then(|idx| self.residues.get_mut(idx))
            {
                Some(residue) => {
                    residue.snp_coverage += 1;
                    report.applied += 1;
                }
                None => {
                    debug!("Variant position {} outside the sequence", position);
                    report.dropped.unresolved_positions += 1;
                }
            }
        }
        report
    }

    /// 0-based residue index of a modification anchor, if it lies on the sequence.
    pub fn resolve_site(&self, anchor: &SiteAnchor) -> Option<usize> {
        let idx = match anchor {
            SiteAnchor::Peptide { sequence, offset } => {
                self.locate(sequence)?.start + offset.checked_sub(1)?
            }
            SiteAnchor::Absolute(position) => position.checked_sub(1)?,
        };
        (idx < self.len()).then_some(idx)
    }

    fn fold_modification_sites(&mut self, sites: &[ModificationSite]) -> AggregationReport {
        let mut report = AggregationReport::default();
        for site in sites {
            match self.resolve_site(&site.anchor) {
                Some(position) => {
                    self.confirmed_mods.push(ConfirmedModification {
                        position,
                        label: site.label.clone(),
                    });
                    report.applied += 1;
                }
                None => {
                    debug!("Could not place {} site {:?}", site.label, site.anchor);
                    match site.anchor {
                        SiteAnchor::Peptide { .. } => report.dropped.unresolved_peptides += 1,
                        SiteAnchor::Absolute(_) => report.dropped.unresolved_positions += 1,
                    }
                }
            }
        }
        report
    }

    fn fold_conservation(&mut self, values: &[Option<f64>]) -> AggregationReport {
        let mut report = AggregationReport::default();
        for (idx, value) in values.iter().enumerate() {
            match self.residues.get_mut(idx) {
                Some(residue) => {
                    residue.conservation = *value;
                    report.applied += 1;
                }
                None => report.dropped.unresolved_positions += 1,
            }
        }
        report
    }
}
