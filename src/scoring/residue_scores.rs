use super::abundance::estimate_abundance;
use super::parameters::ScoringParameters;
use crate::models::{ResidueRecord, SequenceModel};
use log::debug;
use std::time::Instant;

/// Score in `[0, 100]` for a residue of a protein with the given abundance.
///
/// Observed coverage lowers the score, a predicted cleavage raises it, and
/// for very abundant proteins uncovered residues get part of the way up.
/// Nothing scores on proteins at or below the abundance floor.
pub fn residue_score(
    residue: &ResidueRecord,
    abundance_score: u8,
    in_terminal_zone: bool,
    params: &ScoringParameters,
) -> u8 {
    let abundance = abundance_score as f64;
    let coverage = residue.gator_coverage;

    let gat_score = (coverage / params.coverage_saturation).min(1.0);
    let pred_score = if residue.predicted_coverage > 0 { 1.0 } else { 0.0 };
    let ab_scale = ((abundance - params.abundance_floor) / params.abundance_span).clamp(0.0, 1.0);
    let gap_scale = ((abundance - params.gap_floor) / params.gap_span).clamp(0.0, 1.0)
        * ((params.gap_coverage - coverage) / params.gap_coverage).max(0.0)
        * params.gap_weight;

    let raw = (pred_score - gat_score + gap_scale).clamp(0.0, 1.0) * ab_scale * 100.0;
    let score = raw.round() as u8;
    if in_terminal_zone {
        score.saturating_add(params.terminal_boost).min(100)
    } else {
        score
    }
}

/// Writes a fresh score into every residue from the model's current
/// abundance and terminal zones.
pub fn score_residues(model: &mut SequenceModel, params: &ScoringParameters) {
    let abundance_score = model.abundance_score;
    let zones: Vec<bool> = (0..model.len())
        .map(|idx| model.in_terminal_zone(idx))
        .collect();
    for (residue, in_zone) in model.residues.iter_mut().zip(zones) {
        residue.score = residue_score(residue, abundance_score, in_zone, params);
    }
}

impl SequenceModel {
    /// Re-derives abundance, terminal zones and residue scores with the
    /// default parameters. Safe to call at any point; repeated calls without
    /// new evidence leave the model unchanged.
    pub fn recompute(&mut self) {
        self.recompute_with(&ScoringParameters::default());
    }

    pub fn recompute_with(&mut self, params: &ScoringParameters) {
        let st = Instant::now();
        estimate_abundance(self, params);
        score_residues(self, params);
        debug!(
            "Scored {} residues (abundance {}) in {:?}",
            self.len(),
            self.abundance_score,
            st.elapsed()
        );
    }
}
