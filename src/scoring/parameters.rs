use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables of the abundance estimate and the residue score.
///
/// Every field is optional when read from JSON; missing ones keep the
/// default.
///
/// ```
/// use modhunter::scoring::parameters::ScoringParameters;
///
/// let params = ScoringParameters::from_json(r#"{"terminal_boost": 40}"#).unwrap();
/// assert_eq!(params.terminal_boost, 40);
/// assert_eq!(params.abundance_floor, 20.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParameters {
    /// Coverage at which observed peptides fully cancel the score.
    pub coverage_saturation: f64,
    /// Abundance at or below which every score is 0.
    pub abundance_floor: f64,
    /// Abundance range over which scores ramp up to full weight.
    pub abundance_span: f64,
    /// Abundance above which uncovered residues get a boost.
    pub gap_floor: f64,
    pub gap_span: f64,
    /// Coverage below which a residue counts as a gap.
    pub gap_coverage: f64,
    pub gap_weight: f64,
    pub terminal_boost: u8,
    pub terminal_min_abundance: u8,
    /// Fraction of total coverage scanned from each end.
    pub terminal_coverage_fraction: f64,
    /// Zones must be longer than this fraction of the sequence.
    pub terminal_min_fraction: f64,
    pub long_protein_length: usize,
    pub long_terminal_fraction: f64,
    pub short_terminal_length: usize,
}

impl Default for ScoringParameters {
    fn default() -> Self {
        Self {
            coverage_saturation: 10.0,
            abundance_floor: 20.0,
            abundance_span: 50.0,
            gap_floor: 70.0,
            gap_span: 30.0,
            gap_coverage: 4.0,
            gap_weight: 0.7,
            terminal_boost: 60,
            terminal_min_abundance: 50,
            terminal_coverage_fraction: 0.05,
            terminal_min_fraction: 0.08,
            long_protein_length: 200,
            long_terminal_fraction: 0.2,
            short_terminal_length: 40,
        }
    }
}

impl ScoringParameters {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Longest zone, in residues, that still counts as terminal processing.
    pub fn terminal_length(&self, sequence_length: usize) -> f64 {
        if sequence_length > self.long_protein_length {
            sequence_length as f64 * self.long_terminal_fraction
        } else {
            self.short_terminal_length as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let params = ScoringParameters::from_json("{}").unwrap();
        assert_eq!(params, ScoringParameters::default());
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        assert!(ScoringParameters::from_json(r#"{"gap_weight": "lots"}"#).is_err());
    }

    #[test]
    fn test_terminal_length() {
        let params = ScoringParameters::default();
        assert_eq!(params.terminal_length(100), 40.0);
        assert_eq!(params.terminal_length(200), 40.0);
        assert_eq!(params.terminal_length(500), 100.0);
    }
}
