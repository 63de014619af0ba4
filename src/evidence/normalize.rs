use super::kinds::{EvidenceKind, SiteResolution, WeightRule};
use super::source::{EvidenceSource, PeptideRecord, SnpRecord};
use log::debug;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedPeptide {
    pub sequence: String,
    pub weight: f64,
}

/// How a confirmed modification is anchored before it is placed on the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteAnchor {
    /// 1-based offset inside the first occurrence of `sequence`.
    Peptide { sequence: String, offset: usize },
    /// 1-based position on the protein.
    Absolute(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModificationSite {
    pub anchor: SiteAnchor,
    pub label: String,
}

/// Source output reduced to one of the shapes the aggregator folds.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedEvidence {
    Peptides(Vec<WeightedPeptide>),
    PredictedPeptides(Vec<String>),
    /// 1-based variant positions.
    Variants(Vec<usize>),
    ModificationSites(Vec<ModificationSite>),
    Conservation(Vec<Option<f64>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub evidence: NormalizedEvidence,
    pub malformed_weights: usize,
    /// Conservation entries that were neither a number nor null.
    pub malformed_values: usize,
}

impl From<NormalizedEvidence> for Normalized {
    fn from(evidence: NormalizedEvidence) -> Self {
        Self {
            evidence,
            malformed_weights: 0,
            malformed_values: 0,
        }
    }
}

/// Mirrors `parseInt`: optional sign and leading digits, anything after ignored.
fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|x| sign * x)
}

impl WeightRule {
    /// Observation count for a peptide, `None` when the field is unusable.
    pub fn weight(&self, peptide: &PeptideRecord) -> Option<f64> {
        let (field, as_length) = match self {
            WeightRule::Unit => return Some(1.0),
            WeightRule::ListLength(field) => (field, true),
            WeightRule::Scalar(field) => (field, false),
        };
        let weight = match (peptide.fields.get(field.as_str()), as_length) {
            (None | Some(Value::Null), _) => return Some(1.0),
            (Some(Value::Array(items)), true) => items.len() as f64,
            (Some(Value::Number(n)), false) => n.as_f64()?.trunc(),
            (Some(Value::String(s)), false) => parse_int_prefix(s)? as f64,
            _ => return None,
        };
        if weight.is_finite() && weight >= 0.0 {
            Some(weight)
        } else {
            None
        }
    }
}

impl EvidenceKind {
    /// Reduces a source to the evidence shape of this kind.
    pub fn normalize(&self, source: &dyn EvidenceSource) -> Normalized {
        match self {
            EvidenceKind::Peptides { weight } => {
                let mut malformed_weights = 0;
                let peptides = source
                    .peptides()
                    .iter()
                    .filter_map(|pep| match weight.weight(pep) {
                        Some(w) => Some(WeightedPeptide {
                            sequence: pep.sequence.clone(),
                            weight: w,
                        }),
                        None => {
                            debug!("Dropping peptide {} with unusable weight", pep.sequence);
                            malformed_weights += 1;
                            None
                        }
                    })
                    .collect();
                Normalized {
                    evidence: NormalizedEvidence::Peptides(peptides),
                    malformed_weights,
                    malformed_values: 0,
                }
            }
            EvidenceKind::PredictedCleavage => NormalizedEvidence::PredictedPeptides(
                source
                    .peptides()
                    .iter()
                    .map(|pep| pep.sequence.clone())
                    .collect(),
            )
            .into(),
            EvidenceKind::Variants => NormalizedEvidence::Variants(
                source
                    .accessions()
                    .into_iter()
                    .flat_map(|acc| source.snps(acc).iter().map(|snp| snp.position()))
                    .collect(),
            )
            .into(),
            EvidenceKind::ModificationSites { label, resolution } => {
                NormalizedEvidence::ModificationSites(modification_sites(
                    source,
                    label,
                    *resolution,
                ))
                .into()
            }
            EvidenceKind::Conservation => {
                let mut malformed_values = 0;
                // Unusable entries become gaps so later entries stay aligned.
                let values = source
                    .conservation()
                    .iter()
                    .map(|value| match value {
                        Value::Null => None,
                        Value::Number(n) => n.as_f64(),
                        other => {
                            debug!("Ignoring conservation value {}", other);
                            malformed_values += 1;
                            None
                        }
                    })
                    .collect();
                Normalized {
                    evidence: NormalizedEvidence::Conservation(values),
                    malformed_weights: 0,
                    malformed_values,
                }
            }
        }
    }
}

fn peptide_sites<'a>(
    peptides: impl Iterator<Item = &'a PeptideRecord> + 'a,
    offsets: fn(&PeptideRecord) -> &[usize],
    label: &'a str,
) -> impl Iterator<Item = ModificationSite> + 'a {
    peptides.flat_map(move |pep| {
        offsets(pep).iter().map(move |&offset| ModificationSite {
            anchor: SiteAnchor::Peptide {
                sequence: pep.sequence.clone(),
                offset,
            },
            label: label.to_string(),
        })
    })
}

fn modification_sites(
    source: &dyn EvidenceSource,
    label: &str,
    resolution: SiteResolution,
) -> Vec<ModificationSite> {
    match resolution {
        SiteResolution::PeptideOffsets => {
            peptide_sites(source.peptides().iter(), |pep| pep.positions.as_slice(), label).collect()
        }
        SiteResolution::DeIndexOffsets => {
            peptide_sites(source.peptides().iter(), |pep| pep.de_index.as_slice(), label).collect()
        }
        SiteResolution::SpectrumPeptideOffsets => peptide_sites(
            source.spectra().iter().flat_map(|spectrum| spectrum.peptides.iter()),
            |pep| pep.positions.as_slice(),
            label,
        )
        .collect(),
        SiteResolution::AbsolutePositions => source
            .experimental_positions()
            .into_iter()
            .map(|pos| ModificationSite {
                anchor: SiteAnchor::Absolute(pos),
                label: label.to_string(),
            })
            .collect(),
        SiteResolution::VariantEdits => source
            .accessions()
            .into_iter()
            .flat_map(|acc| source.snps(acc).iter())
            .map(|snp| ModificationSite {
                anchor: SiteAnchor::Absolute(snp.position()),
                label: edit_label(label, snp),
            })
            .collect(),
    }
}

fn edit_label(label: &str, snp: &SnpRecord) -> String {
    match (snp.from_residue(), snp.to_residue()) {
        (Some(from), Some(to)) => format!("{} ({} to {})", label, from, to),
        _ => label.to_string(),
    }
}
