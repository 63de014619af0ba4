use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a generic peptide source states the number of observations behind
/// each peptide. A missing field always counts as a single observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightRule {
    #[default]
    Unit,
    /// Weight is the length of the named array field.
    ListLength(String),
    /// Weight is the integer value of the named scalar field.
    Scalar(String),
}

/// Where the residue of a confirmed modification comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteResolution {
    /// 1-based `positions` inside peptides that are located on the sequence.
    PeptideOffsets,
    /// Like `PeptideOffsets`, read from the peptides' `de_index` instead.
    DeIndexOffsets,
    /// Same as `PeptideOffsets`, for peptides grouped into spectra.
    SpectrumPeptideOffsets,
    /// 1-based positions on the full protein.
    AbsolutePositions,
    /// Variant edits per accession, labelled with the substitution.
    VariantEdits,
}

/// The behavior class a source is registered with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvidenceKind {
    Peptides {
        #[serde(default)]
        weight: WeightRule,
    },
    PredictedCleavage,
    Variants,
    ModificationSites {
        label: String,
        resolution: SiteResolution,
    },
    Conservation,
}

impl EvidenceKind {
    pub fn peptides(weight: WeightRule) -> Self {
        EvidenceKind::Peptides { weight }
    }

    pub fn modification_sites(label: &str, resolution: SiteResolution) -> Self {
        EvidenceKind::ModificationSites {
            label: label.to_string(),
            resolution,
        }
    }
}

/// Name to kind table for sources that do not carry their kind.
#[derive(Debug, Clone)]
pub struct SourceCatalog {
    kinds: HashMap<String, EvidenceKind>,
}

impl SourceCatalog {
    pub fn empty() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &str, kind: EvidenceKind) -> &mut Self {
        self.kinds.insert(name.to_string(), kind);
        self
    }

    pub fn kind_for(&self, name: &str) -> Option<&EvidenceKind> {
        self.kinds.get(name)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for SourceCatalog {
    fn default() -> Self {
        use SiteResolution::*;
        let list = |field: &str| EvidenceKind::peptides(WeightRule::ListLength(field.into()));
        let scalar = |field: &str| EvidenceKind::peptides(WeightRule::Scalar(field.into()));
        let unit = || EvidenceKind::peptides(WeightRule::Unit);

        let mut catalog = Self::empty();
        catalog
            .register("MASCP.PpdbReader", list("experiments"))
            .register("MASCP.AtPeptideReader", list("tissues"))
            .register("MASCP.Pep2ProReader", scalar("qty_spectra"))
            .register("MASCP.AtChloroReader", unit())
            .register("MASCP.GelMapReader", unit())
            .register("MASCP.PubmedReader", unit())
            .register("MASCP.ProteotypicReader", EvidenceKind::PredictedCleavage)
            .register("MASCP.SnpReader", EvidenceKind::Variants)
            .register("MASCP.OrthologyReader", EvidenceKind::Conservation)
            .register(
                "MASCP.RnaEditReader",
                EvidenceKind::modification_sites("RNA Edit", VariantEdits),
            )
            .register(
                "MASCP.GlycoModReader",
                EvidenceKind::modification_sites("Glycosylation", DeIndexOffsets),
            )
            .register(
                "MASCP.PhosphatReader",
                EvidenceKind::modification_sites("Phosphorylation", AbsolutePositions),
            )
            .register(
                "MASCP.UbiquitinReader",
                EvidenceKind::modification_sites("Ubiquitination", PeptideOffsets),
            )
            .register(
                "MASCP.RippdbReader",
                EvidenceKind::modification_sites("Phosphorylation", SpectrumPeptideOffsets),
            )
            .register(
                "MASCP.MoxReader",
                EvidenceKind::modification_sites("Methionine oxidation", PeptideOffsets),
            )
            .register(
                "MASCP.NTermReader",
                EvidenceKind::modification_sites("N-terminal processing", PeptideOffsets),
            )
            .register(
                "MASCP.SnoReader",
                EvidenceKind::modification_sites("S-nitrosylation", PeptideOffsets),
            );
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = SourceCatalog::default();
        assert_eq!(catalog.len(), 17);
        assert_eq!(
            catalog.kind_for("MASCP.Pep2ProReader"),
            Some(&EvidenceKind::Peptides {
                weight: WeightRule::Scalar("qty_spectra".into())
            })
        );
        assert_eq!(
            catalog.kind_for("MASCP.ProteotypicReader"),
            Some(&EvidenceKind::PredictedCleavage)
        );
        assert_eq!(
            catalog.kind_for("MASCP.GlycoModReader"),
            Some(&EvidenceKind::modification_sites(
                "Glycosylation",
                SiteResolution::DeIndexOffsets
            ))
        );
        assert!(catalog.kind_for("MASCP.SomeFutureReader").is_none());
    }

    #[test]
    fn test_kind_json_shapes() {
        let kind: EvidenceKind =
            serde_json::from_str(r#"{"type": "peptides", "weight": {"list_length": "tissues"}}"#)
                .unwrap();
        assert_eq!(kind, EvidenceKind::peptides(WeightRule::ListLength("tissues".into())));

        let kind: EvidenceKind = serde_json::from_str(r#"{"type": "peptides"}"#).unwrap();
        assert_eq!(kind, EvidenceKind::peptides(WeightRule::Unit));

        let kind: EvidenceKind = serde_json::from_str(
            r#"{"type": "modification_sites", "label": "Acetylation", "resolution": "absolute_positions"}"#,
        )
        .unwrap();
        assert_eq!(
            kind,
            EvidenceKind::modification_sites("Acetylation", SiteResolution::AbsolutePositions)
        );

        let kind: EvidenceKind = serde_json::from_str(r#"{"type": "conservation"}"#).unwrap();
        assert_eq!(kind, EvidenceKind::Conservation);
    }
}
