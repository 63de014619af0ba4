use super::kinds::{EvidenceKind, SourceCatalog};
use super::normalize::Normalized;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeptideRecord {
    pub sequence: String,
    /// 1-based offsets of modified residues inside the peptide.
    #[serde(default)]
    pub positions: Vec<usize>,
    /// Deamidation-style offsets some glycosylation sources report instead.
    #[serde(default)]
    pub de_index: Vec<usize>,
    /// Any other field, weight fields included.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PeptideRecord {
    pub fn new(sequence: &str) -> Self {
        Self {
            sequence: sequence.to_string(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    pub fn with_positions(mut self, positions: &[usize]) -> Self {
        self.positions.extend_from_slice(positions);
        self
    }

    pub fn with_de_index(mut self, offsets: &[usize]) -> Self {
        self.de_index.extend_from_slice(offsets);
        self
    }
}

/// Wire shapes of a variant: `[position, from, to]` with the residues optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSnp {
    Edit(usize, String, String),
    Origin(usize, String),
    Position((usize,)),
}

/// A single nucleotide variant, position 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSnp", into = "RawSnp")]
pub struct SnpRecord {
    position: usize,
    from: Option<String>,
    to: Option<String>,
}

impl From<RawSnp> for SnpRecord {
    fn from(raw: RawSnp) -> Self {
        match raw {
            RawSnp::Edit(position, from, to) => SnpRecord::new(position, &from, &to),
            RawSnp::Origin(position, from) => SnpRecord {
                position,
                from: Some(from),
                to: None,
            },
            RawSnp::Position((position,)) => SnpRecord::at(position),
        }
    }
}

impl From<SnpRecord> for RawSnp {
    fn from(snp: SnpRecord) -> Self {
        match (snp.from, snp.to) {
            (Some(from), Some(to)) => RawSnp::Edit(snp.position, from, to),
            (Some(from), None) => RawSnp::Origin(snp.position, from),
            _ => RawSnp::Position((snp.position,)),
        }
    }
}

impl SnpRecord {
    pub fn new(position: usize, from: &str, to: &str) -> Self {
        Self {
            position,
            from: Some(from.to_string()),
            to: Some(to.to_string()),
        }
    }

    /// A variant known only by its position.
    pub fn at(position: usize) -> Self {
        Self {
            position,
            from: None,
            to: None,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn from_residue(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to_residue(&self) -> Option<&str> {
        self.to.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    #[serde(default)]
    pub peptides: Vec<PeptideRecord>,
}

/// Capabilities a finished evidence source can offer.
///
/// Sources implement only what their behavior class reads; everything
/// else reports nothing.
pub trait EvidenceSource {
    fn peptides(&self) -> &[PeptideRecord] {
        &[]
    }

    fn accessions(&self) -> Vec<&str> {
        Vec::new()
    }

    fn snps(&self, _accession: &str) -> &[SnpRecord] {
        &[]
    }

    /// 1-based positions on the full protein, first occurrence only.
    fn experimental_positions(&self) -> Vec<usize> {
        Vec::new()
    }

    fn spectra(&self) -> &[Spectrum] {
        &[]
    }

    /// One entry per residue, index-aligned with the sequence. Entries are
    /// kept as read; only numbers and nulls are meaningful.
    fn conservation(&self) -> &[Value] {
        &[]
    }
}

/// Already-parsed result of a source, in the union of the shapes sources use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceResult {
    #[serde(default)]
    pub peptides: Vec<PeptideRecord>,
    #[serde(default)]
    pub snps: BTreeMap<String, Vec<SnpRecord>>,
    #[serde(default)]
    pub experimental_positions: Vec<usize>,
    #[serde(default)]
    pub spectra: Vec<Spectrum>,
    #[serde(default)]
    pub conservation: Vec<Value>,
}

impl EvidenceSource for SourceResult {
    fn peptides(&self) -> &[PeptideRecord] {
        &self.peptides
    }

    fn accessions(&self) -> Vec<&str> {
        self.snps.keys().map(|x| x.as_str()).collect()
    }

    fn snps(&self, accession: &str) -> &[SnpRecord] {
        self.snps.get(accession).map(|x| x.as_slice()).unwrap_or(&[])
    }

    fn experimental_positions(&self) -> Vec<usize> {
        let mut seen = HashSet::new();
        self.experimental_positions
            .iter()
            .copied()
            .filter(|x| seen.insert(*x))
            .collect()
    }

    fn spectra(&self) -> &[Spectrum] {
        &self.spectra
    }

    fn conservation(&self) -> &[Value] {
        &self.conservation
    }
}

/// A completed source together with the kind it was registered under.
///
/// A source without a kind is unknown and contributes nothing.
#[derive(Debug, Clone)]
pub struct Evidence<S: EvidenceSource> {
    pub name: String,
    pub kind: Option<EvidenceKind>,
    pub source: S,
}

impl<S: EvidenceSource> Evidence<S> {
    pub fn new(name: &str, kind: EvidenceKind, source: S) -> Self {
        Self {
            name: name.to_string(),
            kind: Some(kind),
            source,
        }
    }

    pub fn from_catalog(name: &str, catalog: &SourceCatalog, source: S) -> Self {
        Self {
            name: name.to_string(),
            kind: catalog.kind_for(name).cloned(),
            source,
        }
    }

    pub fn normalize(&self) -> Option<Normalized> {
        self.kind.as_ref().map(|kind| kind.normalize(&self.source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_result_from_json() {
        let json = r#"{
            "peptides": [
                {"sequence": "PEPTIDEK", "experiments": [1, 2, 3], "positions": [2]},
                {"sequence": "GLYCAN", "de_index": [1, 4]}
            ],
            "snps": {"AT1G01010.1": [[12, "A", "G"], [40, "C", "T"]]},
            "experimental_positions": [5, 9, 5],
            "conservation": [0.5, null, 1.0]
        }"#;
        let result: SourceResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.peptides.len(), 2);
        assert_eq!(result.peptides[0].fields["experiments"].as_array().unwrap().len(), 3);
        assert_eq!(result.peptides[0].positions, vec![2]);
        assert!(result.peptides[0].de_index.is_empty());
        assert_eq!(result.peptides[1].de_index, vec![1, 4]);
        assert_eq!(result.accessions(), vec!["AT1G01010.1"]);
        assert_eq!(result.snps("AT1G01010.1")[1].position(), 40);
        assert_eq!(result.snps("AT1G01010.1")[0].from_residue(), Some("A"));
        assert_eq!(result.snps("AT1G01010.1")[0].to_residue(), Some("G"));
        assert!(result.snps("missing").is_empty());
        assert_eq!(result.experimental_positions(), vec![5, 9]);
        assert_eq!(
            result.conservation(),
            &[Value::from(0.5), Value::Null, Value::from(1.0)]
        );
    }

    #[test]
    fn test_partial_variants() {
        let json = r#"{"snps": {"A.1": [[3], [7, "C"], [9, "G", "A"]]}}"#;
        let result: SourceResult = serde_json::from_str(json).unwrap();
        let snps = result.snps("A.1");
        assert_eq!(snps.len(), 3);
        assert_eq!(snps[0], SnpRecord::at(3));
        assert_eq!(snps[1].position(), 7);
        assert_eq!(snps[1].from_residue(), Some("C"));
        assert_eq!(snps[1].to_residue(), None);
        assert_eq!(snps[2], SnpRecord::new(9, "G", "A"));

        let back = serde_json::to_string(&result.snps).unwrap();
        assert_eq!(back, r#"{"A.1":[[3],[7,"C"],[9,"G","A"]]}"#);
    }

    #[test]
    fn test_conservation_keeps_any_value() {
        let json = r#"{"conservation": ["high", 0.5, null]}"#;
        let result: SourceResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.conservation().len(), 3);
        assert_eq!(result.conservation()[0], Value::from("high"));
    }

    #[test]
    fn test_unknown_source_has_no_kind() {
        let catalog = SourceCatalog::default();
        let evidence =
            Evidence::from_catalog("MASCP.NotARealReader", &catalog, SourceResult::default());
        assert!(evidence.kind.is_none());
        assert!(evidence.normalize().is_none());

        let evidence = Evidence::from_catalog("MASCP.PpdbReader", &catalog, SourceResult::default());
        assert!(evidence.normalize().is_some());
    }
}
