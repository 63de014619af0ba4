use crate::errors::{ModhunterError, Result};
use crate::evidence::kinds::{EvidenceKind, SourceCatalog};
use crate::evidence::source::{Evidence, SourceResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path;
use std::time::Instant;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BundleElement {
    #[serde(default)]
    accession: Option<String>,
    source: String,
    #[serde(default)]
    kind: Option<EvidenceKind>,
    /// Only read once the kind is known; unknown sources may use any shape.
    #[serde(default)]
    result: Value,
}

/// Evidence for one protein, in the order it was read.
#[derive(Debug, Clone)]
pub struct EvidenceGroup {
    pub accession: String,
    pub evidence: Vec<Evidence<SourceResult>>,
}

/// Completed source results for many proteins, read from NDJSON.
#[derive(Debug, Clone, Default)]
pub struct EvidenceBundle {
    groups: Vec<EvidenceGroup>,
    index: HashMap<String, usize>,
}

impl EvidenceBundle {
    pub fn from_ndjson(json: &str, catalog: &SourceCatalog) -> Result<Self> {
        let mut bundle = Self::default();
        for (line_num, line) in json.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let malformed = |e: serde_json::Error| ModhunterError::MalformedBundle {
                line: line_num + 1,
                source: e,
            };
            let elem: BundleElement = serde_json::from_str(line).map_err(malformed)?;
            let Some(accession) = elem.accession else {
                warn!(
                    "Skipping {} evidence on line {} without an accession",
                    elem.source,
                    line_num + 1
                );
                continue;
            };

            let kind = elem
                .kind
                .or_else(|| catalog.kind_for(&elem.source).cloned());
            let evidence = match kind {
                Some(kind) => {
                    let result = match elem.result {
                        Value::Null => SourceResult::default(),
                        value => serde_json::from_value(value).map_err(malformed)?,
                    };
                    Evidence::new(&elem.source, kind, result)
                }
                None => Evidence {
                    name: elem.source,
                    kind: None,
                    source: SourceResult::default(),
                },
            };
            bundle.push(accession, evidence);
        }
        Ok(bundle)
    }

    pub fn from_ndjson_file(path: &path::Path, catalog: &SourceCatalog) -> Result<Self> {
        let st = Instant::now();
        let json = std::fs::read_to_string(path)?;
        let out = Self::from_ndjson(&json, catalog)?;
        info!(
            "Read {} evidence records for {} proteins in {:?}",
            out.num_records(),
            out.len(),
            st.elapsed()
        );
        Ok(out)
    }

    pub fn push(&mut self, accession: String, evidence: Evidence<SourceResult>) {
        let slot = match self.index.get(&accession) {
            Some(&slot) => slot,
            None => {
                self.index.insert(accession.clone(), self.groups.len());
                self.groups.push(EvidenceGroup {
                    accession,
                    evidence: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        self.groups[slot].evidence.push(evidence);
    }

    pub fn for_accession(&self, accession: &str) -> &[Evidence<SourceResult>] {
        self.index
            .get(accession)
            .map(|&slot| self.groups[slot].evidence.as_slice())
            .unwrap_or(&[])
    }

    pub fn groups(&self) -> &[EvidenceGroup] {
        &self.groups
    }

    pub fn num_records(&self) -> usize {
        self.groups.iter().map(|g| g.evidence.len()).sum()
    }

    /// Number of distinct accessions.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::kinds::WeightRule;
    use crate::evidence::source::EvidenceSource;

    #[test]
    fn test_bundle() {
        let ndjson = r#"{"accession": "AT1G01010.1", "source": "MASCP.PpdbReader", "result": {"peptides": [{"sequence": "PEPTIDEK", "experiments": [1, 2]}]}}

{"accession": "AT2G02020.1", "source": "custom", "kind": {"type": "peptides", "weight": {"scalar": "count"}}, "result": {"peptides": []}}
{"accession": "AT1G01010.1", "source": "MASCP.OrthologyReader", "result": {"conservation": [0.1, 0.2]}}
{"accession": "AT1G01010.1", "source": "MASCP.Unheardof"}
"#;
        let bundle = EvidenceBundle::from_ndjson(ndjson, &SourceCatalog::default()).unwrap();
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.num_records(), 4);
        assert_eq!(bundle.groups()[0].accession, "AT1G01010.1");

        let first = bundle.for_accession("AT1G01010.1");
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].name, "MASCP.PpdbReader");
        assert_eq!(first[0].source.peptides.len(), 1);
        assert_eq!(first[1].kind, Some(EvidenceKind::Conservation));
        assert!(first[2].kind.is_none());

        let second = bundle.for_accession("AT2G02020.1");
        assert_eq!(
            second[0].kind,
            Some(EvidenceKind::peptides(WeightRule::Scalar("count".into())))
        );
        assert!(bundle.for_accession("missing").is_empty());
    }

    #[test]
    fn test_unknown_source_result_is_not_read() {
        let ndjson = r#"{"accession": "A.1", "source": "MASCP.PpdbReader", "result": {"peptides": [{"sequence": "MK"}]}}
{"accession": "A.1", "source": "MASCP.FutureReader", "result": {"peptides": [{"sequence": "MK", "positions": ["n/a"]}]}}
{"accession": "A.1", "source": "MASCP.OtherReader", "result": [1, 2, 3]}
"#;
        let bundle = EvidenceBundle::from_ndjson(ndjson, &SourceCatalog::default()).unwrap();
        let evidence = bundle.for_accession("A.1");
        assert_eq!(evidence.len(), 3);
        assert!(evidence[1].kind.is_none());
        assert_eq!(evidence[1].name, "MASCP.FutureReader");
        assert_eq!(evidence[1].source, SourceResult::default());
        assert!(evidence[2].kind.is_none());
    }

    #[test]
    fn test_loose_result_shapes() {
        let ndjson = r#"{"accession": "A.1", "source": "MASCP.OrthologyReader", "result": {"conservation": ["high", 0.5]}}
{"accession": "A.1", "source": "MASCP.SnpReader", "result": {"snps": {"A.1": [[3]]}}}
{"source": "MASCP.SnpReader", "result": {"snps": {"A.1": [[4]]}}}
"#;
        let bundle = EvidenceBundle::from_ndjson(ndjson, &SourceCatalog::default()).unwrap();
        assert_eq!(bundle.num_records(), 2);
        let evidence = bundle.for_accession("A.1");
        assert_eq!(evidence[0].source.conservation.len(), 2);
        assert_eq!(evidence[1].source.snps("A.1")[0].position(), 3);

        let mut model = crate::models::SequenceModel::load("MKAPEK").unwrap();
        for e in evidence {
            model.aggregate(e);
        }
        assert_eq!(model.residues[1].conservation, Some(0.5));
        assert_eq!(model.residues[2].snp_coverage, 1);
        assert_eq!(model.dropped.malformed_values, 1);
    }

    #[test]
    fn test_bad_result_of_known_source_is_an_error() {
        let ndjson = r#"{"accession": "A.1", "source": "MASCP.UbiquitinReader", "result": {"peptides": [{"sequence": "MK", "positions": ["n/a"]}]}}"#;
        let err = EvidenceBundle::from_ndjson(ndjson, &SourceCatalog::default()).unwrap_err();
        assert!(matches!(err, ModhunterError::MalformedBundle { line: 1, .. }));
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let ndjson = "{\"accession\": \"A\", \"source\": \"s\"}\n{not json}\n";
        let err = EvidenceBundle::from_ndjson(ndjson, &SourceCatalog::default()).unwrap_err();
        match err {
            ModhunterError::MalformedBundle { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
