use super::models::{ProteinSequence, ProteinSequenceBuilder};
use crate::errors::Result;
use log::*;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

#[derive(Debug)]
pub struct ProteinSequenceCollection {
    sequences: Vec<ProteinSequence>,
    index: HashMap<String, usize>,
}

impl ProteinSequenceCollection {
    /// Parses every record; empty records and repeated accessions are
    /// skipped so each accession maps to exactly one protein.
    pub fn from_fasta(fasta: &str) -> ProteinSequenceCollection {
        let mut out = ProteinSequenceCollection {
            sequences: vec![],
            index: HashMap::new(),
        };
        let mut num = 0;
        let mut current_sequence: Option<ProteinSequenceBuilder> = None;
        for line in fasta.lines() {
            if let Some(header) = line.strip_prefix('>') {
                if let Some(done) = current_sequence.take() {
                    out.push(done);
                }
                current_sequence =
                    Some(ProteinSequenceBuilder::new(num).with_description(header.trim()));
                num += 1;
            } else if let Some(builder) = current_sequence.take() {
                current_sequence = Some(builder.append_sequence(line.trim()));
            } else if !line.trim().is_empty() {
                warn!("Skipping sequence line before the first fasta header");
            }
        }
        if let Some(done) = current_sequence {
            out.push(done);
        }
        out
    }

    fn push(&mut self, builder: ProteinSequenceBuilder) {
        let protein = builder.build();
        if protein.sequence.is_empty() {
            warn!("Skipping empty fasta record {:?}", protein.description);
            return;
        }
        if self.index.contains_key(&protein.accession) {
            warn!(
                "Skipping repeated accession {} in fasta record {:?}",
                protein.accession, protein.description
            );
            return;
        }
        self.index
            .insert(protein.accession.clone(), self.sequences.len());
        self.sequences.push(protein);
    }

    pub fn from_fasta_file<P: AsRef<Path>>(file: P) -> Result<ProteinSequenceCollection> {
        let st = Instant::now();
        let fasta = std::fs::read_to_string(file.as_ref())?;
        let out = Self::from_fasta(&fasta);
        info!(
            "Read {} proteins from {:?} in {:?}",
            out.len(),
            file.as_ref(),
            st.elapsed()
        );
        Ok(out)
    }

    pub fn get(&self, accession: &str) -> Option<&ProteinSequence> {
        self.index.get(accession).map(|&i| &self.sequences[i])
    }

    pub fn sequences(&self) -> &[ProteinSequence] {
        &self.sequences
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

// Tests ...
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fasta_parsing() {
        let dummy_fasta_string = r#">mysupercoolprotein
PEPTIDEPINK
PEPTIDEPINKPEPTIDEPINK
PEPTIDEPINK

> mysupercoolprotein2 with a description
PEPTIDEPLNK
PEPTIDEPLNK

"#;
        let fasta = ProteinSequenceCollection::from_fasta(dummy_fasta_string);
        assert_eq!(fasta.sequences.len(), 2);
        assert_eq!(
            fasta.sequences[0].sequence.as_ref(),
            "PEPTIDEPINKPEPTIDEPINKPEPTIDEPINKPEPTIDEPINK"
        );
        assert_eq!(fasta.sequences[1].sequence.as_ref(), "PEPTIDEPLNKPEPTIDEPLNK");
        assert_eq!(fasta.sequences[0].accession, "mysupercoolprotein");
        assert_eq!(fasta.sequences[1].accession, "mysupercoolprotein2");
        assert_eq!(
            fasta.sequences[1].description,
            "mysupercoolprotein2 with a description"
        );
        assert!(fasta.get("mysupercoolprotein2").is_some());
        assert!(fasta.get("nope").is_none());
    }

    #[test]
    fn test_empty_records_are_skipped() {
        let fasta = ProteinSequenceCollection::from_fasta(">empty\n\n>full\nMK*\n");
        assert_eq!(fasta.len(), 1);
        assert_eq!(fasta.sequences[0].accession, "full");
        assert_eq!(fasta.sequences[0].sequence.as_ref(), "MK");
    }

    #[test]
    fn test_repeated_accessions_keep_first() {
        let fasta = ProteinSequenceCollection::from_fasta(
            ">AT1G01010.1 first\nMKA\n>AT1G01020.1\nPEK\n>AT1G01010.1 second\nMKAAAA\n",
        );
        assert_eq!(fasta.len(), 2);
        let first = fasta.get("AT1G01010.1").unwrap();
        assert_eq!(first.sequence.as_ref(), "MKA");
        assert_eq!(first.description, "AT1G01010.1 first");
        assert_eq!(fasta.get("AT1G01020.1").unwrap().sequence.as_ref(), "PEK");
    }
}
