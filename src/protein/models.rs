use regex::Regex;
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone)]
pub struct ProteinSequence {
    pub id: u32, // Self incremental identifier within the fasta file.
    pub accession: String,
    pub description: String,
    pub sequence: Arc<str>,
}

#[derive(Debug)]
pub struct ProteinSequenceBuilder {
    pub id: u32,
    pub description: Option<String>,
    pub sequence: String,
}

impl ProteinSequenceBuilder {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            description: None,
            sequence: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn append_sequence(mut self, sequence: &str) -> Self {
        self.sequence.push_str(sequence);
        self
    }

    /// Finishes the record, cleaning the accumulated residues.
    ///
    /// The accession is the first whitespace-delimited token of the header.
    pub fn build(self) -> ProteinSequence {
        let description = self.description.unwrap_or_default();
        let accession = description
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        ProteinSequence {
            id: self.id,
            accession,
            description,
            sequence: clean_sequence(&self.sequence).into(),
        }
    }
}

fn annotation_regex() -> &'static Regex {
    static ANNOTATION: OnceLock<Regex> = OnceLock::new();
    ANNOTATION.get_or_init(|| Regex::new(r"\(.*\)").expect("annotation regex is valid"))
}

/// Strips everything that is not a residue letter from a raw sequence.
///
/// Parenthesised annotations are removed as a whole (greedily), then
/// any non-letter is dropped and the result is upper-cased.
///
/// ```
/// use modhunter::protein::models::clean_sequence;
/// assert_eq!(clean_sequence("mkp 12 VK(phospho)RAG\n"), "MKPVKRAG");
/// ```
pub fn clean_sequence(raw: &str) -> String {
    let without_spaces: String = raw
        .chars()
        .filter(|c| *c != '\u{a0}' && !c.is_whitespace() && !c.is_ascii_digit())
        .collect();
    annotation_regex()
        .replace_all(&without_spaces, "")
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
