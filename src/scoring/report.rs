use crate::errors::Result;
use crate::models::SequenceModel;
use csv::Writer;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

fn fmt_optional<T: ToString>(value: Option<T>) -> String {
    value.map(|x| x.to_string()).unwrap_or_default()
}

/// Protein-level outcome of a scoring run.
#[derive(Debug, Clone, Serialize)]
pub struct ProteinSummary {
    pub accession: String,
    pub length: usize,
    pub tryptic_total: usize,
    pub peptide_total: f64,
    pub predicted_total: u32,
    pub abundance_score: u8,
    pub n_terminal: Option<usize>,
    pub c_terminal: Option<usize>,
    pub confirmed_mods: usize,
    pub max_score: u8,
    pub dropped_evidence: usize,
}

impl ProteinSummary {
    pub fn new(accession: &str, model: &SequenceModel) -> Self {
        Self {
            accession: accession.to_string(),
            length: model.len(),
            tryptic_total: model.tryptic_total,
            peptide_total: model.peptide_total,
            predicted_total: model.predicted_total,
            abundance_score: model.abundance_score,
            n_terminal: model.n_terminal,
            c_terminal: model.c_terminal,
            confirmed_mods: model.confirmed_mods.len(),
            max_score: model.residues.iter().map(|r| r.score).max().unwrap_or(0),
            dropped_evidence: model.dropped.total(),
        }
    }

    pub fn get_csv_labels() -> [&'static str; 11] {
        [
            "accession",
            "length",
            "tryptic_total",
            "peptide_total",
            "predicted_total",
            "abundance_score",
            "n_terminal",
            "c_terminal",
            "confirmed_mods",
            "max_score",
            "dropped_evidence",
        ]
    }

    pub fn as_csv_record(&self) -> [String; 11] {
        [
            self.accession.clone(),
            self.length.to_string(),
            self.tryptic_total.to_string(),
            self.peptide_total.to_string(),
            self.predicted_total.to_string(),
            self.abundance_score.to_string(),
            fmt_optional(self.n_terminal),
            fmt_optional(self.c_terminal),
            self.confirmed_mods.to_string(),
            self.max_score.to_string(),
            self.dropped_evidence.to_string(),
        ]
    }
}

fn residue_labels() -> [&'static str; 9] {
    [
        "position",
        "residue",
        "score",
        "gator_coverage",
        "predicted_coverage",
        "reader_coverage",
        "snp_coverage",
        "conservation",
        "terminal_zone",
    ]
}

/// One row per residue, positions 1-based.
pub fn write_residues<W: Write>(model: &SequenceModel, writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(residue_labels())?;
    for ((idx, residue), aa) in model
        .residues
        .iter()
        .enumerate()
        .zip(model.whole_sequence.chars())
    {
        writer.write_record([
            (idx + 1).to_string(),
            aa.to_string(),
            residue.score.to_string(),
            residue.gator_coverage.to_string(),
            residue.predicted_coverage.to_string(),
            residue.reader_coverage.to_string(),
            residue.snp_coverage.to_string(),
            fmt_optional(residue.conservation),
            model.in_terminal_zone(idx).to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Confirmed modifications in arrival order, positions 1-based.
pub fn write_confirmed_mods<W: Write>(model: &SequenceModel, writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(["position", "residue", "label"])?;
    for m in model.confirmed_mods.iter() {
        let residue = model
            .whole_sequence
            .get(m.position..m.position + 1)
            .unwrap_or_default();
        writer.write_record([(m.position + 1).to_string(), residue.to_string(), m.label.clone()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_summary<W: Write>(summaries: &[ProteinSummary], writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(ProteinSummary::get_csv_labels())?;
    for summary in summaries {
        writer.write_record(&summary.as_csv_record())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_model_to_csv<P: AsRef<Path>>(
    model: &SequenceModel,
    residues_path: P,
    mods_path: P,
) -> Result<()> {
    let start = Instant::now();
    write_residues(model, std::fs::File::create(residues_path.as_ref())?)?;
    write_confirmed_mods(model, std::fs::File::create(mods_path.as_ref())?)?;
    log::debug!(
        "Writing took {:?} -> {:?}",
        start.elapsed(),
        residues_path.as_ref()
    );
    Ok(())
}

pub fn write_summary_to_csv<P: AsRef<Path>>(summaries: &[ProteinSummary], out_path: P) -> Result<()> {
    let start = Instant::now();
    write_summary(summaries, std::fs::File::create(out_path.as_ref())?)?;
    log::info!(
        "Writing summary of {} proteins took {:?} -> {:?}",
        summaries.len(),
        start.elapsed(),
        out_path.as_ref()
    );
    Ok(())
}
