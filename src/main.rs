use clap::Parser;
use log::{info, warn};
use modhunter::data_sources::evidence_bundle::EvidenceBundle;
use modhunter::errors::ModhunterError;
use modhunter::evidence::kinds::SourceCatalog;
use modhunter::models::{DroppedEvidence, SequenceModel};
use modhunter::protein::fasta::ProteinSequenceCollection;
use modhunter::protein::models::ProteinSequence;
use modhunter::scoring::parameters::ScoringParameters;
use modhunter::scoring::report::{write_model_to_csv, write_summary_to_csv, ProteinSummary};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Score residues for likely unreported modification sites")]
struct Cli {
    /// Protein sequences to score
    #[arg(short, long)]
    fasta: PathBuf,

    /// NDJSON file with one completed evidence source per line
    #[arg(short, long)]
    evidence: PathBuf,

    /// Directory for the per-protein and summary CSV files
    #[arg(short, long)]
    output: PathBuf,

    /// Optional JSON file overriding scoring parameters
    #[arg(short, long)]
    params: Option<PathBuf>,
}

/// Accessions can contain characters that are awkward in file names.
fn file_stem(accession: &str) -> String {
    accession
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn score_protein(
    protein: &ProteinSequence,
    bundle: &EvidenceBundle,
    params: &ScoringParameters,
    out_dir: &Path,
) -> std::result::Result<(ProteinSummary, DroppedEvidence), ModhunterError> {
    let mut model = SequenceModel::load(&protein.sequence)?;
    for evidence in bundle.for_accession(&protein.accession) {
        model.aggregate(evidence);
    }
    model.recompute_with(params);

    let stem = file_stem(&protein.accession);
    write_model_to_csv(
        &model,
        out_dir.join(format!("{}.residues.csv", stem)),
        out_dir.join(format!("{}.mods.csv", stem)),
    )?;
    Ok((ProteinSummary::new(&protein.accession, &model), model.dropped))
}

fn main() -> std::result::Result<(), ModhunterError> {
    // Initialize logging
    env_logger::init();
    let args = Cli::parse();

    let params = match &args.params {
        Some(path) => ScoringParameters::from_json_file(path)?,
        None => ScoringParameters::default(),
    };
    info!("Scoring with parameters: \n {:?}", params);

    let proteins = ProteinSequenceCollection::from_fasta_file(&args.fasta)?;
    let catalog = SourceCatalog::default();
    let bundle = EvidenceBundle::from_ndjson_file(&args.evidence, &catalog)?;

    for group in bundle.groups() {
        if proteins.get(&group.accession).is_none() {
            warn!(
                "{} evidence records for {} have no sequence in the fasta",
                group.evidence.len(),
                group.accession
            );
        }
    }

    if !args.output.exists() {
        std::fs::create_dir_all(&args.output)?;
    }

    let start = Instant::now();
    let results = proteins
        .sequences()
        .par_iter()
        .map(|protein| score_protein(protein, &bundle, &params, &args.output))
        .collect::<std::result::Result<Vec<_>, ModhunterError>>()?;
    info!("Scoring {} proteins took {:?}", results.len(), start.elapsed());

    let mut dropped = DroppedEvidence::default();
    let summaries: Vec<ProteinSummary> = results
        .into_iter()
        .map(|(summary, local_dropped)| {
            dropped.add(&local_dropped);
            summary
        })
        .collect();
    if dropped.total() > 0 {
        warn!("Evidence that could not be placed: {:?}", dropped);
    }

    write_summary_to_csv(&summaries, args.output.join("summary.csv"))?;
    Ok(())
}
