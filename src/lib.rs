//! Per-residue scoring of proteins for modification sites that no source
//! has reported yet.
//!
//! Evidence from independent sources (observed peptides, predicted
//! cleavages, variants, known modification sites, conservation) is folded
//! into a [`SequenceModel`] as each source completes. Abundance and residue
//! scores are re-derived on demand from whatever has arrived.

pub mod coverage;
pub mod data_sources;
pub mod digest;
pub mod errors;
pub mod evidence;
pub mod models;
pub mod protein;
pub mod scoring;

pub use coverage::aggregator::AggregationReport;
pub use errors::{ModhunterError, Result};
pub use models::SequenceModel;
