pub mod kinds;
pub mod normalize;
pub mod source;

pub use kinds::{EvidenceKind, SiteResolution, SourceCatalog, WeightRule};
pub use normalize::{ModificationSite, Normalized, NormalizedEvidence, SiteAnchor, WeightedPeptide};
pub use source::{Evidence, EvidenceSource, PeptideRecord, SnpRecord, SourceResult, Spectrum};
