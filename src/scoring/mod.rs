pub mod abundance;
pub mod parameters;
pub mod report;
pub mod residue_scores;
