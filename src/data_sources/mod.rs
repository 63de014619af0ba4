pub mod evidence_bundle;
