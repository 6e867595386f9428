//! Drug-drug interaction navigator.
//!
//! Two independent components answer whether an ordered drug pair plausibly
//! interacts:
//!
//! * [`analysis::gene_roles`] matches both drugs against a gene-interaction
//!   table, classifies each shared gene's roles and derives a
//!   victim/perpetrator verdict per gene.
//! * [`analysis::evidence_lookup`] filters a documented-evidence table for
//!   the same (victim, precipitant) pair.
//!
//! [`report::DdiReport`] puts both side by side.

pub mod analysis;
pub mod config;
pub mod data_handling;
pub mod error;
pub mod helper_functions;
pub mod models;
pub mod report;

pub use analysis::evidence_lookup::lookup_evidence;
pub use analysis::gene_roles::{infer_interaction, GeneRoleEngine, InteractionReport};
