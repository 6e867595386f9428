pub mod evidence_lookup;
pub mod gene_roles;
