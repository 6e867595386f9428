//! Gene-role inference for an ordered drug pair.
//!
//! Drug A is always the victim candidate and is only checked for a
//! substrate relation; drug B is always the perpetrator candidate and is only
//! checked for inducer/inhibitor relations. Shared genes are reported in
//! lexicographic order.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use polars::frame::DataFrame;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::InferenceError;
use crate::models::{
    holder_label, CompoundRecord, NormalizedName, Role, RoleMatch, RoleVerdict,
    VictimPerpetratorVerdict,
};

const TOKEN_PATTERN: &str = r"[\p{L}\p{N}-]+";

fn token_regex() -> &'static Regex {
    static TOKENS: OnceLock<Regex> = OnceLock::new();
    TOKENS.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern compiles"))
}

impl RoleMatch {
    /// Whether a free-text relation grants `role`.
    pub fn holds(self, relation: &str, role: Role) -> bool {
        let relation = relation.to_lowercase();
        let keyword = role.keyword();
        match self {
            RoleMatch::Substring => relation.contains(keyword),
            RoleMatch::Token => token_regex().find_iter(&relation).any(|token| {
                let token = token.as_str();
                token == keyword || token.strip_suffix('s') == Some(keyword)
            }),
        }
    }
}

// ─── Output ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum NarrativeItem {
    Text(String),
    RoleTable(Vec<RoleVerdict>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InteractionOutcome {
    /// The named drug has no gene rows; drug A is checked before drug B.
    DrugNotFound(NormalizedName),
    NoSharedGenes,
    SharedGenes(Vec<RoleVerdict>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionReport {
    pub drug_a: NormalizedName,
    pub drug_b: NormalizedName,
    pub outcome: InteractionOutcome,
}

impl InteractionReport {
    pub fn shared_genes(&self) -> Vec<&str> {
        match &self.outcome {
            InteractionOutcome::SharedGenes(verdicts) => {
                verdicts.iter().map(|v| v.gene.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn role_verdicts(&self) -> &[RoleVerdict] {
        match &self.outcome {
            InteractionOutcome::SharedGenes(verdicts) => verdicts,
            _ => &[],
        }
    }

    /// Summary line, DDI verdict line and, for shared genes, the role table.
    pub fn narrative(&self) -> Vec<NarrativeItem> {
        let (a, b) = (&self.drug_a, &self.drug_b);
        match &self.outcome {
            InteractionOutcome::DrugNotFound(drug) => vec![NarrativeItem::Text(format!(
                "Warning: The drug '{drug}' was not found in the dataset."
            ))],
            InteractionOutcome::NoSharedGenes => vec![
                NarrativeItem::Text(format!("No common genes found between '{a}' and '{b}'.")),
                NarrativeItem::Text(
                    "Cannot report possibility of Drug-Drug Interaction (DDI).".to_string(),
                ),
            ],
            InteractionOutcome::SharedGenes(verdicts) => vec![
                NarrativeItem::Text(format!(
                    "Common genes found between '{a}' and '{b}': {}",
                    self.shared_genes().join(", ")
                )),
                NarrativeItem::Text(
                    "Drug-Drug Interaction (DDI) is possible based on these common genes."
                        .to_string(),
                ),
                NarrativeItem::RoleTable(verdicts.clone()),
            ],
        }
    }

    /// One victim/perpetrator statement per shared gene.
    pub fn verdict_lines(&self) -> Vec<String> {
        let (a, b) = (&self.drug_a, &self.drug_b);
        self.role_verdicts()
            .iter()
            .map(|verdict| match verdict.classify() {
                VictimPerpetratorVerdict::Victim(victim) => {
                    format!("'{}', '{victim}' is likely to be a victim drug.", verdict.gene)
                }
                VictimPerpetratorVerdict::Inconclusive => format!(
                    "'{}', no sufficient information found for '{a}' as victim drug and '{b}' as perpetrator drug.",
                    verdict.gene
                ),
            })
            .collect()
    }

    pub fn has_victim(&self) -> bool {
        self.role_verdicts()
            .iter()
            .any(|v| matches!(v.classify(), VictimPerpetratorVerdict::Victim(_)))
    }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct GeneRoleEngine {
    pub role_match: RoleMatch,
}

impl GeneRoleEngine {
    pub fn new(role_match: RoleMatch) -> Self {
        Self { role_match }
    }

    pub fn infer(
        &self,
        df: &DataFrame,
        drug_a: &str,
        drug_b: &str,
    ) -> Result<InteractionReport, InferenceError> {
        let records = CompoundRecord::from_frame::<InferenceError>(df)?;
        Ok(self.infer_records(&records, drug_a, drug_b))
    }

    pub fn infer_records(
        &self,
        records: &[CompoundRecord],
        drug_a: &str,
        drug_b: &str,
    ) -> InteractionReport {
        let drug_a = NormalizedName::new(drug_a);
        let drug_b = NormalizedName::new(drug_b);

        let rows_a: Vec<&CompoundRecord> = rows_for(records, &drug_a).collect();
        let rows_b: Vec<&CompoundRecord> = rows_for(records, &drug_b).collect();
        let genes_a = gene_set(&rows_a);
        let genes_b = gene_set(&rows_b);

        let outcome = if genes_a.is_empty() {
            warn!("The drug '{}' was not found in the dataset", drug_a);
            InteractionOutcome::DrugNotFound(drug_a.clone())
        } else if genes_b.is_empty() {
            warn!("The drug '{}' was not found in the dataset", drug_b);
            InteractionOutcome::DrugNotFound(drug_b.clone())
        } else {
            let verdicts: Vec<RoleVerdict> = genes_a
                .intersection(&genes_b)
                .map(|gene| RoleVerdict {
                    gene: gene.to_string(),
                    substrate: self
                        .holds(&rows_a, gene, Role::Substrate)
                        .then(|| drug_a.clone()),
                    inducer: self.holds(&rows_b, gene, Role::Inducer).then(|| drug_b.clone()),
                    inhibitor: self
                        .holds(&rows_b, gene, Role::Inhibitor)
                        .then(|| drug_b.clone()),
                })
                .inspect(|v| {
                    debug!(
                        "{}: substrate={} inducer={} inhibitor={}",
                        v.gene,
                        holder_label(&v.substrate),
                        holder_label(&v.inducer),
                        holder_label(&v.inhibitor)
                    )
                })
                .collect();

            info!(
                "'{}' and '{}' share {} gene(s) ({} and {} genes respectively)",
                drug_a,
                drug_b,
                verdicts.len(),
                genes_a.len(),
                genes_b.len()
            );
            if verdicts.is_empty() {
                InteractionOutcome::NoSharedGenes
            } else {
                InteractionOutcome::SharedGenes(verdicts)
            }
        };

        InteractionReport { drug_a, drug_b, outcome }
    }

    /// Any row of the drug for `gene` carries `role`.
    fn holds(&self, rows: &[&CompoundRecord], gene: &str, role: Role) -> bool {
        rows.iter()
            .filter(|r| r.interacting_gene.as_deref() == Some(gene))
            .filter_map(|r| r.relation.as_deref())
            .any(|relation| self.role_match.holds(relation, role))
    }
}

/// Runs the engine with the default substring role matching.
pub fn infer_interaction(
    df: &DataFrame,
    drug_a: &str,
    drug_b: &str,
) -> Result<InteractionReport, InferenceError> {
    GeneRoleEngine::default().infer(df, drug_a, drug_b)
}

fn rows_for<'a>(
    records: &'a [CompoundRecord],
    drug: &'a NormalizedName,
) -> impl Iterator<Item = &'a CompoundRecord> + 'a {
    records
        .iter()
        .filter(move |r| r.compound_name.as_deref().is_some_and(|name| drug.matches(name)))
}

fn gene_set<'a>(rows: &[&'a CompoundRecord]) -> BTreeSet<&'a str> {
    rows.iter().filter_map(|r| r.interacting_gene.as_deref()).collect()
}
