//! Side-by-side assembly of the gene-role analysis and the documented evidence.
//!
//! Building a report never fails: component errors are kept as messages next
//! to empty results so every section can still be rendered.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use polars::df;
use polars::prelude::*;
use serde::Serialize;
use tracing::{error, info};

use crate::analysis::evidence_lookup::lookup_evidence;
use crate::analysis::gene_roles::{GeneRoleEngine, InteractionReport, NarrativeItem};
use crate::data_handling::evidence_table::{evidence_frame, EVIDENCE_DISPLAY_HEADERS};
use crate::error::InferenceError;
use crate::helper_functions::dataframe_to_csv;
use crate::models::{holder_label, EvidenceRecord, NormalizedName, RoleVerdict};

const ROLE_TABLE_HEADERS: [&str; 4] = ["Gene", "Substrate", "Inducer", "Inhibitor"];

#[derive(Debug, Clone, Serialize)]
pub struct DdiReport {
    pub drug_a: String,
    pub drug_b: String,
    pub narrative: Vec<NarrativeItem>,
    pub victim_perpetrator: Vec<String>,
    pub evidence: Vec<EvidenceRecord>,
    pub evidence_note: String,
    pub errors: Vec<String>,
}

impl DdiReport {
    pub fn build(
        gene_df: &DataFrame,
        evidence_df: &DataFrame,
        drug_a: &str,
        drug_b: &str,
        engine: &GeneRoleEngine,
    ) -> Self {
        let (drug_a, drug_b) = (drug_a.trim().to_string(), drug_b.trim().to_string());
        let mut errors = Vec::new();

        let evidence = match lookup_evidence(evidence_df, &drug_a, &drug_b) {
            Ok(rows) => rows,
            Err(e) => {
                error!("Evidence lookup failed: {}", e);
                errors.push(e.to_string());
                Vec::new()
            }
        };

        let analysis = match engine.infer(gene_df, &drug_a, &drug_b) {
            Ok(report) => Some(report),
            Err(e) => {
                error!("Gene-role analysis failed: {}", e);
                errors.push(analysis_message(&e));
                None
            }
        };

        let narrative = match &analysis {
            Some(report) => report.narrative(),
            None => vec![NarrativeItem::Text(errors.last().cloned().unwrap_or_default())],
        };
        let victim_perpetrator = analysis.as_ref().map(InteractionReport::verdict_lines).unwrap_or_default();
        let has_victim = analysis.as_ref().is_some_and(InteractionReport::has_victim);

        let evidence_note = if evidence.is_empty() {
            format!(
                "No clinical evidence found between {drug_a} and {drug_b} to confirm the possibility of DDI."
            )
        } else if has_victim {
            format!(
                "Note: {drug_a} is identified as a victim drug and {drug_b} is identified as a perpetrator drug in the interactions listed above."
            )
        } else {
            String::new()
        };

        info!(
            "Report for '{}' / '{}': {} verdict line(s), {} evidence row(s)",
            drug_a,
            drug_b,
            victim_perpetrator.len(),
            evidence.len()
        );

        DdiReport { drug_a, drug_b, narrative, victim_perpetrator, evidence, evidence_note, errors }
    }

    fn role_rows(&self) -> &[RoleVerdict] {
        self.narrative
            .iter()
            .find_map(|item| match item {
                NarrativeItem::RoleTable(rows) => Some(rows.as_slice()),
                NarrativeItem::Text(_) => None,
            })
            .unwrap_or(&[])
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "DDI Analysis:");
        for item in &self.narrative {
            if let NarrativeItem::Text(line) = item {
                let _ = writeln!(out, "{line}");
            }
        }

        let _ = writeln!(out, "\nPotential Drug-Drug Interactions Based on their Gene:");
        let roles = self.role_rows();
        if !roles.is_empty() {
            let rows: Vec<Vec<String>> = roles
                .iter()
                .map(|v| {
                    vec![
                        v.gene.clone(),
                        holder_label(&v.substrate).to_string(),
                        holder_label(&v.inducer).to_string(),
                        holder_label(&v.inhibitor).to_string(),
                    ]
                })
                .collect();
            out.push_str(&render_table(&ROLE_TABLE_HEADERS, &rows));
        }

        let _ = writeln!(out, "\nVictim-Perpetrator Analysis:");
        for line in &self.victim_perpetrator {
            let _ = writeln!(out, "{line}");
        }

        let _ = writeln!(out, "\nEvidence of Documented Drug Interactions:");
        if !self.evidence.is_empty() {
            let rows: Vec<Vec<String>> = self
                .evidence
                .iter()
                .map(|r| r.cells().iter().map(|c| c.unwrap_or("").to_string()).collect())
                .collect();
            out.push_str(&render_table(&EVIDENCE_DISPLAY_HEADERS, &rows));
        }
        if !self.evidence_note.is_empty() {
            let _ = writeln!(out, "{}", self.evidence_note);
        }

        for err in &self.errors {
            let _ = writeln!(out, "\n[error] {err}");
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Writes `gene_roles.csv` and `evidence.csv` into `dir`.
    pub fn export_csv(&self, dir: &Path) -> PolarsResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let roles = self.role_rows();
        let mut role_df = df![
            ROLE_TABLE_HEADERS[0] => roles.iter().map(|v| v.gene.clone()).collect::<Vec<_>>(),
            ROLE_TABLE_HEADERS[1] => holder_column(roles, |v| &v.substrate),
            ROLE_TABLE_HEADERS[2] => holder_column(roles, |v| &v.inducer),
            ROLE_TABLE_HEADERS[3] => holder_column(roles, |v| &v.inhibitor),
        ]?;
        let mut evidence_df = evidence_frame(&self.evidence)?;

        let role_path = dir.join("gene_roles.csv");
        let evidence_path = dir.join("evidence.csv");
        dataframe_to_csv(&mut role_df, &role_path)?;
        dataframe_to_csv(&mut evidence_df, &evidence_path)?;
        info!("Exported {} and {}", role_path.display(), evidence_path.display());
        Ok(vec![role_path, evidence_path])
    }
}

fn holder_column(
    roles: &[RoleVerdict],
    pick: fn(&RoleVerdict) -> &Option<NormalizedName>,
) -> Vec<String> {
    roles.iter().map(|v| holder_label(pick(v)).to_string()).collect()
}

fn analysis_message(e: &InferenceError) -> String {
    match e {
        InferenceError::Schema(schema) => format!("Error: {schema}"),
        InferenceError::Analysis(analysis) => analysis.to_string(),
    }
}

/// Fixed-width plain-text table.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = table_line(headers.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("|-{}-|\n", rule.join("-|-")));
    for row in rows {
        out.push_str(&table_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells.zip(widths).map(|(c, &w)| format!("{c:<w$}")).collect();
    format!("| {} |\n", padded.join(" | "))
}
