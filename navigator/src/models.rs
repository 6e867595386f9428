use std::fmt;

use polars::error::{PolarsError, PolarsResult};
use polars::frame::DataFrame;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::helper_functions::{require_columns, string_values};

// ─── Column names ────────────────────────────────────────────────────────────

pub const COMPOUND_NAME: &str = "Compound name";
pub const INTERACTING_GENE: &str = "Interacting gene name";
pub const COMPOUND_GENE_RELATION: &str = "Compound Gene Relation";

pub const GENE_TABLE_COLUMNS: [&str; 3] = [COMPOUND_NAME, INTERACTING_GENE, COMPOUND_GENE_RELATION];

pub const OBJECT_COMPOUND: &str = "Object compound";
pub const PRECIPITANT_COMPOUND: &str = "Precipitant compound";
pub const GENE_NAME: &str = "Gene Name";
pub const GENE_TYPE: &str = "Gene type";
pub const IMPACT_ON_CONCENTRATION: &str = "Impact on Object concentration";
pub const AUC_CHANGE_PERCENT: &str = "AUC change (%)";
pub const AUC_FOLD_CHANGE: &str = "AUC fold change";
pub const EVIDENCE_TYPE: &str = "Evidence type";
pub const REFERENCE: &str = "Reference";

pub const EVIDENCE_TABLE_COLUMNS: [&str; 9] = [
    OBJECT_COMPOUND,
    PRECIPITANT_COMPOUND,
    GENE_NAME,
    GENE_TYPE,
    IMPACT_ON_CONCENTRATION,
    AUC_CHANGE_PERCENT,
    AUC_FOLD_CHANGE,
    EVIDENCE_TYPE,
    REFERENCE,
];

pub(crate) const GENE_TABLE: &str = "gene-interaction";
pub(crate) const EVIDENCE_TABLE: &str = "evidence";

// ─── Names ───────────────────────────────────────────────────────────────────

/// Compound name with surrounding whitespace removed and case folded.
///
/// Every comparison between a queried name and a stored name goes through
/// this type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedName(String);

impl NormalizedName {
    pub fn new(raw: &str) -> Self {
        NormalizedName(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, raw: &str) -> bool {
        NormalizedName::new(raw) == *self
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Table rows ──────────────────────────────────────────────────────────────

/// One row of the gene-interaction table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompoundRecord {
    pub compound_name: Option<String>,
    pub interacting_gene: Option<String>,
    pub relation: Option<String>,
}

impl CompoundRecord {
    pub fn from_frame<E>(df: &DataFrame) -> Result<Vec<CompoundRecord>, E>
    where
        E: From<SchemaError> + From<PolarsError>,
    {
        require_columns(df, GENE_TABLE, &GENE_TABLE_COLUMNS)?;
        let names = string_values(df, COMPOUND_NAME)?;
        let genes = string_values(df, INTERACTING_GENE)?;
        let relations = string_values(df, COMPOUND_GENE_RELATION)?;

        Ok(names
            .into_iter()
            .zip(genes)
            .zip(relations)
            .map(|((compound_name, interacting_gene), relation)| CompoundRecord {
                compound_name,
                interacting_gene,
                relation,
            })
            .collect())
    }
}

/// One documented victim/precipitant observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceRecord {
    pub object_compound: Option<String>,
    pub precipitant_compound: Option<String>,
    pub gene_name: Option<String>,
    pub gene_type: Option<String>,
    pub impact_on_concentration: Option<String>,
    pub auc_change_percent: Option<String>,
    pub auc_fold_change: Option<String>,
    pub evidence_type: Option<String>,
    pub reference: Option<String>,
}

impl EvidenceRecord {
    pub fn from_frame<E>(df: &DataFrame) -> Result<Vec<EvidenceRecord>, E>
    where
        E: From<SchemaError> + From<PolarsError>,
    {
        require_columns(df, EVIDENCE_TABLE, &EVIDENCE_TABLE_COLUMNS)?;
        let mut columns = EVIDENCE_TABLE_COLUMNS
            .iter()
            .map(|name| string_values(df, name).map(Vec::into_iter))
            .collect::<PolarsResult<Vec<_>>>()?;

        let mut records = Vec::with_capacity(df.height());
        for _ in 0..df.height() {
            let mut take = |idx: usize| columns[idx].next().flatten();
            records.push(EvidenceRecord {
                object_compound: take(0),
                precipitant_compound: take(1),
                gene_name: take(2),
                gene_type: take(3),
                impact_on_concentration: take(4),
                auc_change_percent: take(5),
                auc_fold_change: take(6),
                evidence_type: take(7),
                reference: take(8),
            });
        }
        Ok(records)
    }

    /// Cells in `EVIDENCE_TABLE_COLUMNS` order.
    pub fn cells(&self) -> [Option<&str>; 9] {
        [
            self.object_compound.as_deref(),
            self.precipitant_compound.as_deref(),
            self.gene_name.as_deref(),
            self.gene_type.as_deref(),
            self.impact_on_concentration.as_deref(),
            self.auc_change_percent.as_deref(),
            self.auc_fold_change.as_deref(),
            self.evidence_type.as_deref(),
            self.reference.as_deref(),
        ]
    }
}

// ─── Roles ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Substrate,
    Inducer,
    Inhibitor,
}

impl Role {
    pub fn keyword(self) -> &'static str {
        match self {
            Role::Substrate => "substrate",
            Role::Inducer => "inducer",
            Role::Inhibitor => "inhibitor",
        }
    }
}

/// How a free-text relation is searched for role keywords.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RoleMatch {
    /// Keyword appears anywhere in the lowercased relation.
    #[default]
    Substring,
    /// Keyword (or its plural) is a whole hyphenated token of the relation.
    Token,
}

/// Role assignments for one gene shared by the ordered pair (drug A, drug B).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleVerdict {
    pub gene: String,
    pub substrate: Option<NormalizedName>,
    pub inducer: Option<NormalizedName>,
    pub inhibitor: Option<NormalizedName>,
}

impl RoleVerdict {
    /// Drug A is the victim when it is the substrate and drug B acts on the
    /// same gene as inducer or inhibitor.
    pub fn classify(&self) -> VictimPerpetratorVerdict {
        match (&self.substrate, &self.inducer, &self.inhibitor) {
            (Some(victim), Some(_), _) | (Some(victim), _, Some(_)) => {
                VictimPerpetratorVerdict::Victim(victim.clone())
            }
            _ => VictimPerpetratorVerdict::Inconclusive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VictimPerpetratorVerdict {
    Victim(NormalizedName),
    Inconclusive,
}

pub(crate) fn holder_label(holder: &Option<NormalizedName>) -> &str {
    holder.as_ref().map_or("none", NormalizedName::as_str)
}
