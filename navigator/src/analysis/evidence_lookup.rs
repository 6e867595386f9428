//! Exact-match search over the documented-interaction table.
//!
//! The search is directional: the first name is only ever compared with
//! `Object compound` (the victim) and the second with `Precipitant compound`.

use polars::prelude::*;
use tracing::{debug, info};

use crate::error::EvidenceError;
use crate::helper_functions::{require_columns, string_values};
use crate::models::{
    EvidenceRecord, NormalizedName, EVIDENCE_TABLE, EVIDENCE_TABLE_COLUMNS, OBJECT_COMPOUND,
    PRECIPITANT_COMPOUND,
};

/// All evidence rows documenting `victim` as object and `precipitant` as
/// precipitant compound. Rows are returned in table order, duplicates kept.
pub fn lookup_evidence(
    df: &DataFrame,
    victim: &str,
    precipitant: &str,
) -> Result<Vec<EvidenceRecord>, EvidenceError> {
    require_columns(df, EVIDENCE_TABLE, &EVIDENCE_TABLE_COLUMNS)?;

    let victim = NormalizedName::new(victim);
    let precipitant = NormalizedName::new(precipitant);

    let objects = string_values(df, OBJECT_COMPOUND)?;
    let precipitants = string_values(df, PRECIPITANT_COMPOUND)?;
    let is_pair = |cell: &Option<String>, name: &NormalizedName| {
        cell.as_deref().is_some_and(|raw| name.matches(raw))
    };
    let flags: Vec<bool> = objects
        .iter()
        .zip(&precipitants)
        .map(|(o, p)| is_pair(o, &victim) && is_pair(p, &precipitant))
        .collect();
    let mask = BooleanChunked::from_slice(PlSmallStr::from_static("pair"), &flags);

    let hits = df.filter(&mask)?;
    debug!("Evidence filter kept {} of {} rows", hits.height(), df.height());

    let records = EvidenceRecord::from_frame::<EvidenceError>(&hits)?;
    info!(
        "Found {} documented interaction(s) for victim '{}' and precipitant '{}'",
        records.len(),
        victim,
        precipitant
    );
    Ok(records)
}
