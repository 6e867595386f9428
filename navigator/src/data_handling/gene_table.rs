use std::collections::BTreeSet;
use std::path::PathBuf;

use polars::frame::DataFrame;
use tracing::{error, info};

use crate::data_handling::tabular::load_table;
use crate::data_handling::Dataset;
use crate::error::{InferenceError, LoadError};
use crate::models::{NormalizedName, GENE_TABLE, COMPOUND_NAME};
use crate::helper_functions::{require_columns, string_values};

/// Compound → gene → relation workbook (`ddiTable.xlsx` by default).
pub struct GeneInteractionTable {
    pub path: PathBuf,
    pub sheet_idx: usize,
}

impl Dataset for GeneInteractionTable {
    fn load(&self) -> Result<DataFrame, LoadError> {
        let df = match load_table(&self.path, self.sheet_idx) {
            Ok(df) => df,
            Err(e) => {
                error!("Failed to read gene-interaction table: {}", e);
                return Err(e);
            }
        };
        info!("Gene-interaction table: {} rows", df.height());
        Ok(df)
    }
}

/// Distinct compound names offered for selection, sorted.
pub fn list_compounds(df: &DataFrame) -> Result<Vec<String>, InferenceError> {
    require_columns(df, GENE_TABLE, &[COMPOUND_NAME])?;
    let names: BTreeSet<String> = string_values(df, COMPOUND_NAME)?
        .into_iter()
        .flatten()
        .collect();
    Ok(names.into_iter().collect())
}

/// Same as [`list_compounds`] minus the already selected compound.
pub fn list_compounds_excluding(df: &DataFrame, exclude: &str) -> Result<Vec<String>, InferenceError> {
    let exclude = NormalizedName::new(exclude);
    let mut names = list_compounds(df)?;
    names.retain(|name| !exclude.matches(name));
    Ok(names)
}
