use std::path::PathBuf;

use polars::prelude::*;
use tracing::{error, info};

use crate::data_handling::tabular::load_table;
use crate::data_handling::Dataset;
use crate::error::LoadError;
use crate::models::{EvidenceRecord, EVIDENCE_TABLE_COLUMNS};

/// Headers shown to the reader, in `EVIDENCE_TABLE_COLUMNS` order.
pub const EVIDENCE_DISPLAY_HEADERS: [&str; 9] = [
    "Victim Drug",
    "Precipitant Drug",
    "Gene Name",
    "Gene type",
    "Impact on Victim Drug concentration",
    "AUC change (%)",
    "AUC fold change",
    "Evidence type",
    "Reference",
];

/// Documented victim/precipitant workbook (`tool.xlsx` by default).
pub struct EvidenceTable {
    pub path: PathBuf,
    pub sheet_idx: usize,
}

impl Dataset for EvidenceTable {
    fn load(&self) -> Result<DataFrame, LoadError> {
        let df = match load_table(&self.path, self.sheet_idx) {
            Ok(df) => df,
            Err(e) => {
                error!("Failed to read evidence table: {}", e);
                return Err(e);
            }
        };
        info!("Evidence table: {} rows", df.height());
        Ok(df)
    }
}

/// Evidence rows as a frame carrying the display headers.
pub fn evidence_frame(records: &[EvidenceRecord]) -> PolarsResult<DataFrame> {
    debug_assert_eq!(EVIDENCE_DISPLAY_HEADERS.len(), EVIDENCE_TABLE_COLUMNS.len());
    let columns: Vec<Column> = EVIDENCE_DISPLAY_HEADERS
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let values: Vec<Option<&str>> = records.iter().map(|r| r.cells()[idx]).collect();
            Series::new(PlSmallStr::from(*header), values).into()
        })
        .collect();
    DataFrame::new(columns)
}
