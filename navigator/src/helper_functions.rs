use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

use polars::error::PolarsResult;
use polars::frame::DataFrame;
use polars::prelude::{CsvReadOptions, CsvWriter, DataType, SerReader, SerWriter};

use crate::error::SchemaError;

/// Base directory for the default `data/` tables: `$PROJECT_ROOT`, else the
/// working directory.
pub fn project_root() -> PathBuf {
    env::var_os("PROJECT_ROOT")
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Reads a delimited file with every column kept as a string.
pub fn read_csv(file_path: &Path, separator: u8) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|o| o.with_separator(separator).with_truncate_ragged_lines(true))
        .try_into_reader_with_file_path(Some(file_path.to_path_buf()))?
        .finish()
}

pub fn dataframe_to_csv(df: &mut DataFrame, path: &Path) -> PolarsResult<()> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)
}

/// Fails on the first column of `required` that `df` does not carry.
/// Column names are exact, case-sensitive keys.
pub fn require_columns(df: &DataFrame, table: &'static str, required: &[&str]) -> Result<(), SchemaError> {
    let names = df.get_column_names();
    match required.iter().find(|&&req| !names.iter().any(|c| c.as_str() == req)) {
        Some(missing) => Err(SchemaError { table, column: (*missing).to_string() }),
        None => Ok(()),
    }
}

/// Column values as optional strings; non-string columns are cast first.
pub fn string_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df.column(column)?.as_materialized_series().cast(&DataType::String)?;
    Ok(series.str()?.into_iter().map(|v| v.map(str::to_owned)).collect())
}
