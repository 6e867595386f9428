use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Wraps a foreign error so it can travel through `PolarsResult` plumbing.
pub fn polars_err(e: Box<dyn std::error::Error>) -> PolarsError {
    PolarsError::ComputeError(e.to_string().into())
}

/// Failure of the table-loading collaborator.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The data file '{}' does not exist.", .0.display())]
    NotFound(PathBuf),

    #[error("An error occurred while loading the data file '{}': {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("The data file '{}' contains no data.", .0.display())]
    Empty(PathBuf),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Invalid config file '{}': {source}", .path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
}

/// A required column is absent from a loaded table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The expected column '{column}' is missing from the {table} table.")]
pub struct SchemaError {
    pub table: &'static str,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("An error occurred during the evidence search: {0}")]
pub struct LookupError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error: {0}")]
pub struct AnalysisError(pub String);

impl From<PolarsError> for LookupError {
    fn from(e: PolarsError) -> Self {
        LookupError(e.to_string())
    }
}

impl From<PolarsError> for AnalysisError {
    fn from(e: PolarsError) -> Self {
        AnalysisError(e.to_string())
    }
}

/// Everything evidence lookup can report back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvidenceError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl From<PolarsError> for EvidenceError {
    fn from(e: PolarsError) -> Self {
        EvidenceError::Lookup(e.into())
    }
}

/// Everything the gene-role inference can report back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl From<PolarsError> for InferenceError {
    fn from(e: PolarsError) -> Self {
        InferenceError::Analysis(e.into())
    }
}
