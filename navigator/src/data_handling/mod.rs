use polars::frame::DataFrame;

use crate::error::LoadError;

pub mod evidence_table;
pub mod excel;
pub mod gene_table;
pub mod tabular;

/// A table the navigator reads from disk once per analysis.
pub trait Dataset {
    fn load(&self) -> Result<DataFrame, LoadError>;
}
