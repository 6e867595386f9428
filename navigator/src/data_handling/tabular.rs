use std::path::Path;

use polars::frame::DataFrame;
use tracing::{debug, error, info};

use crate::data_handling::excel::read_excel;
use crate::error::LoadError;
use crate::helper_functions::read_csv;

const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// Loads a workbook sheet or delimited text file into a string-typed frame.
///
/// Missing files, unreadable files and header-only/empty files are told
/// apart through [`LoadError`].
pub fn load_table(path: &Path, sheet_idx: usize) -> Result<DataFrame, LoadError> {
    if !path.exists() {
        error!("The data file '{}' does not exist.", path.display());
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let malformed = |reason: String| LoadError::Malformed { path: path.to_path_buf(), reason };

    info!("Reading data from {}", path.display());
    let df = if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
        read_excel(path, sheet_idx).map_err(|e| malformed(e.to_string()))?
    } else {
        let separator = match ext.as_str() {
            "csv" => b',',
            "tsv" | "txt" => b'\t',
            other => return Err(malformed(format!("unsupported file extension '{other}'"))),
        };
        let size = std::fs::metadata(path).map_err(|e| malformed(e.to_string()))?.len();
        if size == 0 {
            None
        } else {
            Some(read_csv(path, separator).map_err(|e| malformed(e.to_string()))?)
        }
    };

    match df {
        Some(df) if df.height() > 0 => {
            debug!("{}: {} rows x {} columns", path.display(), df.height(), df.width());
            Ok(df)
        }
        _ => {
            error!("The data file '{}' contains no data.", path.display());
            Err(LoadError::Empty(path.to_path_buf()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_with(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_table(&dir.path().join("ddiTable.xlsx"), 0).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn csv_and_tsv_are_loaded() {
        let csv = temp_with(".csv", "Compound name,Interacting gene name\nWarfarin,CYP2C9\n");
        let df = load_table(csv.path(), 0).unwrap();
        assert_eq!(df.shape(), (1, 2));

        let tsv = temp_with(".tsv", "Compound name\tInteracting gene name\nWarfarin\tCYP2C9\n");
        let df = load_table(tsv.path(), 0).unwrap();
        assert_eq!(df.shape(), (1, 2));
    }

    #[test]
    fn empty_inputs_are_reported_as_empty() {
        let blank = temp_with(".csv", "");
        assert!(matches!(load_table(blank.path(), 0), Err(LoadError::Empty(_))));

        let header_only = temp_with(".csv", "Compound name,Interacting gene name\n");
        assert!(matches!(load_table(header_only.path(), 0), Err(LoadError::Empty(_))));
    }

    #[test]
    fn workbook_with_unlabeled_columns_is_loaded() {
        use crate::data_handling::excel::tests::write_xlsx;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ddiTable.xlsx");
        write_xlsx(
            &path,
            &[
                vec![Some("Compound name"), Some("Interacting gene name"), Some("Compound Gene Relation")],
                vec![Some("DrugA"), Some("GeneX"), Some("substrate"), None, Some("note"), Some("note")],
            ],
        );
        let df = load_table(&path, 0).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 6);
    }

    #[test]
    fn directory_with_csv_name_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tool.csv");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("rows.csv"), "Compound name\nWarfarin\n").unwrap();
        assert!(matches!(load_table(&path, 0), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn unknown_extension_is_malformed() {
        let file = temp_with(".parquet", "whatever");
        assert!(matches!(load_table(file.path(), 0), Err(LoadError::Malformed { .. })));
    }
}
