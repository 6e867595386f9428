use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::helper_functions::project_root;
use crate::models::RoleMatch;

pub const DEFAULT_GENE_TABLE: &str = "data/ddiTable.xlsx";
pub const DEFAULT_EVIDENCE_TABLE: &str = "data/tool.xlsx";

/// Where the two reference tables live and how relations are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub gene_table: PathBuf,
    pub evidence_table: PathBuf,
    pub sheet_index: usize,
    pub role_match: RoleMatch,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        let root = project_root();
        Self {
            gene_table: root.join(DEFAULT_GENE_TABLE),
            evidence_table: root.join(DEFAULT_EVIDENCE_TABLE),
            sheet_index: 0,
            role_match: RoleMatch::default(),
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub gene_table: Option<PathBuf>,
    pub evidence_table: Option<PathBuf>,
    pub sheet_index: Option<usize>,
    pub role_match: Option<RoleMatch>,
}

impl NavigatorConfig {
    /// Fields missing from the file keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config = serde_json::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(path) = overrides.gene_table {
            self.gene_table = path;
        }
        if let Some(path) = overrides.evidence_table {
            self.evidence_table = path;
        }
        if let Some(idx) = overrides.sheet_index {
            self.sheet_index = idx;
        }
        if let Some(mode) = overrides.role_match {
            self.role_match = mode;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_data_dir() {
        let config = NavigatorConfig::default();
        assert!(config.gene_table.ends_with("data/ddiTable.xlsx"));
        assert!(config.evidence_table.ends_with("data/tool.xlsx"));
        assert_eq!(config.role_match, RoleMatch::Substring);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("navigator.json");
        fs::write(&path, r#"{ "gene_table": "genes.csv", "role_match": "token" }"#).unwrap();

        let config = NavigatorConfig::from_json_file(&path).unwrap();
        assert_eq!(config.gene_table, PathBuf::from("genes.csv"));
        assert_eq!(config.role_match, RoleMatch::Token);
        assert_eq!(config.sheet_index, 0);
        assert!(config.evidence_table.ends_with("data/tool.xlsx"));
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("navigator.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(NavigatorConfig::from_json_file(&path), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            NavigatorConfig::from_json_file(&dir.path().join("absent.json")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn overrides_win() {
        let config = NavigatorConfig::default().with_overrides(ConfigOverrides {
            evidence_table: Some("evidence.tsv".into()),
            sheet_index: Some(2),
            ..Default::default()
        });
        assert_eq!(config.evidence_table, PathBuf::from("evidence.tsv"));
        assert_eq!(config.sheet_index, 2);
        assert!(config.gene_table.ends_with("data/ddiTable.xlsx"));
    }
}
