//! Run configuration loaded from TOML.

use std::fmt;
use std::path::{Path, PathBuf};

use consignkit_settle::conf::N_ROW_HEADER_DEFAULT;
use consignkit_settle::spec::SpecWorkbookReadOptions;
use serde::Deserialize;

/// Run configuration. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpecConsignConfig {
    /// Zero-based header row of the stock sheet.
    pub header_row_index: usize,
    /// Stock sheet name; `None` reads the first sheet.
    pub sheet_name: Option<String>,
    /// Directory receiving the generated reports.
    pub dir_output: PathBuf,
    /// JSON contact store.
    pub path_contacts: PathBuf,
    /// Logo used when none is given explicitly.
    pub path_logo_default: PathBuf,
}

impl Default for SpecConsignConfig {
    fn default() -> Self {
        Self {
            header_row_index: N_ROW_HEADER_DEFAULT,
            sheet_name: None,
            dir_output: PathBuf::from("liquidaciones"),
            path_contacts: PathBuf::from("contactos.json"),
            path_logo_default: PathBuf::from("logo.png"),
        }
    }
}

impl SpecConsignConfig {
    /// Parse a TOML document.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let c_text = std::fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_toml(&c_text)
    }

    /// Workbook read options derived from this config.
    pub fn to_read_options(&self) -> SpecWorkbookReadOptions {
        SpecWorkbookReadOptions {
            row_header: self.header_row_index,
            sheet_name: self.sheet_name.clone(),
        }
    }
}

/// Configuration loading failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file could not be read.
    Read {
        /// Config path.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// Config text is not valid TOML for this schema.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "Failed to read config {}: {message}", path.display())
            }
            Self::Parse(msg) => write!(f, "Invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_empty_uses_defaults() {
        let config = SpecConsignConfig::from_toml("").expect("parse");
        assert_eq!(config, SpecConsignConfig::default());
        assert_eq!(config.to_read_options(), SpecWorkbookReadOptions::default());
    }

    #[test]
    fn test_from_toml_overrides_fields() {
        let config = SpecConsignConfig::from_toml(
            r#"
header_row_index = 3
sheet_name = "Stock actual"
dir_output = "out"
"#,
        )
        .expect("parse");
        assert_eq!(config.header_row_index, 3);
        assert_eq!(config.sheet_name.as_deref(), Some("Stock actual"));
        assert_eq!(config.dir_output, PathBuf::from("out"));
        assert_eq!(config.path_contacts, PathBuf::from("contactos.json"));
    }

    #[test]
    fn test_from_toml_rejects_wrong_type() {
        let err = SpecConsignConfig::from_toml("header_row_index = \"five\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = SpecConsignConfig::load(Some(&dir.path().join("none.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(SpecConsignConfig::load(None), Ok(SpecConsignConfig::default()));
    }
}
