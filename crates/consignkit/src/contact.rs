//! Publisher contact metadata store.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use consignkit_settle::spec::SpecContactInfo;
use serde::{Deserialize, Serialize};

////////////////////////////////////////////////////////////////////////////////
// #region ContactRepository

/// Publisher id to contact metadata lookup.
pub trait ContactRepository {
    /// Contact for `publisher_id`, if one is stored.
    fn get(&self, publisher_id: &str) -> Result<Option<SpecContactInfo>, ContactStoreError>;

    /// Insert or replace the contact for `publisher_id`.
    fn put(&mut self, publisher_id: &str, info: SpecContactInfo) -> Result<(), ContactStoreError>;

    /// All stored contacts ordered by publisher id.
    fn list(&self) -> Result<BTreeMap<String, SpecContactInfo>, ContactStoreError>;
}

/// Canonical store key for a publisher id: trimmed and uppercased, matching
/// the ids derived from consignment headers.
pub fn derive_contact_key(publisher_id: &str) -> String {
    publisher_id.trim().to_uppercase()
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryContactRepository {
    dict_contacts: BTreeMap<String, SpecContactInfo>,
}

impl MemoryContactRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContactRepository for MemoryContactRepository {
    fn get(&self, publisher_id: &str) -> Result<Option<SpecContactInfo>, ContactStoreError> {
        Ok(self
            .dict_contacts
            .get(&derive_contact_key(publisher_id))
            .cloned())
    }

    fn put(&mut self, publisher_id: &str, info: SpecContactInfo) -> Result<(), ContactStoreError> {
        self.dict_contacts
            .insert(derive_contact_key(publisher_id), info);
        Ok(())
    }

    fn list(&self) -> Result<BTreeMap<String, SpecContactInfo>, ContactStoreError> {
        Ok(self.dict_contacts.clone())
    }
}

/// JSON file store: one object keyed by publisher id.
///
/// A missing file reads as an empty store. Every `put` rewrites the file.
#[derive(Debug, Clone)]
pub struct JsonFileContactRepository {
    path: PathBuf,
}

impl JsonFileContactRepository {
    /// Store backed by `path`; the file is created on the first `put`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_records(&self) -> Result<BTreeMap<String, SpecContactRecord>, ContactStoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let c_text = std::fs::read_to_string(&self.path).map_err(|err| ContactStoreError::Io {
            path: self.path.clone(),
            message: err.to_string(),
        })?;
        if c_text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&c_text).map_err(|err| ContactStoreError::Parse {
            path: self.path.clone(),
            message: err.to_string(),
        })
    }

    fn write_records(
        &self,
        dict_records: &BTreeMap<String, SpecContactRecord>,
    ) -> Result<(), ContactStoreError> {
        let derive_io_error = |err: std::io::Error| ContactStoreError::Io {
            path: self.path.clone(),
            message: err.to_string(),
        };
        if let Some(dir_parent) = self.path.parent()
            && !dir_parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir_parent).map_err(derive_io_error)?;
        }
        let c_text = serde_json::to_string_pretty(dict_records)
            .map_err(|err| ContactStoreError::Serialize(err.to_string()))?;
        std::fs::write(&self.path, c_text).map_err(derive_io_error)
    }
}

impl ContactRepository for JsonFileContactRepository {
    fn get(&self, publisher_id: &str) -> Result<Option<SpecContactInfo>, ContactStoreError> {
        Ok(self
            .read_records()?
            .remove(&derive_contact_key(publisher_id))
            .map(SpecContactInfo::from))
    }

    fn put(&mut self, publisher_id: &str, info: SpecContactInfo) -> Result<(), ContactStoreError> {
        let mut dict_records = self.read_records()?;
        let c_key = derive_contact_key(publisher_id);
        dict_records.insert(c_key.clone(), SpecContactRecord::from(info));
        self.write_records(&dict_records)?;
        tracing::info!(publisher = %c_key, path = %self.path.display(), "Saved contact");
        Ok(())
    }

    fn list(&self) -> Result<BTreeMap<String, SpecContactInfo>, ContactStoreError> {
        Ok(self
            .read_records()?
            .into_iter()
            .map(|(c_id, record)| (c_id, SpecContactInfo::from(record)))
            .collect())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Records

/// On-disk contact record; keys match the report labels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct SpecContactRecord {
    #[serde(rename = "PROVEEDOR")]
    proveedor: String,
    #[serde(rename = "CONTACTO")]
    contacto: String,
    #[serde(rename = "FONO / MAIL")]
    fono_mail: String,
    #[serde(rename = "DESCUENTO")]
    descuento: String,
    #[serde(rename = "PAGO")]
    pago: String,
    #[serde(rename = "FECHA")]
    fecha: String,
}

impl From<SpecContactRecord> for SpecContactInfo {
    fn from(record: SpecContactRecord) -> Self {
        Self {
            proveedor: record.proveedor,
            contacto: record.contacto,
            fono_mail: record.fono_mail,
            descuento: record.descuento,
            pago: record.pago,
            fecha: record.fecha,
        }
    }
}

impl From<SpecContactInfo> for SpecContactRecord {
    fn from(info: SpecContactInfo) -> Self {
        Self {
            proveedor: info.proveedor,
            contacto: info.contacto,
            fono_mail: info.fono_mail,
            descuento: info.descuento,
            pago: info.pago,
            fecha: info.fecha,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Contact store failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactStoreError {
    /// Store file could not be read or written.
    Io {
        /// Store path.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// Store file is not valid contact JSON.
    Parse {
        /// Store path.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },
    /// Records could not be encoded.
    Serialize(String),
}

impl fmt::Display for ContactStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "Contact store IO failed at {}: {message}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "Invalid contact store {}: {message}", path.display())
            }
            Self::Serialize(msg) => write!(f, "Failed to encode contacts: {msg}"),
        }
    }
}

impl std::error::Error for ContactStoreError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(proveedor: &str) -> SpecContactInfo {
        SpecContactInfo {
            proveedor: proveedor.to_string(),
            fono_mail: "ventas@example.cl".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_memory_repository_get_put() {
        let mut repo = MemoryContactRepository::new();
        assert_eq!(repo.get("SM").expect("get"), None);
        repo.put("SM", contact("Ediciones SM")).expect("put");
        assert_eq!(repo.get("SM").expect("get"), Some(contact("Ediciones SM")));
        repo.put("SM", contact("SM Chile")).expect("put");
        assert_eq!(repo.list().expect("list").len(), 1);
        assert_eq!(repo.get("SM").expect("get"), Some(contact("SM Chile")));
    }

    #[test]
    fn test_json_repository_round_trip_uses_label_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("contactos.json");
        let mut repo = JsonFileContactRepository::new(&path);
        assert_eq!(repo.get("SM").expect("empty store"), None);

        repo.put("SM", contact("Ediciones SM")).expect("put");
        repo.put("PLANETA", contact("Planeta")).expect("put");

        let c_text = std::fs::read_to_string(&path).expect("read");
        assert!(c_text.contains("\"FONO / MAIL\""));
        assert!(c_text.contains("\"PROVEEDOR\": \"Ediciones SM\""));

        let repo_reopened = JsonFileContactRepository::new(&path);
        assert_eq!(
            repo_reopened.get("SM").expect("get"),
            Some(contact("Ediciones SM"))
        );
        let l_ids: Vec<String> = repo_reopened.list().expect("list").into_keys().collect();
        assert_eq!(l_ids, vec!["PLANETA".to_string(), "SM".to_string()]);
    }

    #[test]
    fn test_repositories_canonicalize_publisher_id() {
        assert_eq!(derive_contact_key("  sm "), "SM");

        let mut repo = MemoryContactRepository::new();
        repo.put("sm", contact("Ediciones SM")).expect("put");
        assert_eq!(repo.get("SM").expect("get"), Some(contact("Ediciones SM")));

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("contactos.json");
        let mut repo_json = JsonFileContactRepository::new(&path);
        repo_json.put(" planeta", contact("Planeta")).expect("put");
        assert_eq!(
            repo_json.get("PLANETA").expect("get"),
            Some(contact("Planeta"))
        );
        assert!(
            std::fs::read_to_string(&path)
                .expect("read")
                .contains("\"PLANETA\"")
        );
    }

    #[test]
    fn test_json_repository_partial_record_defaults_missing_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("contactos.json");
        std::fs::write(&path, r#"{"SM": {"PROVEEDOR": "Ediciones SM"}}"#).expect("seed");
        let repo = JsonFileContactRepository::new(&path);
        let info = repo.get("SM").expect("get").expect("present");
        assert_eq!(info.proveedor, "Ediciones SM");
        assert_eq!(info.pago, "");
    }

    #[test]
    fn test_json_repository_invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("contactos.json");
        std::fs::write(&path, "{not json").expect("seed");
        let repo = JsonFileContactRepository::new(&path);
        assert!(matches!(
            repo.get("SM"),
            Err(ContactStoreError::Parse { .. })
        ));
    }
}
