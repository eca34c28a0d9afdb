//! Catalog documents and file loading.
//!
//! Three layouts are accepted, in JSON or YAML:
//!
//! ```json
//! {"ex1": {"title": "Bench Press"}, "ex2": {"name": "Squat"}}
//! ```
//!
//! ```json
//! [{"id": "ex1", "title": "Bench Press"}, {"id": "ex2", "name": "Squat"}]
//! ```
//!
//! ```json
//! {"page": 1, "exercise_templates": [{"id": "ex1", "title": "Bench Press"}]}
//! ```
//!
//! The last one is the exercise template listing returned by the
//! fitness-tracking API. Records carry their display name under `name` or
//! `title`; any other fields are ignored.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CatalogError, Result};

/// One known exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Identifier (required in list layouts, implied by the key in maps)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name
    #[serde(alias = "title")]
    pub name: String,
    /// Primary muscle group, when the source provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_muscle_group: Option<String>,
}

impl CatalogRecord {
    /// Creates a record with just a display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            primary_muscle_group: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Envelope {
        exercise_templates: Vec<CatalogRecord>,
    },
    List(Vec<CatalogRecord>),
    Map(BTreeMap<String, CatalogRecord>),
}

/// Read-only collection of known exercises keyed by identifier.
///
/// Iteration is ordered by identifier.
///
/// # Examples
///
/// ```
/// use routine_import_catalog::{Catalog, CatalogRecord};
///
/// let mut catalog = Catalog::new();
/// catalog.insert("ex1", CatalogRecord::named("Bench Press"));
/// assert_eq!(catalog.len(), 1);
/// assert_eq!(catalog.get("ex1").unwrap().name, "Bench Press");
///
/// let catalog: Catalog = [("ex2", "Squat")].into_iter().collect();
/// assert_eq!(catalog.get("ex2").unwrap().name, "Squat");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    records: BTreeMap<String, CatalogRecord>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a record.
    pub fn insert(&mut self, id: impl Into<String>, mut record: CatalogRecord) {
        let id = id.into();
        record.id = Some(id.clone());
        self.records.insert(id, record);
    }

    /// Returns the record for an identifier.
    pub fn get(&self, id: &str) -> Option<&CatalogRecord> {
        self.records.get(id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates `(id, record)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogRecord)> {
        self.records.iter().map(|(id, record)| (id.as_str(), record))
    }

    /// Parses a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::JsonError`] on malformed JSON, or
    /// [`CatalogError::InvalidCatalog`] when the document is not one of the
    /// accepted layouts.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    /// Parses a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::YamlError`] on malformed YAML, or
    /// [`CatalogError::InvalidCatalog`] when the document is not one of the
    /// accepted layouts.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_yaml::from_str(raw)?;
        Self::from_value(value)
    }

    fn from_value(value: serde_json::Value) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_value(value).map_err(|_| {
            CatalogError::InvalidCatalog(
                "expected an id-to-record map, a record list, or an exercise_templates listing"
                    .to_string(),
            )
        })?;

        let mut catalog = Self::new();
        match document {
            CatalogDocument::Map(records) => {
                for (id, record) in records {
                    catalog.insert(id, record);
                }
            }
            CatalogDocument::Envelope {
                exercise_templates: records,
            }
            | CatalogDocument::List(records) => {
                for record in records {
                    let Some(id) = record.id.clone().filter(|id| !id.trim().is_empty()) else {
                        return Err(CatalogError::InvalidCatalog(format!(
                            "record '{}' has no id",
                            record.name
                        )));
                    };
                    catalog.insert(id, record);
                }
            }
        }

        Ok(catalog)
    }
}

impl<K, V> FromIterator<(K, V)> for Catalog
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for (id, name) in iter {
            catalog.insert(id, CatalogRecord::named(name));
        }
        catalog
    }
}

/// Loads a catalog file.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else as
/// JSON.
///
/// # Errors
///
/// Returns [`CatalogError::IoError`] if the file cannot be read, plus the
/// parse errors of [`Catalog::from_json_str`] / [`Catalog::from_yaml_str`].
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let catalog = if is_yaml {
        Catalog::from_yaml_str(&raw)?
    } else {
        Catalog::from_json_str(&raw)?
    };

    debug!(path = %path.display(), records = catalog.len(), "Loaded exercise catalog");
    Ok(catalog)
}
