//! Item records and the adapters that decode them from a dataset document.
//!
//! Field names are matched exactly as they appear in the source. No casing
//! or spacing normalization is applied to header names or JSON keys, so a
//! schema mismatch shows up as empty fields instead of being masked.

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::{csv, transport::Location};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid JSON dataset: {0}")]
    Json(serde_json::Error),
}

/// Reads a scalar field as text: `null` becomes empty, numbers and booleans
/// keep their JSON spelling.
fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        serde_json::Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(D::Error::custom(format!("expected a scalar, got {other}"))),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    #[serde(deserialize_with = "scalar_text")]
    pub id: String,
    #[serde(deserialize_with = "scalar_text")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "scalar_text")]
    pub kind: String,
    #[serde(deserialize_with = "scalar_text")]
    pub category: String,
    #[serde(deserialize_with = "scalar_text")]
    pub affiliation: String,
    #[serde(deserialize_with = "scalar_text")]
    pub description: String,
}

pub trait DatasetSource: Send + Sync {
    fn location(&self) -> &Location;
    fn decode(&self, body: &str) -> Result<Vec<Item>, Error>;
}

/// `data.json`: an array of item objects.
pub struct JsonDataset {
    pub location: Location,
}

impl DatasetSource for JsonDataset {
    fn location(&self) -> &Location {
        &self.location
    }

    fn decode(&self, body: &str) -> Result<Vec<Item>, Error> {
        serde_json::from_str(body).map_err(Error::Json)
    }
}

/// Header names read from a legacy CSV dataset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CsvColumns {
    /// Without an id column the trimmed name doubles as the id.
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: Option<String>,
    pub affiliation: String,
    pub description: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            id: None,
            name: "Name".into(),
            kind: "Type".into(),
            category: None,
            affiliation: "Affiliation".into(),
            description: "Desc".into(),
        }
    }
}

/// `data/BK.csv`: comma separated rows under a header line.
pub struct CsvDataset {
    pub location: Location,
    pub columns: CsvColumns,
}

impl CsvDataset {
    fn item(&self, record: &csv::Record) -> Item {
        let field = |column: &str| record.get(column).cloned().unwrap_or_default();
        let name = field(&self.columns.name);
        let id = match &self.columns.id {
            Some(column) => field(column),
            None => name.trim().to_owned(),
        };
        Item {
            id,
            kind: field(&self.columns.kind),
            category: self
                .columns
                .category
                .as_deref()
                .map(field)
                .unwrap_or_default(),
            affiliation: field(&self.columns.affiliation),
            description: field(&self.columns.description),
            name,
        }
    }
}

impl DatasetSource for CsvDataset {
    fn location(&self) -> &Location {
        &self.location
    }

    fn decode(&self, body: &str) -> Result<Vec<Item>, Error> {
        Ok(csv::parse(body)
            .iter()
            .map(|record| self.item(record))
            .collect())
    }
}
