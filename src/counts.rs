//! Remote per-name counts used to annotate gallery titles.
//!
//! The endpoint answers with one JSON object keyed by category, each value a
//! `name -> count` object. The older endpoint answered with plain text, one
//! `name,count` pair per line and no category level; it is still accepted
//! as [`CountFormat::Text`].

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid JSON counts: {0}")]
    Json(serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum CountFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CountMap(HashMap<String, i64>);

impl CountMap {
    /// Looks up the count for an item name, ignoring surrounding whitespace
    /// on the name.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.0.get(name.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, i64)> for CountMap {
    fn from_iter<T: IntoIterator<Item = (K, i64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountDocument {
    Flat(CountMap),
    ByCategory(IndexMap<String, CountMap>),
}

impl Default for CountDocument {
    fn default() -> Self {
        CountDocument::Flat(CountMap::default())
    }
}

impl CountDocument {
    pub fn decode(format: CountFormat, body: &str) -> Result<Self, Error> {
        match format {
            CountFormat::Json => serde_json::from_str(body)
                .map(CountDocument::ByCategory)
                .map_err(Error::Json),
            CountFormat::Text => Ok(CountDocument::Flat(parse_text(body))),
        }
    }

    /// Counts for one category key. A flat document applies to every key.
    pub fn select(&self, key: &str) -> CountMap {
        match self {
            CountDocument::Flat(counts) => counts.clone(),
            CountDocument::ByCategory(categories) => {
                categories.get(key).cloned().unwrap_or_default()
            }
        }
    }
}

fn parse_text(body: &str) -> CountMap {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut fields = line.split(',');
            let (Some(name), Some(count)) = (fields.next(), fields.next()) else {
                debug!(line, "count line without separator");
                return None;
            };
            match count.trim().parse::<i64>() {
                Ok(count) => Some((name.trim(), count)),
                Err(error) => {
                    debug!(line, %error, "count line without integer count");
                    None
                }
            }
        })
        .collect()
}

/// Substring rules applied to a lowercased label when neither the page nor
/// the table names a key. A later matching rule overrides an earlier one.
const LABEL_HEURISTICS: &[(&str, &str)] = &[("бомб", "bombers"), ("fpv", "fpv")];

/// Chooses the count category for a page.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CategoryKeys {
    /// Display label to machine key, compared case-insensitively.
    pub table: IndexMap<String, String>,
    pub fallback: String,
}

impl Default for CategoryKeys {
    fn default() -> Self {
        Self {
            table: [
                ("Бомбери", "bombers"),
                ("FPV", "fpv"),
                ("Розвідка", "rozvidka"),
            ]
            .into_iter()
            .map(|(label, key)| (label.to_owned(), key.to_owned()))
            .collect(),
            fallback: "rozvidka".into(),
        }
    }
}

impl CategoryKeys {
    pub fn resolve(&self, label: &str, explicit: Option<&str>) -> String {
        if let Some(key) = explicit.map(str::trim).filter(|key| !key.is_empty()) {
            return key.to_owned();
        }
        let label = label.trim().to_lowercase();
        if let Some(key) = self
            .table
            .iter()
            .find(|(pattern, _)| pattern.trim().to_lowercase() == label)
            .map(|(_, key)| key)
        {
            return key.clone();
        }
        LABEL_HEURISTICS
            .iter()
            .rev()
            .find(|(needle, _)| label.contains(needle))
            .map(|(_, key)| (*key).to_owned())
            .unwrap_or_else(|| self.fallback.clone())
    }
}
