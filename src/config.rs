use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    counts::{CategoryKeys, CountFormat},
    dataset::{CsvColumns, CsvDataset, DatasetSource, JsonDataset},
    media::{FlatMediaList, KeyedMediaIndex, MediaSource},
    transport::Location,
};

#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "type")]
pub enum DatasetConfig {
    Json {
        location: Location,
    },
    Csv {
        location: Location,
        #[serde(default)]
        columns: CsvColumns,
    },
}

impl DatasetConfig {
    pub fn source(&self) -> Box<dyn DatasetSource> {
        match self {
            DatasetConfig::Json { location } => Box::new(JsonDataset {
                location: location.clone(),
            }),
            DatasetConfig::Csv { location, columns } => Box::new(CsvDataset {
                location: location.clone(),
                columns: columns.clone(),
            }),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "type")]
pub enum MediaConfig {
    Keyed { location: Location },
    FlatList { location: Location },
}

impl MediaConfig {
    pub fn source(&self) -> Box<dyn MediaSource> {
        match self {
            MediaConfig::Keyed { location } => Box::new(KeyedMediaIndex {
                location: location.clone(),
            }),
            MediaConfig::FlatList { location } => Box::new(FlatMediaList {
                location: location.clone(),
            }),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct CountsConfig {
    pub location: Location,
    #[serde(default)]
    pub format: CountFormat,
}

#[derive(Deserialize, Clone, Debug)]
pub struct PageConfig {
    /// Display label, matched against item affiliations.
    pub label: String,
    /// Count category. Derived from the label when absent.
    #[serde(default)]
    pub key: Option<String>,
}

fn default_media_dir() -> String {
    "media".into()
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub media: MediaConfig,
    #[serde(default = "default_media_dir")]
    pub media_dir: String,
    #[serde(default)]
    pub counts: Option<CountsConfig>,
    #[serde(default)]
    pub category_keys: CategoryKeys,
    #[serde(default)]
    pub pages: IndexMap<String, PageConfig>,
}
