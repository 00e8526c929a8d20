//! Presentation-ready values for one page. Rendering them is left to the
//! consumer.

use indexmap::IndexSet;
use serde::Serialize;

use crate::{Item, counts::CountMap, media::media_url};

/// Item name with its count appended when one is known.
pub fn display_title(item: &Item, counts: &CountMap) -> String {
    match counts.get(&item.name) {
        Some(count) => format!("{} ({count})", item.name),
        None => item.name.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub affiliation: String,
    pub description: String,
    pub media: Vec<String>,
}

impl Card {
    pub fn new(item: &Item, counts: &CountMap, media_dir: &str, files: &[String]) -> Self {
        Self {
            id: item.id.clone(),
            title: display_title(item, counts),
            kind: item.kind.clone(),
            affiliation: item.affiliation.clone(),
            description: item.description.clone(),
            media: files.iter().map(|file| media_url(media_dir, file)).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Gallery {
    pub label: String,
    pub types: IndexSet<String>,
    pub cards: Vec<Card>,
}
