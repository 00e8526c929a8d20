//! Resolving item ids to their media files.

use std::collections::HashMap;

use tracing::trace;

use crate::transport::Location;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid JSON media index: {0}")]
    Json(serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaIndex {
    /// Every file named `<id>#<n>.<ext>`, in listing order.
    FlatList(Vec<String>),
    Keyed(HashMap<String, Vec<String>>),
}

impl Default for MediaIndex {
    fn default() -> Self {
        MediaIndex::Keyed(HashMap::new())
    }
}

impl MediaIndex {
    /// Files for `id` in index order. The first file is always position 0
    /// of the carousel.
    pub fn resolve(&self, id: &str) -> Vec<String> {
        match self {
            MediaIndex::FlatList(files) => {
                let prefix = format!("{id}#");
                files
                    .iter()
                    .filter(|file| file.starts_with(&prefix))
                    .cloned()
                    .collect()
            }
            MediaIndex::Keyed(index) => index.get(id).cloned().unwrap_or_default(),
        }
    }
}

pub trait MediaSource: Send + Sync {
    fn location(&self) -> &Location;
    fn decode(&self, body: &str) -> Result<MediaIndex, Error>;
}

/// `data/media-index.json` as an object of id to file names.
pub struct KeyedMediaIndex {
    pub location: Location,
}

impl MediaSource for KeyedMediaIndex {
    fn location(&self) -> &Location {
        &self.location
    }

    fn decode(&self, body: &str) -> Result<MediaIndex, Error> {
        serde_json::from_str(body)
            .map(MediaIndex::Keyed)
            .map_err(Error::Json)
    }
}

/// `data/media-index.json` as one array of file names.
pub struct FlatMediaList {
    pub location: Location,
}

impl MediaSource for FlatMediaList {
    fn location(&self) -> &Location {
        &self.location
    }

    fn decode(&self, body: &str) -> Result<MediaIndex, Error> {
        serde_json::from_str(body)
            .map(MediaIndex::FlatList)
            .map_err(Error::Json)
    }
}

/// Marks left unescaped in a URI component besides the RFC 3986 unreserved
/// set, which `urlencoding` already keeps.
const COMPONENT_MARKS: &[(&str, &str)] = &[
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Relative URL of a media file under `media_dir`, with the file name
/// escaped as a URI component.
pub fn media_url(media_dir: &str, file: &str) -> String {
    let media_dir = media_dir.strip_suffix('/').unwrap_or(media_dir);
    let file = COMPONENT_MARKS
        .iter()
        .fold(urlencoding::encode(file).into_owned(), |file, (escaped, mark)| {
            file.replace(escaped, mark)
        });
    format!("{media_dir}/{file}")
}

/// Position within the media files of one item.
#[derive(Debug, Clone, Default)]
pub struct Carousel {
    files: Vec<String>,
    index: usize,
}

impl Carousel {
    pub fn new(files: Vec<String>) -> Self {
        Self { files, index: 0 }
    }

    pub fn current(&self) -> Option<&str> {
        self.files.get(self.index).map(String::as_str)
    }

    pub fn next_file(&mut self) -> Option<&str> {
        if !self.files.is_empty() {
            self.index = (self.index + 1) % self.files.len();
            trace!(index = self.index, "carousel next");
        }
        self.current()
    }

    pub fn prev_file(&mut self) -> Option<&str> {
        if !self.files.is_empty() {
            self.index = (self.index + self.files.len() - 1) % self.files.len();
            trace!(index = self.index, "carousel prev");
        }
        self.current()
    }

    /// `"<current> / <total>"`, 1-based; `"0 / 0"` without files.
    pub fn position(&self) -> String {
        if self.files.is_empty() {
            "0 / 0".into()
        } else {
            format!("{} / {}", self.index + 1, self.files.len())
        }
    }

    pub fn has_navigation(&self) -> bool {
        self.files.len() > 1
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }
}
