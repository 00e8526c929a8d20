//! Per-page session state.
//!
//! A [`Session`] owns the three lazily filled caches (dataset, counts and
//! media index). Each is filled at most once: concurrent callers await the
//! same in-flight load, and a failed load is cached as an empty value for the
//! rest of the session. Dropping the session resets everything.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::{
    Error, Item,
    config::{Config, CountsConfig, PageConfig},
    counts::{CategoryKeys, CountDocument, CountMap},
    dataset::DatasetSource,
    filter::CategoryView,
    gallery::{Card, Gallery},
    media::{MediaIndex, MediaSource},
    transport::{Fetch, Location},
};

pub struct Session<F> {
    fetcher: F,
    dataset: Box<dyn DatasetSource>,
    media: Box<dyn MediaSource>,
    counts: Option<CountsConfig>,
    category_keys: CategoryKeys,
    media_dir: String,
    items: OnceCell<Arc<[Item]>>,
    count_document: OnceCell<Arc<CountDocument>>,
    media_index: OnceCell<Arc<MediaIndex>>,
}

impl<F: Fetch> Session<F> {
    pub fn new(config: &Config, fetcher: F) -> Self {
        Self {
            fetcher,
            dataset: config.dataset.source(),
            media: config.media.source(),
            counts: config.counts.clone(),
            category_keys: config.category_keys.clone(),
            media_dir: config.media_dir.clone(),
            items: OnceCell::new(),
            count_document: OnceCell::new(),
            media_index: OnceCell::new(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    async fn fetch(&self, location: &Location) -> Result<String, Error> {
        self.fetcher
            .fetch_text(location)
            .await
            .map_err(|source| Error::Fetch {
                location: location.clone(),
                source,
            })
    }

    async fn fetch_items(&self) -> Result<Vec<Item>, Error> {
        let location = self.dataset.location();
        let body = self.fetch(location).await?;
        self.dataset
            .decode(&body)
            .map_err(|source| Error::Dataset {
                location: location.clone(),
                source,
            })
    }

    async fn fetch_count_document(&self, counts: &CountsConfig) -> Result<CountDocument, Error> {
        let body = self.fetch(&counts.location).await?;
        CountDocument::decode(counts.format, &body).map_err(|source| Error::Counts {
            location: counts.location.clone(),
            source,
        })
    }

    async fn fetch_media_index(&self) -> Result<MediaIndex, Error> {
        let location = self.media.location();
        let body = self.fetch(location).await?;
        self.media.decode(&body).map_err(|source| Error::Media {
            location: location.clone(),
            source,
        })
    }

    /// All items of the dataset. Empty when the dataset could not be loaded.
    pub async fn load_dataset(&self) -> Arc<[Item]> {
        self.items
            .get_or_init(|| async move {
                match self.fetch_items().await {
                    Ok(items) => {
                        debug!(
                            count = items.len(),
                            location = %self.dataset.location(),
                            "dataset loaded"
                        );
                        items.into()
                    }
                    Err(error) => {
                        warn!(%error, kind = ?error.kind(), "failed to load dataset");
                        Vec::new().into()
                    }
                }
            })
            .await
            .clone()
    }

    async fn count_document(&self) -> Arc<CountDocument> {
        self.count_document
            .get_or_init(|| async move {
                let Some(counts) = &self.counts else {
                    debug!("no count endpoint configured");
                    return Arc::default();
                };
                match self.fetch_count_document(counts).await {
                    Ok(document) => {
                        debug!(location = %counts.location, "counts loaded");
                        Arc::new(document)
                    }
                    Err(error) => {
                        warn!(%error, kind = ?error.kind(), "failed to load counts");
                        Arc::default()
                    }
                }
            })
            .await
            .clone()
    }

    async fn media_index(&self) -> Arc<MediaIndex> {
        self.media_index
            .get_or_init(|| async move {
                match self.fetch_media_index().await {
                    Ok(index) => {
                        debug!(location = %self.media.location(), "media index loaded");
                        Arc::new(index)
                    }
                    Err(error) => {
                        warn!(%error, kind = ?error.kind(), "failed to load media index");
                        Arc::default()
                    }
                }
            })
            .await
            .clone()
    }

    /// Counts for a category key. Empty when unavailable.
    pub async fn get_counts(&self, key: &str) -> CountMap {
        self.count_document().await.select(key)
    }

    pub fn category_key(&self, page: &PageConfig) -> String {
        self.category_keys.resolve(&page.label, page.key.as_deref())
    }

    pub async fn counts_for_page(&self, page: &PageConfig) -> CountMap {
        self.get_counts(&self.category_key(page)).await
    }

    /// Media files of an item, first file first. Empty when unknown.
    pub async fn resolve_media(&self, id: &str) -> Vec<String> {
        self.media_index().await.resolve(id)
    }

    pub async fn category_view(&self, label: &str) -> CategoryView {
        CategoryView::new(&self.load_dataset().await, label)
    }

    /// Starts every cache fill at once.
    pub async fn prefetch(&self) {
        futures::join!(
            self.load_dataset(),
            self.count_document(),
            self.media_index()
        );
    }

    /// Cards for `page`, narrowed to `selected` types when any are given.
    pub async fn gallery<S: AsRef<str>>(&self, page: &PageConfig, selected: &[S]) -> Gallery {
        let view = self.category_view(&page.label).await;
        let counts = self.counts_for_page(page).await;
        let mut cards = Vec::new();
        for item in view.filter(selected) {
            let files = self.resolve_media(&item.id).await;
            cards.push(Card::new(&item, &counts, &self.media_dir, &files));
        }
        Gallery {
            label: view.label,
            types: view.types,
            cards,
        }
    }
}
