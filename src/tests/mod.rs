use std::{collections::HashMap, path::PathBuf, sync::Mutex};

use crate::{
    Session,
    config::{Config, PageConfig},
    transport::{self, Fetch, Location},
};


/// Serves fixed documents and records how often each location is fetched.
pub(crate) struct MemoryFetcher {
    documents: HashMap<Location, String>,
    calls: Mutex<HashMap<Location, usize>>,
}

impl MemoryFetcher {
    pub(crate) fn new<'a>(documents: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            documents: documents
                .into_iter()
                .map(|(location, body)| (Location::from(location), body.to_owned()))
                .collect(),
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn calls(&self, location: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&Location::from(location))
            .copied()
            .unwrap_or_default()
    }
}

impl Fetch for MemoryFetcher {
    async fn fetch_text(&self, location: &Location) -> Result<String, transport::Error> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(location.clone())
            .or_default() += 1;
        tokio::task::yield_now().await;
        self.documents
            .get(location)
            .cloned()
            .ok_or_else(|| transport::Error::ReadLocal {
                error: std::io::ErrorKind::NotFound.into(),
                path: PathBuf::from(location.to_string()),
            })
    }
}

const COUNTS_URL: &str = "https://counts.example.workers.dev/";

const CONFIG: &str = r#"
dataset:
  type: Json
  location: data.json
media:
  type: Keyed
  location: data/media-index.json
counts:
  location: https://counts.example.workers.dev/
pages:
  bombers:
    label: Бомбери
  recon:
    label: Розвідка
"#;

const DATASET: &str = r#"[
  {"id": "shahed", "name": "Shahed", "type": "FPV", "category": "bombers",
   "affiliation": "Бомбери", "description": "one-way"},
  {"id": "lancet", "name": "Lancet", "type": "Recon", "category": "rozvidka",
   "affiliation": "Розвідка", "description": "loitering"}
]"#;

const MEDIA: &str = r#"{"shahed": ["shahed#1.jpg", "shahed#2.mp4"]}"#;

const COUNTS: &str = r#"{"bombers": {"Shahed": 12}, "rozvidka": {"Orlan": 4}}"#;

fn config() -> Config {
    serde_yaml::from_str(CONFIG).unwrap()
}

fn page(config: &Config, name: &str) -> PageConfig {
    config.pages[name].clone()
}

fn full_fetcher() -> MemoryFetcher {
    MemoryFetcher::new([
        ("data.json", DATASET),
        ("data/media-index.json", MEDIA),
        (COUNTS_URL, COUNTS),
    ])
}

#[tokio::test]
async fn test_category_page() {
    let config = config();
    let session = Session::new(&config, full_fetcher());
    let bombers = page(&config, "bombers");

    let view = session.category_view(&bombers.label).await;
    let names = view.items.iter().map(|i| i.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["Shahed"]);
    assert_eq!(view.types.iter().collect::<Vec<_>>(), ["FPV"]);
    assert_eq!(view.filter(&["FPV"]).len(), 1);
    assert_eq!(view.filter::<&str>(&[]).len(), 1);

    let gallery = session.gallery::<&str>(&bombers, &[]).await;
    assert_eq!(gallery.label, "Бомбери");
    assert_eq!(gallery.cards.len(), 1);
    let card = &gallery.cards[0];
    assert_eq!(card.title, "Shahed (12)");
    assert_eq!(card.media, ["media/shahed%231.jpg", "media/shahed%232.mp4"]);

    let gallery = session.gallery(&bombers, &["Recon"]).await;
    assert!(gallery.cards.is_empty());
    assert_eq!(gallery.types.len(), 1);
}

#[tokio::test]
async fn test_lookup_miss_is_absence() {
    let config = config();
    let session = Session::new(&config, full_fetcher());
    let recon = page(&config, "recon");

    let gallery = session.gallery::<&str>(&recon, &[]).await;
    let card = &gallery.cards[0];
    assert_eq!(card.title, "Lancet");
    assert!(card.media.is_empty());
    assert_eq!(session.category_key(&recon), "rozvidka");
    assert_eq!(session.counts_for_page(&recon).await.get("Orlan"), Some(4));
}

#[tokio::test]
async fn test_each_document_fetched_once() {
    let config = config();
    let session = Session::new(&config, full_fetcher());
    let bombers = page(&config, "bombers");

    session.load_dataset().await;
    session.load_dataset().await;
    session.gallery::<&str>(&bombers, &[]).await;
    session.gallery(&bombers, &["FPV"]).await;
    session.get_counts("fpv").await;

    let fetcher = session.fetcher();
    assert_eq!(fetcher.calls("data.json"), 1);
    assert_eq!(fetcher.calls("data/media-index.json"), 1);
    assert_eq!(fetcher.calls(COUNTS_URL), 1);
}

#[tokio::test]
async fn test_concurrent_loads_share_one_fetch() {
    let session = Session::new(&config(), full_fetcher());

    let (a, b, c) = tokio::join!(
        session.load_dataset(),
        session.load_dataset(),
        session.resolve_media("shahed"),
    );
    session.prefetch().await;

    assert_eq!(a.len(), 2);
    assert_eq!(a, b);
    assert_eq!(c.len(), 2);
    assert_eq!(session.fetcher().calls("data.json"), 1);
    assert_eq!(session.fetcher().calls("data/media-index.json"), 1);
    assert_eq!(session.fetcher().calls(COUNTS_URL), 1);
}

#[tokio::test]
async fn test_failed_loads_degrade_to_empty_once() {
    let config = config();
    let session = Session::new(&config, MemoryFetcher::new([]));
    let bombers = page(&config, "bombers");

    assert!(session.load_dataset().await.is_empty());
    assert!(session.load_dataset().await.is_empty());
    let gallery = session.gallery::<&str>(&bombers, &[]).await;
    assert!(gallery.cards.is_empty());
    assert!(gallery.types.is_empty());
    assert!(session.resolve_media("shahed").await.is_empty());
    assert!(session.get_counts("bombers").await.is_empty());

    let fetcher = session.fetcher();
    assert_eq!(fetcher.calls("data.json"), 1);
    assert_eq!(fetcher.calls("data/media-index.json"), 1);
    assert_eq!(fetcher.calls(COUNTS_URL), 1);
}

#[tokio::test]
async fn test_malformed_enrichment_keeps_dataset() {
    let config = config();
    let session = Session::new(
        &config,
        MemoryFetcher::new([
            ("data.json", DATASET),
            ("data/media-index.json", "not json"),
            (COUNTS_URL, "Shahed,12\n"),
        ]),
    );

    let gallery = session
        .gallery::<&str>(&page(&config, "bombers"), &[])
        .await;
    assert_eq!(gallery.cards.len(), 1);
    assert_eq!(gallery.cards[0].title, "Shahed");
    assert!(gallery.cards[0].media.is_empty());
}

#[tokio::test]
async fn test_counts_optional() {
    let mut config = config();
    config.counts = None;
    let session = Session::new(&config, full_fetcher());

    let gallery = session
        .gallery::<&str>(&page(&config, "bombers"), &[])
        .await;
    assert_eq!(gallery.cards[0].title, "Shahed");
    assert_eq!(session.fetcher().calls(COUNTS_URL), 0);
}

#[test]
fn test_error_kinds() {
    use crate::{Error, ErrorKind, dataset};

    let fetch = Error::Fetch {
        location: Location::from("data.json"),
        source: transport::Error::ReadLocal {
            error: std::io::ErrorKind::NotFound.into(),
            path: PathBuf::from("data.json"),
        },
    };
    assert_eq!(fetch.kind(), ErrorKind::Network);

    let parse = Error::Dataset {
        location: Location::from("data.json"),
        source: dataset::Error::Json(serde_json::from_str::<()>("{").unwrap_err()),
    };
    assert_eq!(parse.kind(), ErrorKind::Parse);
}
