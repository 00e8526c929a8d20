//! Fetching raw documents from remote endpoints or the local filesystem.

use std::{
    future::Future,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport error ({url}): {error}")]
    Transport { error: reqwest::Error, url: url::Url },
    #[error("unexpected status {code} ({url})")]
    Status {
        code: reqwest::StatusCode,
        url: url::Url,
    },
    #[error("failed to read local file ({path:?}): {error}")]
    ReadLocal {
        error: std::io::Error,
        path: PathBuf,
    },
}

/// Where a document lives. `http`/`https` URLs are remote, everything else
/// is a path relative to the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Location {
    Remote(url::Url),
    Local(PathBuf),
}

impl From<&str> for Location {
    fn from(src: &str) -> Self {
        match url::Url::parse(src) {
            Ok(url) if matches!(url.scheme(), "https" | "http") => Location::Remote(url),
            _ => Location::Local(PathBuf::from(src)),
        }
    }
}

impl From<String> for Location {
    fn from(src: String) -> Self {
        Location::from(src.as_str())
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.to_string()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Remote(url) => write!(f, "{url}"),
            Location::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

pub trait Fetch: Send + Sync {
    fn fetch_text(
        &self,
        location: &Location,
    ) -> impl Future<Output = Result<String, Error>> + Send;
}

#[derive(Default, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Default::default()
    }

    async fn get(&self, url: &url::Url) -> Result<String, Error> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|error| Error::Transport {
                error,
                url: url.clone(),
            })?;
        let code = response.status();
        if !code.is_success() {
            return Err(Error::Status {
                code,
                url: url.clone(),
            });
        }
        response.text().await.map_err(|error| Error::Transport {
            error,
            url: url.clone(),
        })
    }

    /// Reads a local document. A leading byte order mark is dropped, as
    /// `reqwest` does for remote bodies.
    async fn read(&self, path: &Path) -> Result<String, Error> {
        let mut text = tokio::fs::read_to_string(path)
            .await
            .map_err(|error| Error::ReadLocal {
                error,
                path: path.to_owned(),
            })?;
        if text.starts_with('\u{feff}') {
            text.drain(..'\u{feff}'.len_utf8());
        }
        Ok(text)
    }
}

impl Fetch for HttpFetcher {
    async fn fetch_text(&self, location: &Location) -> Result<String, Error> {
        match location {
            Location::Remote(url) => self.get(url).await,
            Location::Local(path) => self.read(path).await,
        }
    }
}
