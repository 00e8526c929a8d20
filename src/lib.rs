pub mod config;
pub mod counts;
pub mod csv;
pub mod dataset;
pub mod filter;
pub mod gallery;
pub mod media;
pub mod session;
pub mod transport;

#[cfg(test)]
mod tests;

pub use dataset::Item;
pub use session::Session;
pub use transport::Location;

/// Failure classes of the fetching components.
///
/// A missing id or name in an index or count map is not represented here:
/// lookups return empty values instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Parse,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to fetch {location}: {source}")]
    Fetch {
        location: Location,
        source: transport::Error,
    },
    #[error("failed to decode dataset from {location}: {source}")]
    Dataset {
        location: Location,
        source: dataset::Error,
    },
    #[error("failed to decode counts from {location}: {source}")]
    Counts {
        location: Location,
        source: counts::Error,
    },
    #[error("failed to decode media index from {location}: {source}")]
    Media {
        location: Location,
        source: media::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Fetch { .. } => ErrorKind::Network,
            Error::Dataset { .. } | Error::Counts { .. } | Error::Media { .. } => ErrorKind::Parse,
        }
    }
}
