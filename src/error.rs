use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Everything the fetch, calendar and labelling layers can fail with.
///
/// None of these are retried. The binaries surface them as a terminated run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no page for {what}")]
    NotFound { what: String },

    #[error("unrecognized page structure at {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("game {game} is missing {missing}")]
    InvalidGame { game: String, missing: &'static str },

    #[error("unrecognized week name {0:?}")]
    UnknownWeek(String),

    #[error("season {0} is not supported (seasons start in 1961)")]
    UnsupportedSeason(u16),

    #[error("access denied fetching {0}")]
    AccessDenied(String),

    #[error("http request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("http {status} from {url}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    pub fn parse(url: &str, reason: impl Into<String>) -> Self {
        FetchError::Parse {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        FetchError::NotFound { what: what.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}
