use thiserror::Error;

/// Failures resolving an airport code to its article.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Wikipedia API error: {0}")]
    Api(reqwest::StatusCode),
    #[error("no Wikipedia page found for airport code: {0}")]
    NotFound(String),
    #[error("malformed Wikipedia search response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Failures fetching article HTML through the proxy chain.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} at proxy: {proxy}")]
    Status {
        proxy: String,
        status: reqwest::StatusCode,
    },
    #[error("request via {proxy} failed: {source}")]
    Http {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("undecodable response from {proxy}: {source}")]
    Decode {
        proxy: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("empty or invalid response from {proxy}")]
    EmptyBody { proxy: String },
    #[error("no destination data found in page via {proxy}")]
    NoData { proxy: String },
    #[error("no proxies configured")]
    NoProxies,
    #[error("all proxies failed: {last}")]
    AllProxiesFailed { last: Box<FetchError> },
}

/// Rejected airport code pairs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("please enter both airport codes")]
    Missing,
    #[error("airport code {0:?} is too short (3+ characters)")]
    TooShort(String),
    #[error("please enter two different airport codes (got {0} twice)")]
    Same(String),
}
