use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;
use wq_core::{FetchError, Result};

pub mod wikipedia;

pub use wikipedia::WikipediaExtractor;

pub const USER_AGENT: &str =
    "WikiQuizApp/1.0 (https://github.com/wikiquiz/wikiquiz) reqwest/0.11";
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_REDIRECTS: usize = 10;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the response body of `url`, failing on transport errors and
    /// non-success statuses
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError>;
}

/// Fetches pages over HTTP. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(transport)
    }
}

/// Common utilities for scrapers
pub mod utils {
    use url::Url;
    use wq_core::{Error, Result};

    /// Parse an absolute http(s) URL.
    pub fn parse_url(url: &str) -> Result<Url> {
        let parsed = Url::parse(url.trim())
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;
        match parsed.scheme() {
            "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
            _ => Err(Error::InvalidUrl(format!(
                "{}: expected an http or https URL",
                url
            ))),
        }
    }

    /// Collapse runs of whitespace into single spaces and trim the ends.
    pub fn normalize_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Keep at most `limit` characters without splitting a code point.
    pub fn truncate_chars(text: &str, limit: usize) -> &str {
        match text.char_indices().nth(limit) {
            Some((idx, _)) => &text[..idx],
            None => text,
        }
    }
}
