use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::FetchError;
use crate::index::DestinationIndex;
use crate::parser::{self, ParseOptions};

/// JSON envelope returned by allorigins' `/get` endpoint.
#[derive(Debug, Deserialize)]
struct AllOriginsBody {
    #[serde(default)]
    contents: Option<String>,
}

pub fn http_client(settings: &Settings) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(settings.user_agent.clone())
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
}

/// Proxy endpoints tried in order until one yields a usable page.
pub struct ProxyChain {
    client: reqwest::Client,
    proxies: Vec<String>,
    min_body_len: usize,
}

impl ProxyChain {
    pub fn new(client: reqwest::Client, settings: &Settings) -> Self {
        Self {
            client,
            proxies: settings.proxy_chain(),
            min_body_len: settings.min_body_len,
        }
    }

    pub fn proxies(&self) -> &[String] {
        &self.proxies
    }

    /// Fetch the page and parse it, moving on to the next proxy when a page
    /// comes back without passenger destination data.
    pub async fn fetch_index(
        &self,
        url: &str,
        opts: &ParseOptions,
    ) -> Result<DestinationIndex, FetchError> {
        self.first_success(url, |html, proxy| {
            let index = parser::build_destination_index_with(&html, opts);
            if index.is_empty() {
                Err(FetchError::NoData {
                    proxy: proxy.to_string(),
                })
            } else {
                Ok(index)
            }
        })
        .await
    }

    /// Fetch the raw page HTML from the first proxy that returns a body.
    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        self.first_success(url, |html, _| Ok(html)).await
    }

    async fn first_success<T>(
        &self,
        url: &str,
        accept: impl Fn(String, &str) -> Result<T, FetchError>,
    ) -> Result<T, FetchError> {
        let mut last = None;
        for proxy in &self.proxies {
            info!(proxy = %proxy, url, "Trying proxy");
            let attempt = self
                .fetch_via(proxy, url)
                .await
                .and_then(|html| accept(html, proxy.as_str()));
            match attempt {
                Ok(v) => return Ok(v),
                Err(e) => {
                    warn!(proxy = %proxy, error = %e, "Proxy failed");
                    last = Some(e);
                }
            }
        }
        Err(match last {
            Some(e) => FetchError::AllProxiesFailed { last: Box::new(e) },
            None => FetchError::NoProxies,
        })
    }

    async fn fetch_via(&self, proxy: &str, url: &str) -> Result<String, FetchError> {
        let res = self
            .client
            .get(proxy_url(proxy, url))
            .send()
            .await
            .map_err(|source| FetchError::Http {
                proxy: proxy.to_string(),
                source,
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                proxy: proxy.to_string(),
                status,
            });
        }

        let body = res.text().await.map_err(|source| FetchError::Http {
            proxy: proxy.to_string(),
            source,
        })?;
        let html = decode_body(proxy, body)?;
        if html.len() < self.min_body_len {
            return Err(FetchError::EmptyBody {
                proxy: proxy.to_string(),
            });
        }
        Ok(html)
    }
}

/// Proxy base followed by the percent-encoded target URL.
pub fn proxy_url(proxy: &str, target: &str) -> String {
    format!("{proxy}{}", urlencoding::encode(target))
}

/// Unwrap proxies that return the page inside a JSON envelope.
pub fn decode_body(proxy: &str, body: String) -> Result<String, FetchError> {
    if !proxy.contains("allorigins") {
        return Ok(body);
    }
    let parsed: AllOriginsBody =
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            proxy: proxy.to_string(),
            source,
        })?;
    Ok(parsed.contents.unwrap_or_default())
}
