use serde::Deserialize;
use tracing::info;

use crate::error::LookupError;

const ARTICLE_BASE: &str = "https://en.wikipedia.org/wiki/";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

/// Resolves airport codes to English Wikipedia article URLs via the
/// MediaWiki search API.
pub struct WikiClient {
    client: reqwest::Client,
    search_api: String,
}

impl WikiClient {
    pub fn new(client: reqwest::Client, search_api: impl Into<String>) -> Self {
        Self {
            client,
            search_api: search_api.into(),
        }
    }

    /// Article URL of the top search hit for `airport <code>`.
    pub async fn article_url(&self, code: &str) -> Result<String, LookupError> {
        info!(code, "Searching Wikipedia for airport code");
        let query = format!("airport {code}");
        let res = self
            .client
            .get(&self.search_api)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query.as_str()),
                ("format", "json"),
                ("origin", "*"),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(LookupError::Api(status));
        }

        let body = res.text().await?;
        let url = first_title(&body)?
            .map(|title| article_url(&title))
            .ok_or_else(|| LookupError::NotFound(code.to_string()))?;
        info!(code, url = %url, "Found Wikipedia page");
        Ok(url)
    }
}

/// Title of the first search hit, `None` when the search found nothing.
fn first_title(body: &str) -> Result<Option<String>, serde_json::Error> {
    let parsed: SearchResponse = serde_json::from_str(body)?;
    Ok(parsed
        .query
        .and_then(|q| q.search.into_iter().next())
        .map(|hit| hit.title))
}

pub fn article_url(title: &str) -> String {
    format!("{ARTICLE_BASE}{}", urlencoding::encode(title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{canned_server, local_client};

    #[test]
    fn title_is_percent_encoded() {
        assert_eq!(
            article_url("Zürich Airport"),
            "https://en.wikipedia.org/wiki/Z%C3%BCrich%20Airport"
        );
    }

    #[test]
    fn first_hit_wins() {
        let body = r#"{"batchcomplete":"","query":{"searchinfo":{"totalhits":2},
            "search":[{"ns":0,"title":"Heathrow Airport","pageid":1},
                      {"ns":0,"title":"Gatwick Airport","pageid":2}]}}"#;
        assert_eq!(first_title(body).unwrap().as_deref(), Some("Heathrow Airport"));
    }

    #[test]
    fn no_hits() {
        assert_eq!(first_title(r#"{"query":{"search":[]}}"#).unwrap(), None);
        assert_eq!(first_title(r#"{"error":{"code":"badvalue"}}"#).unwrap(), None);
    }

    #[test]
    fn error_page_is_a_decode_error() {
        let err = first_title("<html><body>503 Service Unavailable</body></html>").unwrap_err();
        let err = LookupError::from(err);
        assert!(matches!(err, LookupError::Decode(_)));
        assert!(err.to_string().starts_with("malformed Wikipedia search response"));
    }

    #[tokio::test]
    async fn lookup_surfaces_garbled_response() {
        let base = canned_server("200 OK", "text/html", "<html>Service Unavailable</html>").await;
        let wiki = WikiClient::new(local_client(), format!("{base}/w/api.php"));
        let err = wiki.article_url("LHR").await.unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }

    #[tokio::test]
    async fn lookup_resolves_first_hit() {
        let body = r#"{"query":{"search":[{"title":"Heathrow Airport"}]}}"#;
        let base = canned_server("200 OK", "application/json", body).await;
        let wiki = WikiClient::new(local_client(), format!("{base}/w/api.php"));
        assert_eq!(
            wiki.article_url("LHR").await.unwrap(),
            "https://en.wikipedia.org/wiki/Heathrow%20Airport"
        );
    }

    #[tokio::test]
    async fn lookup_reports_api_status() {
        let base = canned_server("503 Service Unavailable", "text/plain", "busy").await;
        let wiki = WikiClient::new(local_client(), format!("{base}/w/api.php"));
        let err = wiki.article_url("LHR").await.unwrap_err();
        assert!(matches!(err, LookupError::Api(s) if s.as_u16() == 503));
    }
}
