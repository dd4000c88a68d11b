use anyhow::{Context, Result};
use tracing::info;

use crate::config::Settings;
use crate::error::InputError;
use crate::fetch::{self, ProxyChain};
use crate::index::{merge_indices, ComparisonRow, DestinationIndex};
use crate::parser::ParseOptions;
use crate::wiki::WikiClient;

/// Result of comparing two airports.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub code_a: String,
    pub code_b: String,
    pub url_a: String,
    pub url_b: String,
    pub index_a: DestinationIndex,
    pub index_b: DestinationIndex,
    pub rows: Vec<ComparisonRow>,
}

/// Trim and upper-case both codes, rejecting blanks, codes shorter than
/// three characters, and identical pairs.
pub fn normalize_codes(a: &str, b: &str) -> Result<(String, String), InputError> {
    let a = a.trim().to_uppercase();
    let b = b.trim().to_uppercase();
    if a.is_empty() || b.is_empty() {
        return Err(InputError::Missing);
    }
    for code in [&a, &b] {
        if code.chars().count() < 3 {
            return Err(InputError::TooShort(code.clone()));
        }
    }
    if a == b {
        return Err(InputError::Same(a));
    }
    Ok((a, b))
}

/// Progress phases reported while the network work runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Searching,
    Fetching,
}

/// Look up both articles, fetch and parse them, and merge the indices.
/// The two airports are handled concurrently in each phase.
pub async fn compare_airports(
    settings: &Settings,
    opts: &ParseOptions,
    code_a: &str,
    code_b: &str,
    on_phase: impl Fn(Phase),
) -> Result<Comparison> {
    let (code_a, code_b) = normalize_codes(code_a, code_b)?;
    let client = fetch::http_client(settings).context("Failed to build HTTP client")?;
    let wiki = WikiClient::new(client.clone(), settings.search_api.clone());
    let chain = ProxyChain::new(client, settings);

    on_phase(Phase::Searching);
    let (url_a, url_b) = tokio::try_join!(
        async {
            wiki.article_url(&code_a)
                .await
                .with_context(|| format!("Failed to search Wikipedia for {code_a}"))
        },
        async {
            wiki.article_url(&code_b)
                .await
                .with_context(|| format!("Failed to search Wikipedia for {code_b}"))
        },
    )?;

    on_phase(Phase::Fetching);
    let (index_a, index_b) = tokio::try_join!(
        async {
            chain
                .fetch_index(&url_a, opts)
                .await
                .with_context(|| format!("Failed to fetch destinations for {code_a} ({url_a})"))
        },
        async {
            chain
                .fetch_index(&url_b, opts)
                .await
                .with_context(|| format!("Failed to fetch destinations for {code_b} ({url_b})"))
        },
    )?;

    info!(
        a = %code_a,
        b = %code_b,
        size_a = index_a.len(),
        size_b = index_b.len(),
        "Parsed destination maps"
    );
    let rows = merge_indices(&index_a, &index_b);

    Ok(Comparison {
        code_a,
        code_b,
        url_a,
        url_b,
        index_a,
        index_b,
        rows,
    })
}
