// src/fetch/page.rs
// =============================================================================
// This module downloads the pages we harvest links from.
//
// Key functionality:
// - One shared reqwest client with a timeout and a redirect limit
// - Fetching a single page, failing on non-2xx responses
// - Fetching several pages concurrently, results kept in input order
// - Fetch + extract in one call, using the page URL as the base URI
// =============================================================================

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt}; // StreamExt gives us .buffered()
use log::debug;
use reqwest::Client;
use url::Url;

use crate::links::{get_matching_links, LinkArray};

// How many pages may be downloading at the same time
const MAX_IN_FLIGHT: usize = 8;

// Creates the HTTP client used for all fetches
pub fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(10)) // 10 second timeout per request
        .redirect(reqwest::redirect::Policy::limited(5)) // Follow up to 5 redirects
        .build()
        .context("Failed to create HTTP client")
}

// Fetches a web page and returns its HTML content
//
// Parameters:
//   client: reqwest HTTP client
//   url: absolute URL of the page
//
// Returns: the body text, or an error for bad URLs, network failures and
//          non-success statuses
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| anyhow!("Invalid URL '{}': {}", url, e))?;

    debug!("Fetching {}", parsed);
    let response = client.get(parsed).send().await?;

    if !response.status().is_success() {
        return Err(anyhow!("Failed to fetch {}: HTTP {}", url, response.status()));
    }

    let html = response.text().await?;
    Ok(html)
}

// Fetches several pages, up to MAX_IN_FLIGHT at once
//
// Returns: one (url, result) pair per input URL, in the same order
pub async fn fetch_pages(client: &Client, urls: &[String]) -> Vec<(String, Result<String>)> {
    let futures = urls.iter().cloned().map(|url| async move {
        let result = fetch_page(client, &url).await;
        (url, result)
    });

    // .buffered() keeps the output order, unlike .buffer_unordered()
    stream::iter(futures)
        .buffered(MAX_IN_FLIGHT)
        .collect::<Vec<_>>()
        .await
}

// Fetches a page and extracts its links
//
// The page's own URI is the base for resolving relative hrefs.
//
// Returns: Ok(None) if the page was fetched but the selector is invalid
pub async fn get_links(
    client: &Client,
    uri: &str,
    link_selector: &str,
    title_selector: &str,
) -> Result<Option<LinkArray>> {
    let html = fetch_page(client, uri).await?;
    Ok(get_matching_links(&html, link_selector, title_selector, Some(uri)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client() {
        assert!(build_client().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_rejects_relative_url() {
        let client = build_client().unwrap();
        let result = fetch_page(&client, "/not/absolute").await;
        let message = result.unwrap_err().to_string();
        assert!(message.starts_with("Invalid URL '/not/absolute'"));
    }

    #[tokio::test]
    async fn test_fetch_pages_keeps_order() {
        let client = build_client().unwrap();
        let urls = vec!["not a url".to_string(), "also bad".to_string()];
        let results = fetch_pages(&client, &urls).await;

        let order: Vec<&str> = results.iter().map(|(url, _)| url.as_str()).collect();
        assert_eq!(order, vec!["not a url", "also bad"]);
        assert!(results.iter().all(|(_, result)| result.is_err()));
    }

    #[tokio::test]
    async fn test_get_links_propagates_fetch_errors() {
        let client = build_client().unwrap();
        let result = get_links(&client, "example.com/no-scheme", "a", "").await;
        assert!(result.is_err());
    }
}
