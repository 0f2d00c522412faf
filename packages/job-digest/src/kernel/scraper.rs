//! Detail-page scraper: fetches a posting's page and extracts a bounded
//! plain-text excerpt of its visible content for the summarization batch.

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::Html;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::traits::BaseDescriptionScraper;

/// Excerpt length cap, in characters. Keeps token usage bounded.
const EXCERPT_LIMIT: usize = 1500;

/// Per-request timeout for detail page fetches
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Elements whose text is never visible page content
const NON_CONTENT_TAGS: [&str; 4] = ["script", "style", "noscript", "iframe"];

pub struct DetailScraper {
    client: reqwest::Client,
}

impl DetailScraper {
    pub fn new() -> Result<Self> {
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    async fn fetch_html(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }

    /// Collapse an HTML document into whitespace-normalized visible text,
    /// truncated to `EXCERPT_LIMIT` characters.
    ///
    /// Walks the parsed DOM and skips any text node with a non-content
    /// ancestor, so stripping works on whatever markup the site serves,
    /// not just canonical HTML.
    fn visible_text(html: &str) -> String {
        let document = Html::parse_document(html);

        let text = document
            .root_element()
            .descendants()
            .filter_map(|node| {
                let text = node.value().as_text()?;
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .map_or(false, |el| NON_CONTENT_TAGS.contains(&el.name()))
                });
                (!hidden).then(|| text.to_string())
            })
            .collect::<Vec<_>>()
            .join(" ");

        text.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(EXCERPT_LIMIT)
            .collect()
    }
}

#[async_trait]
impl BaseDescriptionScraper for DetailScraper {
    async fn scrape_text(&self, url: &Url) -> Result<String> {
        debug!(url = %url, "Fetching detail page");
        let html = self.fetch_html(url).await?;
        Ok(Self::visible_text(&html))
    }
}
