// Trait seams between pipeline stages.
//
// These are infrastructure interfaces: each stage of the pipeline depends on
// one of these rather than on a concrete client, so the orchestrator can be
// tested with the mocks in test_dependencies.rs.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use url::Url;

use crate::types::Posting;

/// Keyword search over the job listing site
#[async_trait]
pub trait BaseJobSearch: Send + Sync {
    /// Discover postings dated on or after `cutoff`, deduplicated by
    /// detail link across all keywords, newest first.
    async fn search_recent(&self, keywords: &[String], cutoff: NaiveDate) -> Result<Vec<Posting>>;
}

/// Detail-page text extraction
#[async_trait]
pub trait BaseDescriptionScraper: Send + Sync {
    /// Fetch a detail page and return a bounded plain-text excerpt of its
    /// visible content.
    async fn scrape_text(&self, url: &Url) -> Result<String>;
}

/// LLM summarization of the concatenated job batch
#[async_trait]
pub trait BaseSummarizer: Send + Sync {
    /// Summarize the batch text, returning the model's raw response.
    async fn summarize(&self, batch: &str) -> Result<String>;
}

/// Report delivery
#[async_trait]
pub trait BaseMailer: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> Result<()>;
}
