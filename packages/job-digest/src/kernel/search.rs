//! Job discovery: paginated keyword search over the listing site.
//!
//! Each search result page is an HTML table whose rows hold the posted date
//! in the first cell, the job title in the second, and a detail-page anchor
//! somewhere in the row. Pagination walks page=1,2,... per keyword and stops
//! as soon as a page has no usable rows, or has rows but none inside the
//! recency window.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::traits::BaseJobSearch;
use crate::types::Posting;

/// Date format used by the listing table
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Per-request timeout for search page fetches
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Keyword search client for the job board
pub struct JobBoardSearch {
    client: reqwest::Client,
    base_url: Url,
    max_pages_per_keyword: u32,
}

/// What a parsed result page tells the pagination loop.
///
/// `NoneRecent` relies on the listing being date-sorted descending: once a
/// page holds only rows older than the cutoff, later pages are assumed older
/// still. A listing that violates that ordering can lose results here.
#[derive(Debug)]
enum PageOutcome {
    /// No parseable rows at all; the keyword has no further results.
    Exhausted,
    /// Rows were present but all predate the cutoff.
    NoneRecent,
    /// Rows inside the recency window.
    Recent(Vec<Posting>),
}

impl JobBoardSearch {
    pub fn new(base_url: Url, max_pages_per_keyword: u32) -> Result<Self> {
        // Browser-like User-Agent to avoid bot detection
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            max_pages_per_keyword,
        })
    }

    fn search_url(&self, keyword: &str, page: u32) -> String {
        format!(
            "{}/companies/job-search?search={}&page={}",
            self.base_url.as_str().trim_end_matches('/'),
            urlencoding::encode(keyword),
            page
        )
    }

    /// Fetch raw HTML from a URL
    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
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

    /// Parse every usable result row on a page.
    ///
    /// Rows with fewer than two cells, an unparseable date, or no detail
    /// anchor are skipped without error.
    fn parse_rows(html: &str, base_url: &Url) -> Vec<Posting> {
        let row_selector = match Selector::parse("table tr") {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        let document = Html::parse_document(html);
        document
            .select(&row_selector)
            .filter_map(|row| Self::parse_row(row, base_url))
            .collect()
    }

    fn parse_row(row: ElementRef, base_url: &Url) -> Option<Posting> {
        let cell_selector = Selector::parse("td").ok()?;
        let anchor_selector = Selector::parse("a[href]").ok()?;

        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.len() < 2 {
            return None;
        }

        let date_text = cells[0].text().collect::<String>();
        let posted = NaiveDate::parse_from_str(date_text.trim(), DATE_FORMAT).ok()?;

        let title = cells[1].text().collect::<String>().trim().to_string();
        if title.is_empty() {
            return None;
        }

        // Resolve relative hrefs against the site base
        let href = row
            .select(&anchor_selector)
            .next()
            .and_then(|a| a.value().attr("href"))?;
        let detail_link = base_url.join(href).ok()?;

        Some(Posting::new(title, posted, detail_link))
    }

    fn classify(rows: Vec<Posting>, cutoff: NaiveDate) -> PageOutcome {
        if rows.is_empty() {
            return PageOutcome::Exhausted;
        }

        let recent: Vec<Posting> = rows.into_iter().filter(|p| p.posted >= cutoff).collect();
        if recent.is_empty() {
            PageOutcome::NoneRecent
        } else {
            PageOutcome::Recent(recent)
        }
    }

    /// Insert postings keyed by detail link, keeping the first occurrence.
    /// Returns how many were new rather than duplicates.
    fn collect_postings(found: &mut BTreeMap<String, Posting>, postings: Vec<Posting>) -> usize {
        let mut added = 0;
        for posting in postings {
            if let Entry::Vacant(entry) = found.entry(posting.detail_link.to_string()) {
                entry.insert(posting);
                added += 1;
            }
        }
        added
    }
}

#[async_trait]
impl BaseJobSearch for JobBoardSearch {
    async fn search_recent(&self, keywords: &[String], cutoff: NaiveDate) -> Result<Vec<Posting>> {
        let mut found: BTreeMap<String, Posting> = BTreeMap::new();

        for keyword in keywords {
            info!(keyword = %keyword, cutoff = %cutoff, "Searching keyword");
            let mut pages_scanned = 0u32;
            let mut keyword_new = 0usize;

            for page in 1..=self.max_pages_per_keyword {
                let url = self.search_url(keyword, page);
                debug!(url = %url, "Fetching search page");

                let html = self
                    .fetch_html(&url)
                    .await
                    .with_context(|| format!("Search failed for keyword '{keyword}' page {page}"))?;

                pages_scanned = page;
                let rows = Self::parse_rows(&html, &self.base_url);

                match Self::classify(rows, cutoff) {
                    PageOutcome::Exhausted => {
                        debug!(keyword = %keyword, page = page, "No more results");
                        break;
                    }
                    PageOutcome::NoneRecent => {
                        debug!(keyword = %keyword, page = page, "No recent rows, stopping");
                        break;
                    }
                    PageOutcome::Recent(postings) => {
                        keyword_new += Self::collect_postings(&mut found, postings);
                    }
                }
            }

            info!(
                keyword = %keyword,
                pages_scanned = pages_scanned,
                new_postings = keyword_new,
                "Keyword search complete"
            );
        }

        let mut postings: Vec<Posting> = found.into_values().collect();
        postings.sort_by(|a, b| b.posted.cmp(&a.posted));
        Ok(postings)
    }
}
