// Mock implementations of the pipeline seams for testing.
//
// Each mock records its calls behind Arc<Mutex<..>> so tests can assert how
// the orchestrator drove it.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use url::Url;

use super::traits::{BaseDescriptionScraper, BaseJobSearch, BaseMailer, BaseSummarizer};
use crate::types::Posting;

// =============================================================================
// Mock Job Search
// =============================================================================

#[derive(Clone)]
pub struct MockJobSearch {
    postings: Vec<Posting>,
    fail: bool,
    calls: Arc<Mutex<Vec<(Vec<String>, NaiveDate)>>>,
}

impl MockJobSearch {
    pub fn new() -> Self {
        Self {
            postings: Vec::new(),
            fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_postings(mut self, postings: Vec<Posting>) -> Self {
        self.postings = postings;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<(Vec<String>, NaiveDate)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseJobSearch for MockJobSearch {
    async fn search_recent(&self, keywords: &[String], cutoff: NaiveDate) -> Result<Vec<Posting>> {
        self.calls
            .lock()
            .unwrap()
            .push((keywords.to_vec(), cutoff));

        if self.fail {
            anyhow::bail!("mock search failure");
        }
        Ok(self.postings.clone())
    }
}

// =============================================================================
// Mock Description Scraper
// =============================================================================

#[derive(Clone)]
pub struct MockDescriptionScraper {
    responses: HashMap<String, String>,
    failing_urls: HashSet<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockDescriptionScraper {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            failing_urls: HashSet::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_text(mut self, url: &str, text: &str) -> Self {
        self.responses.insert(url.to_string(), text.to_string());
        self
    }

    pub fn failing_for(mut self, url: &str) -> Self {
        self.failing_urls.insert(url.to_string());
        self
    }

    /// All URLs the orchestrator asked to scrape
    pub fn scrape_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseDescriptionScraper for MockDescriptionScraper {
    async fn scrape_text(&self, url: &Url) -> Result<String> {
        let key = url.to_string();
        self.calls.lock().unwrap().push(key.clone());

        if self.failing_urls.contains(&key) {
            anyhow::bail!("mock fetch failure for {key}");
        }
        Ok(self
            .responses
            .get(&key)
            .cloned()
            .unwrap_or_else(|| "Mock job description.".to_string()))
    }
}

// =============================================================================
// Mock Summarizer
// =============================================================================

#[derive(Clone)]
pub struct MockSummarizer {
    response: String,
    fail: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self {
            response: "- Company Name: Mock Co".to_string(),
            fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Batches the orchestrator sent for summarization
    pub fn batches(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseSummarizer for MockSummarizer {
    async fn summarize(&self, batch: &str) -> Result<String> {
        self.calls.lock().unwrap().push(batch.to_string());

        if self.fail {
            anyhow::bail!("mock summarizer failure");
        }
        Ok(self.response.clone())
    }
}

// =============================================================================
// Mock Mailer
// =============================================================================

#[derive(Clone)]
pub struct MockMailer {
    fail: bool,
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            fail: false,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// (subject, body) pairs in send order
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseMailer for MockMailer {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));

        if self.fail {
            anyhow::bail!("mock delivery failure");
        }
        Ok(())
    }
}
