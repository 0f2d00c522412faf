//! The orchestrator: discovery, description fetch, summarization, delivery,
//! run strictly in that order, once per invocation.
//!
//! Failure policy per stage: discovery errors abort the run; a detail-fetch
//! error drops that one posting from the batch; a summarization error
//! degrades the report to a fallback string; a delivery error is logged and
//! swallowed. The run logs a completion line regardless.

use anyhow::Result;
use chrono::{Duration as Days, Local};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::kernel::traits::{BaseDescriptionScraper, BaseJobSearch, BaseMailer, BaseSummarizer};
use crate::report::{self, FALLBACK_SUMMARY, REPORT_SUBJECT};
use crate::types::Posting;

pub struct Pipeline<S, D, A, M> {
    search: S,
    scraper: D,
    summarizer: A,
    mailer: M,
    keywords: Vec<String>,
    recency_days: i64,
    fetch_delay: Duration,
}

/// What one run did, for logging and tests
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub discovered: usize,
    pub described: usize,
    pub delivered: bool,
}

impl<S, D, A, M> Pipeline<S, D, A, M>
where
    S: BaseJobSearch,
    D: BaseDescriptionScraper,
    A: BaseSummarizer,
    M: BaseMailer,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        search: S,
        scraper: D,
        summarizer: A,
        mailer: M,
        keywords: Vec<String>,
        recency_days: i64,
        fetch_delay: Duration,
    ) -> Self {
        Self {
            search,
            scraper,
            summarizer,
            mailer,
            keywords,
            recency_days,
            fetch_delay,
        }
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        let cutoff = Local::now().date_naive() - Days::days(self.recency_days);
        info!(
            cutoff = %cutoff,
            keywords = self.keywords.len(),
            "Starting job digest run"
        );

        // Discovery failures are fatal: better a loud cron failure than a
        // silently empty report.
        let postings = self.search.search_recent(&self.keywords, cutoff).await?;

        if postings.is_empty() {
            info!("No recent jobs found, skipping summarization and delivery");
            return Ok(RunOutcome::default());
        }
        info!(discovered = postings.len(), "Discovery complete");

        let described = self.fetch_descriptions(&postings).await;

        let summary = if described.is_empty() {
            warn!("No descriptions fetched, sending degraded report");
            FALLBACK_SUMMARY.to_string()
        } else {
            let batch = report::build_batch(&described);
            match self.summarizer.summarize(&batch).await {
                Ok(summary) => summary,
                Err(e) => {
                    error!(error = %e, "Summarization failed, sending degraded report");
                    FALLBACK_SUMMARY.to_string()
                }
            }
        };

        let body = report::build_body(&summary, &postings);
        let delivered = match self.mailer.send(REPORT_SUBJECT, &body).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Report delivery failed, report lost");
                false
            }
        };

        let outcome = RunOutcome {
            discovered: postings.len(),
            described: described.len(),
            delivered,
        };
        info!(
            discovered = outcome.discovered,
            described = outcome.described,
            delivered = outcome.delivered,
            "Job digest run complete"
        );
        Ok(outcome)
    }

    /// Fetch detail-page excerpts sequentially, pausing between requests to
    /// respect the site's rate limits. A failed fetch drops that posting
    /// from the batch and nothing else.
    async fn fetch_descriptions(&self, postings: &[Posting]) -> Vec<(Posting, String)> {
        let mut described = Vec::with_capacity(postings.len());

        for (i, posting) in postings.iter().enumerate() {
            if i > 0 && !self.fetch_delay.is_zero() {
                tokio::time::sleep(self.fetch_delay).await;
            }

            match self.scraper.scrape_text(&posting.detail_link).await {
                Ok(text) => described.push((posting.clone(), text)),
                Err(e) => {
                    warn!(
                        url = %posting.detail_link,
                        error = %e,
                        "Detail fetch failed, dropping posting from batch"
                    );
                }
            }
        }

        described
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::{
        MockDescriptionScraper, MockJobSearch, MockMailer, MockSummarizer,
    };
    use chrono::Local;
    use url::Url;

    fn posting(title: &str, link: &str) -> Posting {
        Posting::new(
            title,
            Local::now().date_naive(),
            Url::parse(link).unwrap(),
        )
    }

    fn pipeline(
        search: MockJobSearch,
        scraper: MockDescriptionScraper,
        summarizer: MockSummarizer,
        mailer: MockMailer,
    ) -> Pipeline<MockJobSearch, MockDescriptionScraper, MockSummarizer, MockMailer> {
        Pipeline::new(
            search,
            scraper,
            summarizer,
            mailer,
            vec!["Python".to_string()],
            1,
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn single_posting_flows_through_all_stages() {
        let search = MockJobSearch::new()
            .with_postings(vec![posting("Python Developer", "https://jobs.example.org/py")]);
        let scraper = MockDescriptionScraper::new()
            .with_text("https://jobs.example.org/py", "Acme hires a Python developer.");
        let summarizer = MockSummarizer::new().with_response("- Company Name: Acme");
        let mailer = MockMailer::new();

        let outcome = pipeline(search, scraper.clone(), summarizer.clone(), mailer.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RunOutcome {
                discovered: 1,
                described: 1,
                delivered: true
            }
        );

        let batches = summarizer.batches();
        assert_eq!(batches.len(), 1);
        assert!(batches[0].contains("JOB: Python Developer"));
        assert!(batches[0].contains("Acme hires a Python developer."));

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        let (subject, body) = &sent[0];
        assert_eq!(subject, REPORT_SUBJECT);
        assert!(body.contains("- Company Name: Acme"));
        assert_eq!(body.matches("https://jobs.example.org/py").count(), 1);
    }

    #[tokio::test]
    async fn zero_postings_skips_summarization_and_delivery() {
        let search = MockJobSearch::new();
        let scraper = MockDescriptionScraper::new();
        let summarizer = MockSummarizer::new();
        let mailer = MockMailer::new();

        let outcome = pipeline(search, scraper.clone(), summarizer.clone(), mailer.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::default());
        assert!(scraper.scrape_calls().is_empty());
        assert!(summarizer.batches().is_empty());
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn discovery_failure_aborts_the_run() {
        let search = MockJobSearch::new().failing();
        let mailer = MockMailer::new();

        let result = pipeline(
            search,
            MockDescriptionScraper::new(),
            MockSummarizer::new(),
            mailer.clone(),
        )
        .run()
        .await;

        assert!(result.is_err());
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn failed_detail_fetch_drops_posting_but_not_run() {
        let search = MockJobSearch::new().with_postings(vec![
            posting("Broken Job", "https://jobs.example.org/broken"),
            posting("Good Job", "https://jobs.example.org/good"),
        ]);
        let scraper = MockDescriptionScraper::new()
            .failing_for("https://jobs.example.org/broken")
            .with_text("https://jobs.example.org/good", "A fine position.");
        let summarizer = MockSummarizer::new();
        let mailer = MockMailer::new();

        let outcome = pipeline(search, scraper.clone(), summarizer.clone(), mailer.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(outcome.discovered, 2);
        assert_eq!(outcome.described, 1);
        assert!(outcome.delivered);

        // Both postings were attempted
        assert_eq!(scraper.scrape_calls().len(), 2);

        // The broken posting contributed nothing to the batch
        let batches = summarizer.batches();
        assert_eq!(batches.len(), 1);
        assert!(!batches[0].contains("Broken Job"));
        assert!(batches[0].contains("Good Job"));

        // But it still appears in the sources list
        let (_, body) = &mailer.sent()[0];
        assert!(body.contains("https://jobs.example.org/broken"));
        assert!(body.contains("https://jobs.example.org/good"));
    }

    #[tokio::test]
    async fn summarizer_failure_degrades_report_but_still_delivers() {
        let search = MockJobSearch::new()
            .with_postings(vec![posting("Python Developer", "https://jobs.example.org/py")]);
        let summarizer = MockSummarizer::new().failing();
        let mailer = MockMailer::new();

        let outcome = pipeline(
            search,
            MockDescriptionScraper::new(),
            summarizer,
            mailer.clone(),
        )
        .run()
        .await
        .unwrap();

        assert!(outcome.delivered);
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.contains(FALLBACK_SUMMARY));
    }

    #[tokio::test]
    async fn all_fetches_failing_sends_degraded_report_without_calling_api() {
        let search = MockJobSearch::new()
            .with_postings(vec![posting("Python Developer", "https://jobs.example.org/py")]);
        let scraper = MockDescriptionScraper::new().failing_for("https://jobs.example.org/py");
        let summarizer = MockSummarizer::new();
        let mailer = MockMailer::new();

        let outcome = pipeline(search, scraper, summarizer.clone(), mailer.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(outcome.described, 0);
        assert!(outcome.delivered);
        assert!(summarizer.batches().is_empty());
        assert!(mailer.sent()[0].1.contains(FALLBACK_SUMMARY));
    }

    #[tokio::test]
    async fn delivery_failure_is_swallowed() {
        let search = MockJobSearch::new()
            .with_postings(vec![posting("Python Developer", "https://jobs.example.org/py")]);
        let mailer = MockMailer::new().failing();

        let outcome = pipeline(
            search,
            MockDescriptionScraper::new(),
            MockSummarizer::new(),
            mailer.clone(),
        )
        .run()
        .await
        .unwrap();

        assert!(!outcome.delivered);
        // The send was still attempted exactly once
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn search_receives_configured_keywords() {
        let search = MockJobSearch::new();

        pipeline(
            search.clone(),
            MockDescriptionScraper::new(),
            MockSummarizer::new(),
            MockMailer::new(),
        )
        .run()
        .await
        .unwrap();

        let calls = search.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, vec!["Python".to_string()]);
    }
}
