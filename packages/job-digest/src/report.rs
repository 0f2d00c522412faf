//! Report assembly: the summarization batch sent to the model and the
//! plain-text email body built from its answer.

use crate::types::Posting;

pub const REPORT_SUBJECT: &str = "Daily Job Digest";

/// Embedded in the report when summarization fails; the report still ships.
pub const FALLBACK_SUMMARY: &str = "Failed to summarize job listings.";

const DATE_FORMAT: &str = "%d/%m/%Y";
const SEPARATOR: &str = "==============================";

/// Concatenate fetched descriptions into one summarization batch, each
/// prefixed with its title and posting date.
pub fn build_batch(entries: &[(Posting, String)]) -> String {
    let mut batch = String::new();
    for (posting, excerpt) in entries {
        batch.push_str(&format!(
            "JOB: {} (posted {})\n{}\n\n",
            posting.title,
            posting.posted.format(DATE_FORMAT),
            excerpt
        ));
    }
    batch
}

/// Compose the email body: summary section plus one source entry per
/// discovered posting.
pub fn build_body(summary: &str, postings: &[Posting]) -> String {
    let mut body = format!("DAILY JOB DIGEST\n\n{}\n\n{SEPARATOR}\nSOURCES\n{SEPARATOR}\n", summary.trim());

    for posting in postings {
        body.push_str(&format!(
            "- {} ({})\n  {}\n",
            posting.title,
            posting.posted.format(DATE_FORMAT),
            posting.detail_link
        ));
    }

    body
}
