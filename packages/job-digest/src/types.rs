use chrono::NaiveDate;
use url::Url;

/// One discovered job listing.
///
/// Identity is the detail link: discovery guarantees each link appears at
/// most once per run, no matter how many keyword searches surfaced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub title: String,
    pub posted: NaiveDate,
    pub detail_link: Url,
}

impl Posting {
    pub fn new(title: impl Into<String>, posted: NaiveDate, detail_link: Url) -> Self {
        Self {
            title: title.into(),
            posted,
            detail_link,
        }
    }
}
