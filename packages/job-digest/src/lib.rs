pub mod config;
pub mod kernel;
pub mod pipeline;
pub mod report;
pub mod types;

// Re-exports for clean API
pub use config::Config;
pub use kernel::{
    BaseDescriptionScraper, BaseJobSearch, BaseMailer, BaseSummarizer, DetailScraper, GroqClient,
    JobBoardSearch, SmtpMailer,
};
pub use pipeline::{Pipeline, RunOutcome};
pub use types::Posting;
