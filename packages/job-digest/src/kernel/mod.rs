// Infrastructure implementations of the pipeline seams.

pub mod groq;
pub mod mailer;
pub mod scraper;
pub mod search;
pub mod test_dependencies;
pub mod traits;

pub use groq::GroqClient;
pub use mailer::SmtpMailer;
pub use scraper::DetailScraper;
pub use search::JobBoardSearch;
pub use traits::{BaseDescriptionScraper, BaseJobSearch, BaseMailer, BaseSummarizer};
