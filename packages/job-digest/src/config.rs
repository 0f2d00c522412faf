use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;
use url::Url;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub email_user: String,
    pub email_password: String,
    pub base_url: Url,
    pub keywords: Vec<String>,
    pub recency_days: i64,
    pub max_pages_per_keyword: u32,
    pub fetch_delay: Duration,
    pub groq_model: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

const DEFAULT_BASE_URL: &str = "https://infopark.in";
const DEFAULT_KEYWORDS: &str = "Developer,Data Analyst,Python,AI";
const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let base_url = env::var("JOB_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let keywords =
            parse_keywords(&env::var("JOB_KEYWORDS").unwrap_or_else(|_| DEFAULT_KEYWORDS.into()));
        anyhow::ensure!(!keywords.is_empty(), "JOB_KEYWORDS must name at least one keyword");

        Ok(Self {
            groq_api_key: env::var("GROQ_API_KEY").context("GROQ_API_KEY must be set")?,
            email_user: env::var("EMAIL_USER").context("EMAIL_USER must be set")?,
            email_password: env::var("EMAIL_PASSWORD").context("EMAIL_PASSWORD must be set")?,
            base_url: Url::parse(&base_url).context("JOB_BASE_URL must be a valid URL")?,
            keywords,
            recency_days: env::var("RECENCY_DAYS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("RECENCY_DAYS must be a valid number of days")?,
            max_pages_per_keyword: env::var("MAX_PAGES_PER_KEYWORD")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("MAX_PAGES_PER_KEYWORD must be a valid number")?,
            fetch_delay: Duration::from_secs(
                env::var("FETCH_DELAY_SECS")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()
                    .context("FETCH_DELAY_SECS must be a valid number of seconds")?,
            ),
            groq_model: env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "465".to_string())
                .parse()
                .context("SMTP_PORT must be a valid port number")?,
        })
    }
}

fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keywords_trims_and_drops_empties() {
        assert_eq!(
            parse_keywords("Developer, Data Analyst ,Python,,AI"),
            vec!["Developer", "Data Analyst", "Python", "AI"]
        );
    }

    #[test]
    fn parse_keywords_empty_input_yields_nothing() {
        assert!(parse_keywords("").is_empty());
        assert!(parse_keywords(" , ,").is_empty());
    }
}
