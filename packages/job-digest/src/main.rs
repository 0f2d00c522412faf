// Main entry point for the job digest run

use anyhow::{Context, Result};
use job_digest::kernel::{DetailScraper, GroqClient, JobBoardSearch, SmtpMailer};
use job_digest::{Config, Pipeline};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,job_digest=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting job digest");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        base_url = %config.base_url,
        keywords = config.keywords.len(),
        recency_days = config.recency_days,
        "Configuration loaded"
    );

    let search = JobBoardSearch::new(config.base_url.clone(), config.max_pages_per_keyword)
        .context("Failed to build search client")?;
    let scraper = DetailScraper::new().context("Failed to build detail scraper")?;
    let summarizer = GroqClient::new(config.groq_api_key.clone(), config.groq_model.clone())
        .context("Failed to build Groq client")?;
    let mailer = SmtpMailer::new(
        &config.smtp_host,
        config.smtp_port,
        config.email_user.clone(),
        config.email_password.clone(),
    )
    .context("Failed to build mailer")?;

    let pipeline = Pipeline::new(
        search,
        scraper,
        summarizer,
        mailer,
        config.keywords.clone(),
        config.recency_days,
        config.fetch_delay,
    );

    let outcome = pipeline.run().await.context("Job digest run failed")?;
    tracing::info!(
        discovered = outcome.discovered,
        described = outcome.described,
        delivered = outcome.delivered,
        "Job digest finished"
    );

    Ok(())
}
