//! Website scraping for brand profiling.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use reqwest::Client;

use super::ProfileError;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static SCRIPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<script.*?</script>").unwrap());
static STYLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<style.*?</style>").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Cap on retained scrape text; the profiler prompt has a budget too.
const MAX_TEXT_LEN: usize = 120_000;

/// What one scrape produced.
#[derive(Debug, Clone)]
pub struct ScrapedSite {
    pub text: String,
    pub pages: Vec<String>,
}

/// Trait for website scrapers.
#[async_trait]
pub trait SiteScraper: Send + Sync {
    /// Fetch a site and return its visible text.
    async fn scrape(&self, url: &str) -> Result<ScrapedSite, ProfileError>;
}

/// Scraper that fetches the homepage and strips markup.
pub struct HttpSiteScraper {
    client: Client,
}

impl Default for HttpSiteScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpSiteScraper {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .user_agent("soapbox-profiler/0.1")
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    fn strip_html(html: &str) -> String {
        let text = SCRIPT.replace_all(html, " ");
        let text = STYLE.replace_all(&text, " ");
        let text = TAG.replace_all(&text, " ");
        let text = WHITESPACE.replace_all(&text, " ");
        text.trim().to_string()
    }
}

#[async_trait]
impl SiteScraper for HttpSiteScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedSite, ProfileError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProfileError::Scrape(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProfileError::Scrape(format!("HTTP {} from {}", status, url)));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ProfileError::Scrape(e.to_string()))?;

        let mut text = Self::strip_html(&html);
        text.truncate(MAX_TEXT_LEN);

        if text.is_empty() {
            return Err(ProfileError::Scrape(format!("no text content at {}", url)));
        }

        Ok(ScrapedSite {
            text,
            pages: vec![url.to_string()],
        })
    }
}
