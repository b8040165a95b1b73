//! The scrape-and-profile background task.
//!
//! This is an explicit task with a cancellable handle and a persisted status
//! field (IDLE/SCRAPING/READY/FAILED), so retries and observability survive
//! process restarts instead of depending on in-process task state.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::profiler::BrandProfiler;
use super::scraper::SiteScraper;
use super::store::ProfileStore;
use super::{BrandProfile, ProfileError, ProfileStatus};

/// Handle to a running scrape task.
pub struct ProfileTaskHandle {
    brand_id: String,
    store: Arc<dyn ProfileStore>,
    handle: JoinHandle<()>,
}

impl ProfileTaskHandle {
    /// Abort the task and persist FAILED so the stored status never reads
    /// SCRAPING for work that is no longer running.
    pub async fn cancel(self) {
        self.handle.abort();
        let _ = self.handle.await;
        if let Err(e) = self.store.set_status(
            &self.brand_id,
            ProfileStatus::Failed,
            Some("scrape cancelled"),
        ) {
            warn!(brand = %self.brand_id, error = %e, "Failed to persist cancelled status");
        }
    }

    /// Wait for the task to finish on its own.
    pub async fn join(self) {
        let _ = self.handle.await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Start a scrape-and-profile run for a brand.
///
/// Persists SCRAPING before any network work, then READY with the profile or
/// FAILED with the error. Returns once the status is persisted, with a
/// handle to the spawned task.
pub async fn spawn_scrape(
    store: Arc<dyn ProfileStore>,
    scraper: Arc<dyn SiteScraper>,
    profiler: Arc<dyn BrandProfiler>,
    brand_id: String,
    website_url: String,
) -> Result<ProfileTaskHandle, ProfileError> {
    if website_url.trim().is_empty() {
        return Err(ProfileError::Validation(
            "website_url is required".to_string(),
        ));
    }

    // Seed or update the row first so SCRAPING is visible immediately.
    let mut profile = store
        .get(&brand_id)?
        .unwrap_or_else(|| BrandProfile::new(&brand_id));
    profile.website_url = Some(website_url.clone());
    profile.status = ProfileStatus::Scraping;
    profile.last_error = None;
    store.upsert(&profile)?;

    let task_store = Arc::clone(&store);
    let task_brand = brand_id.clone();

    let handle = tokio::spawn(async move {
        let outcome = run_scrape(
            task_store.as_ref(),
            scraper.as_ref(),
            profiler.as_ref(),
            &task_brand,
            &website_url,
        )
        .await;

        if let Err(e) = outcome {
            warn!(brand = %task_brand, error = %e, "Brand scrape failed");
            if let Err(persist_err) =
                task_store.set_status(&task_brand, ProfileStatus::Failed, Some(&e.to_string()))
            {
                warn!(brand = %task_brand, error = %persist_err, "Failed to persist FAILED status");
            }
        }
    });

    Ok(ProfileTaskHandle {
        brand_id,
        store,
        handle,
    })
}

async fn run_scrape(
    store: &dyn ProfileStore,
    scraper: &dyn SiteScraper,
    profiler: &dyn BrandProfiler,
    brand_id: &str,
    website_url: &str,
) -> Result<(), ProfileError> {
    let scraped = scraper.scrape(website_url).await?;
    let document = profiler
        .build_profile(brand_id, website_url, &scraped.text)
        .await?;

    let mut profile = store
        .get(brand_id)?
        .unwrap_or_else(|| BrandProfile::new(brand_id));

    profile.website_url = Some(website_url.to_string());
    profile.status = ProfileStatus::Ready;
    profile.last_error = None;
    profile.last_scraped_at = Some(Utc::now());
    profile.pages_scraped = scraped.pages;
    profile.raw_text = Some(scraped.text);
    profile.profile = Some(document.profile);
    profile.profile_summary = Some(document.summary);
    store.upsert(&profile)?;

    info!(brand = %brand_id, "Brand profile ready");
    Ok(())
}
