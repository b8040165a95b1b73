use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use soapbox_core::{
    AuditHandle, AuditStore, Authenticator, Config, ContentStore, GenerationRunner, MediaRunner,
    PlatformRegistry, ProfileStore, ProfileTaskHandle, PublishRunner, SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    audit: AuditHandle,
    audit_store: Arc<dyn AuditStore>,
    content_store: Arc<dyn ContentStore>,
    platforms: Arc<dyn PlatformRegistry>,
    profile_store: Arc<dyn ProfileStore>,
    generation_runner: Option<Arc<GenerationRunner>>,
    media_runner: Option<Arc<MediaRunner>>,
    publish_runner: Option<Arc<PublishRunner>>,
    scraper: Option<Arc<dyn soapbox_core::SiteScraper>>,
    profiler: Option<Arc<dyn soapbox_core::BrandProfiler>>,
    /// Running brand scrape tasks, keyed by brand id.
    profile_tasks: Mutex<HashMap<String, ProfileTaskHandle>>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        audit: AuditHandle,
        audit_store: Arc<dyn AuditStore>,
        content_store: Arc<dyn ContentStore>,
        platforms: Arc<dyn PlatformRegistry>,
        profile_store: Arc<dyn ProfileStore>,
        generation_runner: Option<Arc<GenerationRunner>>,
        media_runner: Option<Arc<MediaRunner>>,
        publish_runner: Option<Arc<PublishRunner>>,
        scraper: Option<Arc<dyn soapbox_core::SiteScraper>>,
        profiler: Option<Arc<dyn soapbox_core::BrandProfiler>>,
    ) -> Self {
        Self {
            config,
            authenticator,
            audit,
            audit_store,
            content_store,
            platforms,
            profile_store,
            generation_runner,
            media_runner,
            publish_runner,
            scraper,
            profiler,
            profile_tasks: Mutex::new(HashMap::new()),
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn audit(&self) -> &AuditHandle {
        &self.audit
    }

    pub fn audit_store(&self) -> &dyn AuditStore {
        self.audit_store.as_ref()
    }

    pub fn content_store(&self) -> &dyn ContentStore {
        self.content_store.as_ref()
    }

    pub fn platforms(&self) -> &dyn PlatformRegistry {
        self.platforms.as_ref()
    }

    pub fn profile_store(&self) -> &dyn ProfileStore {
        self.profile_store.as_ref()
    }

    pub fn profile_store_arc(&self) -> Arc<dyn ProfileStore> {
        Arc::clone(&self.profile_store)
    }

    pub fn generation_runner(&self) -> Option<&GenerationRunner> {
        self.generation_runner.as_deref()
    }

    pub fn media_runner(&self) -> Option<&MediaRunner> {
        self.media_runner.as_deref()
    }

    pub fn publish_runner(&self) -> Option<&PublishRunner> {
        self.publish_runner.as_deref()
    }

    pub fn scraper(&self) -> Option<Arc<dyn soapbox_core::SiteScraper>> {
        self.scraper.clone()
    }

    pub fn profiler(&self) -> Option<Arc<dyn soapbox_core::BrandProfiler>> {
        self.profiler.clone()
    }

    pub fn profile_tasks(&self) -> &Mutex<HashMap<String, ProfileTaskHandle>> {
        &self.profile_tasks
    }
}
