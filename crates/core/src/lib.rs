pub mod audit;
pub mod auth;
pub mod bulk;
pub mod config;
pub mod content;
pub mod generation;
pub mod media;
pub mod metrics;
pub mod platform;
pub mod profile;
pub mod publisher;
pub mod testing;

pub use audit::{
    create_audit_system, AuditError, AuditEvent, AuditFilter, AuditHandle, AuditRecord,
    AuditStore, AuditWriter, SqliteAuditStore,
};
pub use auth::{
    create_authenticator, ApiKeyAuthenticator, AuthError, AuthRequest, Authenticator, Identity,
    NoneAuthenticator,
};
pub use bulk::{BulkError, BulkOutcome, SkippedItem};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthConfig, AuthMethod, Config,
    ConfigError, DatabaseConfig, GeneratorConfig, MediaConfig, PublisherConfig, SanitizedConfig,
    ServerConfig, StorageConfig,
};
pub use content::{
    allowed_targets, ensure_transition, expand_topics, validate, ContentFilter, ContentItem,
    ContentStatus, ContentStore, ContentType, ExpandError, SqliteContentStore, StoreError,
    TopicBatch, TransitionError,
};
pub use generation::{
    DraftGenerator, DraftRequest, GeneratedDraft, GenerationError, GenerationMode,
    GenerationReport, GenerationRequest, GenerationRunner, GeneratorError, LlmClient,
    LlmDraftGenerator, OpenAiClient,
};
pub use media::{
    HttpObjectStore, MediaError, MediaGenerator, MediaReport, MediaRunner, ObjectStore,
    WebhookMediaGenerator,
};
pub use platform::{Platform, PlatformError, PlatformRegistry, SqlitePlatformRegistry};
pub use profile::{
    spawn_scrape, BrandProfile, BrandProfiler, HttpSiteScraper, LlmBrandProfiler, ProfileError,
    ProfileStatus, ProfileStore, ProfileTaskHandle, SiteScraper, SqliteProfileStore,
};
pub use publisher::{
    OutboundPost, PublishBridge, PublishReceipt, PublishReport, PublishRunner, PublisherError,
    WebhookPublisher,
};
