use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soapbox_core::{
    create_audit_system, create_authenticator, load_config, validate_config, AuditEvent,
    AuditStore, Authenticator, BrandProfiler, ContentStore, GenerationRunner, HttpObjectStore,
    HttpSiteScraper, LlmBrandProfiler, LlmClient, LlmDraftGenerator, MediaRunner, OpenAiClient,
    PlatformRegistry, ProfileStore, PublishRunner, SiteScraper, SqliteAuditStore,
    SqliteContentStore, SqlitePlatformRegistry, SqliteProfileStore, WebhookMediaGenerator,
    WebhookPublisher,
};

use soapbox_server::api::create_router;
use soapbox_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Buffer size for audit event channel
const AUDIT_BUFFER_SIZE: usize = 1000;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("SOAPBOX_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Auth method: {:?}", config.auth.method);
    info!("Database path: {:?}", config.database.path);

    // Compute config hash for audit
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    let config_hash_short = &config_hash[..16];

    // Create authenticator
    let authenticator: Arc<dyn Authenticator> = Arc::from(
        create_authenticator(&config.auth).context("Failed to create authenticator")?,
    );
    info!("Using authenticator: {}", authenticator.method_name());

    // Create stores (one sqlite file, separate connections per store)
    let audit_store: Arc<dyn AuditStore> = Arc::new(
        SqliteAuditStore::new(&config.database.path).context("Failed to create audit store")?,
    );
    let content_store: Arc<dyn ContentStore> = Arc::new(
        SqliteContentStore::new(&config.database.path)
            .context("Failed to create content store")?,
    );
    let platforms: Arc<dyn PlatformRegistry> = Arc::new(
        SqlitePlatformRegistry::new(&config.database.path)
            .context("Failed to create platform registry")?,
    );
    let profile_store: Arc<dyn ProfileStore> = Arc::new(
        SqliteProfileStore::new(&config.database.path)
            .context("Failed to create profile store")?,
    );
    info!("Stores initialized");

    // Create audit system
    let (audit_handle, audit_writer) =
        create_audit_system(Arc::clone(&audit_store), AUDIT_BUFFER_SIZE);
    let writer_handle = tokio::spawn(audit_writer.run());

    audit_handle
        .emit(AuditEvent::ServiceStarted {
            version: VERSION.to_string(),
            config_hash: config_hash_short.to_string(),
        })
        .await;

    // Create the LLM client if configured (shared by drafting and profiling)
    let llm_client: Option<Arc<dyn LlmClient>> = config.generator.as_ref().map(|gen_config| {
        info!(
            "Initializing {} generator (model: {})",
            gen_config.provider, gen_config.model
        );
        let mut client = OpenAiClient::new(&gen_config.api_key, &gen_config.model);
        if let Some(ref api_base) = gen_config.api_base {
            client = client.with_api_base(api_base);
        }
        Arc::new(client) as Arc<dyn LlmClient>
    });

    // Draft generation runner
    let generation_runner = llm_client.as_ref().map(|client| {
        let generator = Arc::new(LlmDraftGenerator::new(Arc::clone(client)));
        Arc::new(
            GenerationRunner::new(Arc::clone(&content_store), generator)
                .with_audit(audit_handle.clone()),
        )
    });
    if generation_runner.is_none() {
        info!("No generator configured; generation endpoints disabled");
    }

    // Brand profiling (shares the LLM client)
    let scraper: Option<Arc<dyn SiteScraper>> = llm_client
        .as_ref()
        .map(|_| Arc::new(HttpSiteScraper::new()) as Arc<dyn SiteScraper>);
    let profiler: Option<Arc<dyn BrandProfiler>> = llm_client
        .as_ref()
        .map(|client| Arc::new(LlmBrandProfiler::new(Arc::clone(client))) as Arc<dyn BrandProfiler>);

    // Publish bridge runner
    let publish_runner = config.publisher.as_ref().map(|pub_config| {
        info!("Initializing publish webhook at {}", pub_config.webhook_url);
        let bridge = Arc::new(WebhookPublisher::new(pub_config.clone()));
        Arc::new(
            PublishRunner::new(Arc::clone(&content_store), bridge)
                .with_audit(audit_handle.clone()),
        )
    });
    if publish_runner.is_none() {
        info!("No publisher configured; bridge endpoint disabled");
    }

    // Media runner (needs both the webhook and object storage)
    let media_runner = match (&config.media, &config.storage) {
        (Some(media_config), Some(storage_config)) => {
            info!("Initializing media webhook at {}", media_config.webhook_url);
            let generator = Arc::new(WebhookMediaGenerator::new(media_config.clone()));
            let object_store = Arc::new(HttpObjectStore::new(storage_config.clone()));
            Some(Arc::new(MediaRunner::new(
                Arc::clone(&content_store),
                generator,
                object_store,
            )))
        }
        (Some(_), None) => {
            error!("Media webhook configured but [storage] is missing; media generation disabled");
            None
        }
        _ => {
            info!("No media generator configured");
            None
        }
    };

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        authenticator,
        audit_handle.clone(),
        audit_store,
        content_store,
        platforms,
        profile_store,
        generation_runner,
        media_runner,
        publish_runner,
        scraper,
        profiler,
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Emit ServiceStopped event
    info!("Server shutting down...");
    audit_handle
        .emit(AuditEvent::ServiceStopped {
            reason: "graceful_shutdown".to_string(),
        })
        .await;

    // Drop all holders of AuditHandle so the writer's channel closes.
    // The runners inside AppState hold clones, but AppState was consumed by
    // the router which is gone by now; dropping ours is the last one.
    drop(audit_handle);

    // Wait for writer to finish processing remaining events
    let _ = writer_handle.await;
    info!("Audit writer stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
