//! Common test utilities for E2E testing with mocks.
//!
//! Builds an in-process router with mock external services injected, so the
//! whole HTTP surface can be exercised without infrastructure.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use soapbox_core::{
    create_audit_system, testing::MockDraftGenerator, testing::MockPublishBridge, AuditStore,
    AuthConfig, AuthMethod, Config, ContentItem, ContentStore, DatabaseConfig, GenerationRunner,
    NoneAuthenticator, PlatformRegistry, ProfileStore, PublishRunner, ServerConfig,
    SqliteAuditStore, SqliteContentStore, SqlitePlatformRegistry, SqliteProfileStore,
};

/// Re-export fixtures for test convenience
pub use soapbox_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// The content store backing the router
    pub content_store: Arc<SqliteContentStore>,
    /// Mock draft generator
    pub generator: Arc<MockDraftGenerator>,
    /// Mock publish bridge
    pub bridge: Arc<MockPublishBridge>,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let generator = Arc::new(MockDraftGenerator::new());
        let bridge = Arc::new(MockPublishBridge::new());

        let config = Config {
            auth: AuthConfig {
                method: AuthMethod::None,
                api_key: None,
            },
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            generator: None,
            publisher: None,
            media: None,
            storage: None,
        };

        let audit_store: Arc<dyn AuditStore> =
            Arc::new(SqliteAuditStore::new(&db_path).expect("Failed to create audit store"));
        let content_store =
            Arc::new(SqliteContentStore::new(&db_path).expect("Failed to create content store"));
        let platforms: Arc<dyn PlatformRegistry> = Arc::new(
            SqlitePlatformRegistry::new(&db_path).expect("Failed to create platform registry"),
        );
        let profile_store: Arc<dyn ProfileStore> =
            Arc::new(SqliteProfileStore::new(&db_path).expect("Failed to create profile store"));

        let (audit_handle, audit_writer) = create_audit_system(Arc::clone(&audit_store), 100);
        tokio::spawn(audit_writer.run());

        let generation_runner = Arc::new(GenerationRunner::new(
            Arc::clone(&content_store) as Arc<dyn ContentStore>,
            Arc::clone(&generator) as Arc<dyn soapbox_core::DraftGenerator>,
        ));
        let publish_runner = Arc::new(PublishRunner::new(
            Arc::clone(&content_store) as Arc<dyn ContentStore>,
            Arc::clone(&bridge) as Arc<dyn soapbox_core::PublishBridge>,
        ));

        let state = Arc::new(soapbox_server::state::AppState::new(
            config,
            Arc::new(NoneAuthenticator),
            audit_handle,
            audit_store,
            Arc::clone(&content_store) as Arc<dyn ContentStore>,
            platforms,
            profile_store,
            Some(generation_runner),
            None, // No media runner for basic tests
            Some(publish_runner),
            None,
            None,
        ));

        let router = soapbox_server::api::create_router(state);

        Self {
            router,
            content_store,
            generator,
            bridge,
            temp_dir,
        }
    }

    /// Insert items directly into the backing store; returns their ids.
    pub fn seed_items(&self, items: Vec<ContentItem>) -> Vec<String> {
        self.content_store
            .insert_batch(&items)
            .expect("Failed to seed items");
        items.into_iter().map(|i| i.id).collect()
    }

    /// Fetch an item directly from the backing store.
    pub fn item(&self, id: &str) -> ContentItem {
        self.content_store
            .get(id)
            .expect("store error")
            .expect("item missing")
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a PATCH request with JSON body.
    pub async fn patch(&self, path: &str, body: Value) -> TestResponse {
        self.request("PATCH", path, Some(body)).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
