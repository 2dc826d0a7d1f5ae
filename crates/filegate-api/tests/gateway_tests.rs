use async_trait::async_trait;
use bytes::Bytes;
use filegate_api::scoper::CredentialScoper;
use filegate_api::{routes, AppState, GatewayConfig};
use filegate_store::{
    CredentialError, MemoryObjectStore, ObjectKey, ObjectStore, OperationKind, Result as StoreResult,
    ScopedCredential, StoredObject, TokenAuthority,
};
use reqwest::{Client, StatusCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.host = "127.0.0.1".to_string();
    config.port = 0; // Random port
    config.use_memory_store = true;
    config.credential_secret = Some("test-secret-123".to_string());
    config
}

async fn serve(state: AppState) -> String {
    let app = routes::create_router(Arc::new(state));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

// Helper to spawn a gateway over the in-memory store on a random port
async fn spawn_server() -> String {
    let state = AppState::new(test_config()).await.unwrap();
    serve(state).await
}

#[tokio::test]
async fn test_put_get_roundtrip() {
    let base_url = spawn_server().await;
    let client = Client::new();
    let content = "Hello, Filegate!";

    // 1. Put the object; Content-Type must be echoed back
    let res = client
        .put(format!("{}/files/docs/hello.txt", base_url))
        .header("Content-Type", "text/plain")
        .body(content)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "text/plain"
    );

    // 2. Get it back: same bytes, same type
    let res = client
        .get(format!("{}/files/docs/hello.txt", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "text/plain"
    );
    assert_eq!(res.text().await.unwrap(), content);
}

#[tokio::test]
async fn test_binary_transparency() {
    let base_url = spawn_server().await;
    let client = Client::new();

    // Deliberately not valid UTF-8, with embedded NULs
    let payload: Vec<u8> = vec![0, 159, 146, 150, 255, 0, 216, 7, 128];

    let res = client
        .put(format!("{}/files/blobs/raw.bin", base_url))
        .header("Content-Type", "application/octet-stream")
        .body(payload.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/files/blobs/raw.bin", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "application/octet-stream"
    );
    assert_eq!(res.bytes().await.unwrap().as_ref(), payload.as_slice());
}

#[tokio::test]
async fn test_unregistered_mime_type_passes_through() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let res = client
        .put(format!("{}/files/data/custom.x", base_url))
        .header("Content-Type", "application/x-filegate-custom")
        .body("payload")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/files/data/custom.x", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "application/x-filegate-custom"
    );
}

#[tokio::test]
async fn test_put_without_content_type_defaults_to_octet_stream() {
    let base_url = spawn_server().await;
    let client = Client::new();

    client
        .put(format!("{}/files/data/untyped", base_url))
        .body("bytes")
        .send()
        .await
        .unwrap();

    let res = client
        .get(format!("{}/files/data/untyped", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "application/octet-stream"
    );
}

#[tokio::test]
async fn test_delete_flow() {
    let base_url = spawn_server().await;
    let client = Client::new();
    let url = format!("{}/files/tmp/scratch.txt", base_url);

    client
        .put(&url)
        .header("Content-Type", "text/plain")
        .body("x")
        .send()
        .await
        .unwrap();

    let res = client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_and_delete_missing_return_404() {
    let base_url = spawn_server().await;
    let client = Client::new();
    let url = format!("{}/files/no/such.txt", base_url);

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.text().await.unwrap();
    assert!(body.contains("ObjectNotFound"));

    let res = client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_paths_are_400() {
    let base_url = spawn_server().await;
    let client = Client::new();

    // Dot segments are exercised against the pure router only: HTTP
    // clients normalize them away before the request leaves the machine.
    for path in [
        "/files/a",       // missing file segment
        "/files/a/b/c",   // extra segment
        "/files//b.txt",  // empty folder
        "/files/a/",      // empty file
        "/files/a%2Fb/c", // encoded separator
    ] {
        let res = client
            .get(format!("{}{}", base_url, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "path {}", path);
        let body = res.text().await.unwrap();
        assert!(body.contains("MalformedPath"), "path {}", path);
    }
}

#[tokio::test]
async fn test_unsupported_method_is_405() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let res = client
        .post(format!("{}/files/a/b.txt", base_url))
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(res.text().await.unwrap().contains("UnsupportedMethod"));
}

#[tokio::test]
async fn test_unknown_paths_are_404() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let res = client
        .get(format!("{}/buckets/a/b", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_check() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let res = client
        .get(format!("{}/healthz", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("ok"));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let res = client
        .get(format!("{}/files/no/such.txt", base_url))
        .send()
        .await
        .unwrap();
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_concurrent_puts_to_distinct_keys_are_isolated() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let puts = (0..8).map(|i| {
        let client = client.clone();
        let url = format!("{}/files/parallel/file-{}.bin", base_url, i);
        let body = vec![i as u8; 1024];
        async move {
            let res = client
                .put(&url)
                .header("Content-Type", "application/octet-stream")
                .body(body)
                .send()
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::OK);
        }
    });
    futures::future::join_all(puts).await;

    // Each key holds exactly its own payload.
    for i in 0..8u8 {
        let res = client
            .get(format!("{}/files/parallel/file-{}.bin", base_url, i))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = res.bytes().await.unwrap();
        assert_eq!(bytes.len(), 1024);
        assert!(bytes.iter().all(|b| *b == i));
    }
}

/// Store and scoper wrappers that count invocations
struct CountingStore {
    inner: MemoryObjectStore,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ObjectStore for CountingStore {
    async fn put_object(
        &self,
        key: &ObjectKey,
        content_type: &str,
        data: Bytes,
        credential: &ScopedCredential,
    ) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.put_object(key, content_type, data, credential).await
    }

    async fn get_object(
        &self,
        key: &ObjectKey,
        credential: &ScopedCredential,
    ) -> StoreResult<StoredObject> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_object(key, credential).await
    }

    async fn delete_object(&self, key: &ObjectKey, credential: &ScopedCredential) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_object(key, credential).await
    }
}

struct CountingScoper {
    authority: Arc<TokenAuthority>,
    calls: Arc<AtomicUsize>,
}

impl CredentialScoper for CountingScoper {
    fn scope(&self, operation: OperationKind) -> Result<ScopedCredential, CredentialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.authority.issue(operation)
    }
}

#[tokio::test]
async fn test_malformed_path_never_reaches_scoper_or_backend() {
    let authority = Arc::new(TokenAuthority::new("test-secret-123", "filegate", 60));
    let scope_calls = Arc::new(AtomicUsize::new(0));
    let store_calls = Arc::new(AtomicUsize::new(0));

    let state = AppState::with_parts(
        test_config(),
        Arc::new(CountingScoper {
            authority: Arc::clone(&authority),
            calls: Arc::clone(&scope_calls),
        }),
        Arc::new(CountingStore {
            inner: MemoryObjectStore::new(authority),
            calls: Arc::clone(&store_calls),
        }),
    );
    let base_url = serve(state).await;

    let client = Client::new();
    let res = client
        .get(format!("{}/files/a", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(scope_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store_calls.load(Ordering::SeqCst), 0);
}

/// Scoper with a deliberately wrong operation mapping, simulating policy
/// drift between gateway and backend
struct DriftedScoper {
    authority: Arc<TokenAuthority>,
}

impl CredentialScoper for DriftedScoper {
    fn scope(&self, operation: OperationKind) -> Result<ScopedCredential, CredentialError> {
        let wrong = match operation {
            OperationKind::Put => OperationKind::Get,
            OperationKind::Get => OperationKind::Delete,
            OperationKind::Delete => OperationKind::Put,
        };
        self.authority.issue(wrong)
    }
}

#[tokio::test]
async fn test_drifted_scope_surfaces_as_403() {
    let authority = Arc::new(TokenAuthority::new("test-secret-123", "filegate", 60));
    let state = AppState::with_parts(
        test_config(),
        Arc::new(DriftedScoper {
            authority: Arc::clone(&authority),
        }),
        Arc::new(MemoryObjectStore::new(authority)),
    );
    let base_url = serve(state).await;

    let client = Client::new();
    let res = client
        .put(format!("{}/files/docs/file.txt", base_url))
        .header("Content-Type", "text/plain")
        .body("x")
        .send()
        .await
        .unwrap();

    // The backend's denial is surfaced, never masked as success.
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(res.text().await.unwrap().contains("AccessDenied"));
}

#[tokio::test]
async fn test_url_encoded_segments_roundtrip() {
    let base_url = spawn_server().await;
    let client = Client::new();
    let url = format!("{}/files/my%20folder/a%20b.txt", base_url);

    client
        .put(&url)
        .header("Content-Type", "text/plain")
        .body("spaced")
        .send()
        .await
        .unwrap();

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "spaced");
}
