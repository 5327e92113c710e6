use std::sync::Arc;

use serde_json::json;
use sf_compose::{AuthConfig, Executor, SessionManager};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "00D1X0000008bP2!fakeAccessToken";
pub const API_VERSION: &str = "v50.0";

/// Install a test subscriber once; `RUST_LOG=debug` shows the library's spans.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config(server: &MockServer, password: &str) -> AuthConfig {
    AuthConfig::new("fakeClientId", "fakeClientSecret", "fakeUsername", password)
        .with_base_url(server.uri())
        .with_api_version(API_VERSION)
}

/// Mount a login endpoint that must be called exactly `times` times and
/// asserts the mock server itself as the instance URL.
pub async fn mount_login(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TOKEN,
            "instance_url": server.uri(),
            "id": format!("{}/id/00D1X0000008bP2UAI/0051t000003LPVHAA4", server.uri()),
            "token_type": "Bearer",
            "issued_at": "1573829868942",
            "signature": "RmFrZSBzaWduYXR1cmU="
        })))
        .expect(times)
        .mount(server)
        .await;
}

/// A mock org with a login endpoint expecting one login, and an executor bound to it.
pub async fn mock_org() -> (MockServer, Executor) {
    init_tracing();

    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    let session = SessionManager::new(config(&server, "fakeValidPassword"))
        .expect("config should be valid");
    (server, Executor::new(Arc::new(session)))
}
