//! Session lifecycle through the facade.

use std::sync::Arc;

use super::common::{config, init_tracing, mount_login, TOKEN};
use serde_json::json;
use sf_compose::{Executor, QueryRequest, SessionManager};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn empty_query_result() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"totalSize": 0, "done": true, "records": []}))
}

#[tokio::test]
async fn test_requests_share_one_login() {
    init_tracing();
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/services/data/v50.0/query/"))
        .respond_with(empty_query_result())
        .expect(3)
        .mount(&server)
        .await;

    let session = Arc::new(SessionManager::new(config(&server, "fakeValidPassword")).unwrap());
    let first = Executor::new(Arc::clone(&session));
    let second = first.clone();

    let query = QueryRequest::new("select id from lead");
    first.execute(&query).await.unwrap();
    second.execute(&query).await.unwrap();
    first.execute(&query).await.unwrap();

    assert_eq!(session.token().await.unwrap(), TOKEN);
}

#[tokio::test]
async fn test_invalidate_then_execute_logs_in_again() {
    init_tracing();
    let server = MockServer::start().await;
    mount_login(&server, 2).await;

    Mock::given(method("GET"))
        .and(path("/services/data/v50.0/query/"))
        .respond_with(empty_query_result())
        .expect(2)
        .mount(&server)
        .await;

    let executor = Executor::from_config(config(&server, "fakeValidPassword")).unwrap();
    let query = QueryRequest::new("select id from lead");

    executor.execute(&query).await.unwrap();
    executor.session().invalidate().await;
    assert!(!executor.session().is_authenticated().await);
    executor.execute(&query).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_executes_trigger_one_login() {
    init_tracing();
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/services/data/v50.0/query/"))
        .respond_with(empty_query_result())
        .expect(2)
        .mount(&server)
        .await;

    let executor = Executor::from_config(config(&server, "fakeValidPassword")).unwrap();
    let query = QueryRequest::new("select id from lead");

    let (a, b) = tokio::join!(executor.execute(&query), executor.execute(&query));
    assert!(a.is_ok());
    assert!(b.is_ok());
}

#[tokio::test]
async fn test_failed_login_never_reaches_the_api() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "authentication failure"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services/data/v50.0/query/"))
        .respond_with(empty_query_result())
        .expect(0)
        .mount(&server)
        .await;

    let executor = Executor::from_config(config(&server, "fakeInvalidPassword")).unwrap();
    let err = executor
        .execute(&QueryRequest::new("select id from lead"))
        .await
        .unwrap_err();

    assert!(err.is_authentication());
    assert!(!format!("{:?}", err).contains("fakeInvalidPassword"));
    assert!(!executor.session().is_authenticated().await);
}
