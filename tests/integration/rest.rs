//! Single SObject and query requests through the executor.

use super::common::{mock_org, TOKEN};
use serde_json::json;
use sf_compose::rest::{QueryResult, RecordCreateResult, SalesforceRecord};
use sf_compose::{Executable, QueryRequest, SObjectRequest};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_create_update_delete_record() {
    let (server, executor) = mock_org().await;
    let bearer = format!("Bearer {}", TOKEN);

    Mock::given(method("POST"))
        .and(path("/services/data/v50.0/sobjects/Account"))
        .and(header("Authorization", bearer.as_str()))
        .and(body_json(json!({"Name": "Acme"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "0011w00000AbCdEAAV",
            "success": true,
            "errors": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/services/data/v50.0/sobjects/Account/0011w00000AbCdEAAV"))
        .and(body_json(json!({"Name": "Acme Corp"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/services/data/v50.0/sobjects/Account/0011w00000AbCdEAAV"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let created: RecordCreateResult = SObjectRequest::create("Account", json!({"Name": "Acme"}))
        .execute_as(executor.session())
        .await
        .unwrap();
    assert!(created.success);

    executor
        .execute(&SObjectRequest::update(
            "Account",
            &created.id,
            json!({"Name": "Acme Corp"}),
        ))
        .await
        .unwrap();
    executor
        .execute(&SObjectRequest::delete("Account", &created.id))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_record_with_fields() {
    let (server, executor) = mock_org().await;

    Mock::given(method("GET"))
        .and(path("/services/data/v46.0/sobjects/Contact/0031w00000XyZaBAAV"))
        .and(query_param("fields", "Name,Email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "attributes": {"type": "Contact", "url": "/services/data/v46.0/sobjects/Contact/0031w00000XyZaBAAV"},
            "Name": "Howard Jones",
            "Email": "howard@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = SObjectRequest::get("Contact", "0031w00000XyZaBAAV")
        .with_query("fields", "Name,Email")
        .with_api_version("46.0");
    let record: SalesforceRecord = request.execute_as(executor.session()).await.unwrap();

    assert_eq!(record.attributes.sobject_type, "Contact");
    assert_eq!(record.get("Email"), Some(&json!("howard@example.com")));
}

#[tokio::test]
async fn test_query_uses_session_default_version() {
    let (server, executor) = mock_org().await;

    Mock::given(method("GET"))
        .and(path("/services/data/v50.0/query/"))
        .and(query_param("q", "select id, name from account where name = 'A&B'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 1,
            "done": true,
            "records": [{
                "attributes": {"type": "Account", "url": "/services/data/v50.0/sobjects/Account/0011w00000AbCdEAAV"},
                "Id": "0011w00000AbCdEAAV",
                "Name": "A&B"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = QueryRequest::new("select id, name from account where name = 'A&B'");
    assert_eq!(
        query.build_url(executor.session()),
        "/services/data/v50.0/query/?q=select+id,+name+from+account+where+name+=+'A%26B'"
    );

    let result: QueryResult<SalesforceRecord> = executor.execute(&query).await.unwrap();
    assert_eq!(result.total_size, 1);
    assert_eq!(result.records[0].get("Name"), Some(&json!("A&B")));
}

#[tokio::test]
async fn test_not_found_is_remote_error() {
    let (server, executor) = mock_org().await;

    Mock::given(method("GET"))
        .and(path("/services/data/v50.0/sobjects/Account/001000000000000AAA"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!([{
            "errorCode": "NOT_FOUND",
            "message": "The requested resource does not exist"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let err = executor
        .execute(&SObjectRequest::get("Account", "001000000000000AAA"))
        .await
        .unwrap_err();

    assert!(err.is_remote());
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.api_errors()[0].error_code, "NOT_FOUND");
    assert!(err.api_errors()[0].fields.is_none());
}
