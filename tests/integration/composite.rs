//! Composite batches end to end.

use super::common::mock_org;
use serde_json::json;
use sf_compose::{Composite, DuplicateKeyPolicy, QueryRequest, SObjectRequest};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn lead_and_task(task_key: &str) -> Composite {
    Composite::new(true)
        .add("NewLead", SObjectRequest::create("Lead", json!({"heck": "yeah"})))
        .add(
            task_key,
            SObjectRequest::create("Task", json!({"sup": "bruh", "WhoId": "@{NewLead.id}"})),
        )
}

#[tokio::test]
async fn test_composite_sends_ordered_payload() {
    let (server, executor) = mock_org().await;

    Mock::given(method("POST"))
        .and(path("/services/data/v50.0/composite"))
        .and(body_json(json!({
            "allOrNone": true,
            "compositeRequest": [
                {
                    "method": "POST",
                    "referenceId": "NewLead",
                    "url": "/services/data/v50.0/sobjects/Lead",
                    "body": {"heck": "yeah"}
                },
                {
                    "method": "POST",
                    "referenceId": "AddTask",
                    "url": "/services/data/v50.0/sobjects/Task",
                    "body": {"sup": "bruh", "WhoId": "@{NewLead.id}"}
                },
                {
                    "method": "GET",
                    "referenceId": "Tasks",
                    "url": "/services/data/v50.0/query/?q=select+id+from+task+where+whoid+=+'@{NewLead.id}'"
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "compositeResponse": [
                {"body": {"id": "00Q1w0000029yNwEAI", "success": true, "errors": []},
                 "httpHeaders": {"Location": "/services/data/v50.0/sobjects/Lead/00Q1w0000029yNwEAI"},
                 "httpStatusCode": 201, "referenceId": "NewLead"},
                {"body": {"id": "00T1w000003RgK9EAK", "success": true, "errors": []},
                 "httpHeaders": {"Location": "/services/data/v50.0/sobjects/Task/00T1w000003RgK9EAK"},
                 "httpStatusCode": 201, "referenceId": "AddTask"},
                {"body": {"totalSize": 1, "done": true, "records": []},
                 "httpHeaders": {}, "httpStatusCode": 200, "referenceId": "Tasks"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let composite = lead_and_task("AddTask").add(
        "Tasks",
        QueryRequest::new("select id from task where whoid = '@{NewLead.id}'"),
    );
    let response = executor.execute(&composite).await.unwrap();

    let order: Vec<&str> = response
        .responses
        .iter()
        .map(|r| r.reference_id.as_str())
        .collect();
    assert_eq!(order, ["NewLead", "AddTask", "Tasks"]);
    assert_eq!(response.errors().count(), 0);
    assert_eq!(response.get("AddTask").unwrap().body["id"], "00T1w000003RgK9EAK");
}

#[tokio::test]
async fn test_all_or_none_failure_surfaces_composite_response() {
    let (server, executor) = mock_org().await;

    Mock::given(method("POST"))
        .and(path("/services/data/v50.0/composite"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "compositeResponse": [
                {"body": [{"errorCode": "PROCESSING_HALTED",
                           "message": "The transaction was rolled back since another operation in the same transaction failed."}],
                 "httpHeaders": {}, "httpStatusCode": 400, "referenceId": "NewLead"},
                {"body": [{"errorCode": "INVALID_FIELD",
                           "message": "No such column 'sup' on sobject of type Task",
                           "fields": ["sup"]}],
                 "httpHeaders": {}, "httpStatusCode": 400, "referenceId": "badTask"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = executor.execute(&lead_and_task("badTask")).await.unwrap_err();

    assert!(err.is_remote());
    assert_eq!(err.status(), Some(400));

    let response = err.composite_response().expect("composite body should be kept");
    assert_eq!(response.len(), 2);
    assert_eq!(response.errors().count(), 2);

    let bad = response.get("badTask").unwrap();
    assert_eq!(bad.api_errors()[0].error_code, "INVALID_FIELD");
    assert_eq!(bad.api_errors()[0].fields, Some(vec!["sup".to_string()]));
}

#[tokio::test]
async fn test_invalid_composite_is_rejected_before_sending() {
    let (server, executor) = mock_org().await;

    Mock::given(method("POST"))
        .and(path("/services/data/v50.0/composite"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let duplicate = lead_and_task("NewLead").with_duplicate_key_policy(DuplicateKeyPolicy::Reject);
    assert!(executor.execute(&duplicate).await.unwrap_err().is_validation());

    let invalid = lead_and_task("AddTask").add(
        "Broken",
        SObjectRequest::create("Task", json!({})).with_param("00T1w000003RgK9EAK"),
    );
    assert!(executor.execute(&invalid).await.unwrap_err().is_validation());

    assert!(executor
        .execute(&Composite::new(true))
        .await
        .unwrap_err()
        .is_validation());
}
