//! End-to-end job-runner flow against a mocked actor provider.

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use platform_harvester::{ActorClient, ActorConfig, HarvesterError, RunStatus};

const ACTOR: &str = "acme~review-scraper";

fn client_for(server: &MockServer) -> ActorClient {
    let config = ActorConfig::new("test-token")
        .with_base_url(server.uri())
        .with_poll_interval(Duration::from_millis(10))
        .with_run_timeout(Duration::from_millis(500));
    ActorClient::new(config).unwrap()
}

fn run_body(status: &str, dataset: Option<&str>) -> Value {
    let mut data = json!({ "id": "run1", "status": status });
    if let Some(ds) = dataset {
        data["defaultDatasetId"] = json!(ds);
    }
    json!({ "data": data })
}

#[tokio::test]
async fn polls_until_success_and_returns_the_dataset() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/acts/{ACTOR}/runs")))
        .and(query_param("token", "test-token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(run_body("RUNNING", Some("ds1"))))
        .expect(1)
        .mount(&server)
        .await;

    // First status poll still running, then terminal.
    Mock::given(method("GET"))
        .and(path("/actor-runs/run1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("RUNNING", Some("ds1"))))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/actor-runs/run1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("SUCCEEDED", Some("ds1"))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/datasets/ds1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "a", "text": "great" },
            { "id": "b", "text": "terrible" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let items: Vec<Value> = client_for(&server)
        .run_actor(ACTOR, &json!({ "input": true }))
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], "a");
}

#[tokio::test]
async fn failed_run_surfaces_its_terminal_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/acts/{ACTOR}/runs")))
        .respond_with(ResponseTemplate::new(201).set_body_json(run_body("RUNNING", None)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/actor-runs/run1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("FAILED", None)))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .run_actor::<Value>(ACTOR, &json!({}))
        .await
        .unwrap_err();
    match err {
        HarvesterError::ActorRunFailed { actor_id, status } => {
            assert_eq!(actor_id, ACTOR);
            assert_eq!(status, RunStatus::Failed);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn run_that_never_terminates_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/acts/{ACTOR}/runs")))
        .respond_with(ResponseTemplate::new(201).set_body_json(run_body("RUNNING", Some("ds1"))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/actor-runs/run1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("RUNNING", Some("ds1"))))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .run_actor::<Value>(ACTOR, &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, HarvesterError::PollingTimeout { .. }));
}

#[tokio::test]
async fn rejected_submission_reports_the_provider_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/acts/{ACTOR}/runs")))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid token"}"#),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .run_actor::<Value>(ACTOR, &json!({}))
        .await
        .unwrap_err();
    match err {
        HarvesterError::ActorStart { actor_id, body } => {
            assert_eq!(actor_id, ACTOR);
            assert!(body.contains("invalid token"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn succeeded_run_without_a_dataset_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/acts/{ACTOR}/runs")))
        .respond_with(ResponseTemplate::new(201).set_body_json(run_body("SUCCEEDED", None)))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .run_actor::<Value>(ACTOR, &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, HarvesterError::MissingDataset { .. }));
}
