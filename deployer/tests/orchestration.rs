//! Orchestration sequence tests against a mocked backend

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netpad_deployer::deploy::sequencer;
use netpad_deployer::errors::DeployerError;
use netpad_deployer::http::client::HttpClient;
use netpad_deployer::models::bundle::{Bundle, FormDef, Manifest};
use netpad_deployer::models::deployment::DeploymentConfig;

fn config() -> DeploymentConfig {
    DeploymentConfig {
        project_id: "p_1".to_string(),
        organization_id: "org_1".to_string(),
        target: "vercel".to_string(),
        app_name: "intake-app".to_string(),
        environment: "production".to_string(),
        database: "provision".to_string(),
        environment_variables: Default::default(),
    }
}

fn bundle() -> Bundle {
    Bundle {
        manifest: Some(Manifest {
            name: Some("intake-suite".to_string()),
            version: Some("1.0.0".to_string()),
        }),
        forms: vec![FormDef {
            name: "contact".to_string(),
            field_configs: Some(vec![json!({"type": "text", "label": "Name"})]),
        }],
        workflows: vec![],
    }
}

fn created(id: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "deployment": {"deploymentId": id, "status": "draft"}
    }))
}

#[tokio::test]
async fn launch_runs_all_three_calls_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/deployments"))
        .respond_with(created("d_42"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/deployments/d_42/inject-bundle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/deployments/d_42/deploy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "started"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let outcome = sequencer::launch(&client, &config(), &bundle())
        .await
        .unwrap();

    assert_eq!(outcome.deployment_id, "d_42");
    assert_eq!(outcome.message, "started");
    assert!(outcome.deployed_url.is_none());
}

#[tokio::test]
async fn inject_failure_aborts_before_trigger() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/deployments"))
        .respond_with(created("d_1"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/deployments/d_1/inject-bundle"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "bad bundle"})))
        .expect(1)
        .mount(&server)
        .await;

    // The trigger call must never happen once inject has failed
    Mock::given(method("POST"))
        .and(path("/deployments/d_1/deploy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "started"})))
        .expect(0)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = sequencer::launch(&client, &config(), &bundle())
        .await
        .unwrap_err();

    match err {
        DeployerError::ValidationError(message) => assert_eq!(message, "bad bundle"),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn create_conflict_surfaces_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/deployments"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"error": "app name 'intake-app' is already taken"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = sequencer::launch(&client, &config(), &bundle())
        .await
        .unwrap_err();

    match err {
        DeployerError::ConflictError(message) => {
            assert_eq!(message, "app name 'intake-app' is already taken");
        }
        other => panic!("expected conflict error, got {:?}", other),
    }
}

#[tokio::test]
async fn trigger_rejection_maps_to_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/deployments"))
        .respond_with(created("d_9"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/deployments/d_9/inject-bundle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/deployments/d_9/deploy"))
        .respond_with(
            ResponseTemplate::new(502).set_body_json(json!({"error": "host rejected build"})),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = sequencer::launch(&client, &config(), &bundle())
        .await
        .unwrap_err();

    match err {
        DeployerError::UpstreamError(message) => assert_eq!(message, "host rejected build"),
        other => panic!("expected upstream error, got {:?}", other),
    }
}
