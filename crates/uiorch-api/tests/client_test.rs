// Integration tests for `OrchestratorClient` transport behaviour using wiremock:
// headers, authentication flows, retries, error mapping, and pagination.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use futures_util::TryStreamExt;
use pretty_assertions::assert_eq;
use reqwest::Method;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use uiorch_api::models::{Job, JobState};
use uiorch_api::{
    ClientConfig, Credentials, Error, FolderScope, ODataQuery, OrchestratorClient, RetryPolicy,
    TransportConfig,
};

const BASE: &str = "/acme/DefaultTenant/orchestrator_/";

// ── Helpers ─────────────────────────────────────────────────────────

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_secs(5),
    }
}

fn config(server: &MockServer, credentials: Credentials) -> ClientConfig {
    let base = Url::parse(&format!("{}{BASE}", server.uri())).unwrap();
    ClientConfig::new(base, credentials)
        .with_tenant_name("DefaultTenant")
        .with_folder(FolderScope::Id(42))
        .with_transport(TransportConfig::default().with_retry(fast_retry()))
}

async fn setup() -> (MockServer, OrchestratorClient) {
    let server = MockServer::start().await;
    let creds = Credentials::token(SecretString::from("static-token"));
    let client = OrchestratorClient::new(config(&server, creds)).unwrap();
    (server, client)
}

async fn setup_client_credentials() -> (MockServer, OrchestratorClient) {
    let server = MockServer::start().await;
    let creds = Credentials::client_credentials(
        "app-id",
        SecretString::from("app-secret"),
        vec!["OR.Jobs".into(), "OR.Queues".into()],
    );
    let client = OrchestratorClient::new(config(&server, creds)).unwrap();
    (server, client)
}

fn jobs_path() -> String {
    format!("{BASE}odata/Jobs")
}

fn job_json(id: i64, state: &str) -> Value {
    json!({ "Id": id, "State": state, "ReleaseName": "Invoices" })
}

fn token_response(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": token,
        "expires_in": 3600,
        "token_type": "Bearer"
    }))
}

// ── Headers ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_sends_bearer_tenant_and_folder_headers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(jobs_path()))
        .and(header("Authorization", "Bearer static-token"))
        .and(header("Accept", "application/json"))
        .and(header("X-UIPATH-TenantName", "DefaultTenant"))
        .and(header("X-UIPATH-OrganizationUnitId", "42"))
        .and(query_param("$filter", "State eq 'Faulted'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.context": "x",
            "@odata.count": 1,
            "value": [job_json(7, "Faulted")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = ODataQuery::new().filter("State eq 'Faulted'");
    let page = client.jobs().list(&query).await.unwrap();

    assert_eq!(page.count, Some(1));
    assert_eq!(page.value[0].id, 7);
    assert_eq!(page.value[0].state, JobState::Faulted);
}

#[tokio::test]
async fn test_in_folder_switches_to_folder_path_header() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(jobs_path()))
        .and(header("X-UIPATH-FolderPath", "Finance/Payables"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let scoped = client.in_folder(FolderScope::Path("Finance/Payables".into()));
    assert_eq!(
        scoped.folder(),
        Some(&FolderScope::Path("Finance/Payables".into()))
    );
    let page = scoped.jobs().list(&ODataQuery::new()).await.unwrap();
    assert!(page.value.is_empty());
    // The original handle keeps its own scope.
    assert_eq!(client.folder(), Some(&FolderScope::Id(42)));
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_client_credentials_token_is_fetched_once_and_cached() {
    let (server, client) = setup_client_credentials().await;

    Mock::given(method("POST"))
        .and(path("/identity_/connect/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=app-id"))
        .and(body_string_contains("scope=OR.Jobs+OR.Queues"))
        .respond_with(token_response("cc-token"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}odata/Jobs(1)")))
        .and(header("Authorization", "Bearer cc-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json(1, "Running")))
        .expect(2)
        .mount(&server)
        .await;

    let first: Job = client.jobs().get(1).await.unwrap();
    let second: Job = client.jobs().get(1).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_token_endpoint_rejection_is_authentication_error() {
    let (server, client) = setup_client_credentials().await;

    Mock::given(method("POST"))
        .and(path("/identity_/connect/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Client authentication failed"
        })))
        .mount(&server)
        .await;

    let err = client.jobs().get(1).await.unwrap_err();
    match err {
        Error::Authentication { ref message } => {
            assert!(message.contains("invalid_client"), "got: {message}");
        }
        other => panic!("expected Authentication, got {other:?}"),
    }
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_401_refreshes_token_and_retries_once() {
    let (server, client) = setup_client_credentials().await;

    Mock::given(method("POST"))
        .and(path("/identity_/connect/token"))
        .respond_with(token_response("stale"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/identity_/connect/token"))
        .respond_with(token_response("fresh"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}odata/Jobs(3)")))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE}odata/Jobs(3)")))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json(3, "Successful")))
        .expect(1)
        .mount(&server)
        .await;

    let job = client.jobs().get(3).await.unwrap();
    assert_eq!(job.state, JobState::Successful);
}

#[tokio::test]
async fn test_second_401_surfaces_as_unauthorized() {
    let (server, client) = setup_client_credentials().await;

    Mock::given(method("POST"))
        .and(path("/identity_/connect/token"))
        .respond_with(token_response("never-good"))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE}odata/Jobs(3)")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "You are not authenticated!",
            "errorCode": 0
        })))
        .expect(2)
        .mount(&server)
        .await;

    let err = client.jobs().get(3).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized(ref api) if api.message == "You are not authenticated!"));
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_static_token_is_not_refreshed_on_401() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(jobs_path()))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.jobs().list(&ODataQuery::new()).await.unwrap_err();
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_password_login_uses_account_authenticate() {
    let server = MockServer::start().await;
    let creds = Credentials::Password {
        tenancy_name: "Default".into(),
        username: "admin".into(),
        password: SecretString::from("hunter2"),
    };
    let client = OrchestratorClient::new(config(&server, creds)).unwrap();

    Mock::given(method("POST"))
        .and(path(format!("{BASE}api/Account/Authenticate")))
        .and(body_string_contains("\"usernameOrEmailAddress\":\"admin\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "onprem-token",
            "success": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE}odata/Jobs(5)")))
        .and(header("Authorization", "Bearer onprem-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json(5, "Pending")))
        .mount(&server)
        .await;

    let job = client.jobs().get(5).await.unwrap();
    assert_eq!(job.id, 5);
}

// ── Retries ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_is_retried_on_gateway_errors() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(jobs_path()))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(jobs_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.jobs().list(&ODataQuery::new()).await.unwrap();
    assert!(page.value.is_empty());
}

#[tokio::test]
async fn test_post_is_not_retried_on_gateway_errors() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(format!(
            "{BASE}odata/Jobs/UiPath.Server.Configuration.OData.RestartJob"
        )))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.jobs().restart(9).await.unwrap_err();
    assert!(matches!(err, Error::Server(ref api) if api.message == "maintenance"));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_rate_limit_beyond_ceiling_fails_fast() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(jobs_path()))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "120"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.jobs().list(&ODataQuery::new()).await.unwrap_err();
    assert!(matches!(err, Error::RateLimited { retry_after_secs: 120 }));
}

#[tokio::test]
async fn test_rate_limit_within_ceiling_is_retried() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(format!(
            "{BASE}odata/Jobs/UiPath.Server.Configuration.OData.RestartJob"
        )))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!(
            "{BASE}odata/Jobs/UiPath.Server.Configuration.OData.RestartJob"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json(10, "Pending")))
        .expect(1)
        .mount(&server)
        .await;

    let job = client.jobs().restart(9).await.unwrap();
    assert_eq!(job.id, 10);
}

fn restart_path() -> String {
    format!("{BASE}odata/Jobs/UiPath.Server.Configuration.OData.RestartJob")
}

async fn setup_with_timeout(timeout: Duration) -> (MockServer, OrchestratorClient) {
    let server = MockServer::start().await;
    let creds = Credentials::token(SecretString::from("static-token"));
    let mut cfg = config(&server, creds);
    cfg.transport = cfg.transport.with_timeout(timeout);
    let client = OrchestratorClient::new(cfg).unwrap();
    (server, client)
}

#[tokio::test]
async fn test_get_timeout_is_retried_then_reported() {
    let (server, client) = setup_with_timeout(Duration::from_millis(100)).await;

    Mock::given(method("GET"))
        .and(path(jobs_path()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "value": [] }))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(3)
        .mount(&server)
        .await;

    let err = client.jobs().list(&ODataQuery::new()).await.unwrap_err();
    assert!(
        matches!(err, Error::Timeout { timeout: Some(t) } if t == Duration::from_millis(100)),
        "unexpected error: {err:?}"
    );
    assert_eq!(err.to_string(), "Request timed out after 100ms");
}

#[tokio::test]
async fn test_post_timeout_is_not_retried() {
    let (server, client) = setup_with_timeout(Duration::from_millis(100)).await;

    Mock::given(method("POST"))
        .and(path(restart_path()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(job_json(10, "Pending"))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client.jobs().restart(9).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_refused_connection_is_retried_for_post() {
    // Nothing listens on the discard port
    let base = Url::parse(&format!("http://127.0.0.1:9{BASE}")).unwrap();
    let retry = RetryPolicy {
        max_retries: 2,
        initial_backoff: Duration::from_millis(50),
        max_backoff: Duration::from_secs(5),
    };
    let cfg = ClientConfig::new(base, Credentials::token(SecretString::from("t")))
        .with_transport(TransportConfig::default().with_retry(retry));
    let client = OrchestratorClient::new(cfg).unwrap();

    let started = std::time::Instant::now();
    let err = client.jobs().restart(9).await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "unexpected error: {err:?}");
    assert!(err.is_transient());
    // Two backoffs (50ms + 100ms) prove both retries happened
    assert!(started.elapsed() >= Duration::from_millis(150));
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_rest_error_body_maps_to_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}odata/Jobs(404)")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Job does not exist.",
            "errorCode": 1002,
            "traceId": "00-abc-01"
        })))
        .mount(&server)
        .await;

    let err = client.jobs().get(404).await.unwrap_err();
    assert!(err.is_not_found());
    let api = err.api_error().unwrap();
    assert_eq!(api.error_code.as_deref(), Some("1002"));
    assert_eq!(api.trace_id.as_deref(), Some("00-abc-01"));
    insta::assert_snapshot!(err.to_string(), @"Not found: HTTP 404: Job does not exist. (error code 1002)");
}

#[tokio::test]
async fn test_odata_error_body_maps_to_bad_request() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(jobs_path()))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": "", "message": "The query specified in the URI is not valid." }
        })))
        .mount(&server)
        .await;

    let err = client
        .jobs()
        .list(&ODataQuery::new().filter("Nope eq"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::BadRequest(ref api) if api.message.starts_with("The query specified"))
    );
}

#[tokio::test]
async fn test_conflict_is_distinguished() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(format!("{BASE}odata/Machines")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "Machine name already exists.",
            "errorCode": 1201
        })))
        .mount(&server)
        .await;

    let err = client
        .machines()
        .create(&json!({ "Name": "VM-01" }))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}odata/Jobs(1)")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = client.jobs().get(1).await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "<html>proxy</html>"),
        other => panic!("expected Deserialization, got {other:?}"),
    }
}

#[tokio::test]
async fn test_validation_fails_before_any_request() {
    let (server, client) = setup().await;

    let err = client
        .queues()
        .add_item("", &uiorch_api::models::QueueItemData::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "queue_name"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Pagination & escape hatch ───────────────────────────────────────

async fn mount_two_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(jobs_path()))
        .and(query_param("$top", "2"))
        .and(query_param("$skip", "0"))
        .and(query_param("$count", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.count": 3,
            "value": [job_json(1, "Successful"), job_json(2, "Faulted")]
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(jobs_path()))
        .and(query_param("$top", "2"))
        .and(query_param("$skip", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.count": 3,
            "value": [job_json(3, "Running")]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_collect_all_walks_every_page() {
    let (server, client) = setup().await;
    mount_two_pages(&server).await;

    let jobs: Vec<Job> = client
        .collect_all("odata/Jobs", &ODataQuery::new(), 2)
        .await
        .unwrap();
    let ids: Vec<i64> = jobs.iter().map(|j| j.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_stream_all_yields_lazily() {
    let (server, client) = setup().await;
    mount_two_pages(&server).await;

    let stream = client.stream_all::<Job>("odata/Jobs", ODataQuery::new(), 2);
    let jobs: Vec<Job> = stream.try_collect().await.unwrap();
    assert_eq!(jobs.len(), 3);
    assert_eq!(jobs[2].state, JobState::Running);
}

#[tokio::test]
async fn test_call_returns_none_for_no_content() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(format!("{BASE}odata/Custom/Action")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{BASE}api/Custom/Thing")))
        .and(query_param("x", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let none = client
        .call(Method::POST, "odata/Custom/Action", &[], Some(&json!({ "a": 1 })))
        .await
        .unwrap();
    assert_eq!(none, None);

    let some = client
        .call(Method::GET, "/api/Custom/Thing", &[("x", "1".into())], None)
        .await
        .unwrap();
    assert_eq!(some, Some(json!({ "ok": true })));
}
