// Integration tests for the resource groups using wiremock.
//
// Each test pins down the path, query, and body a resource method sends
// and how it decodes the answer.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use bytes::Bytes;
use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, json};
use url::Url;
use uuid::Uuid;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use uiorch_api::models::{
    BulkCommitType, ExceptionType, JobState, MaintenancePhase, NewAsset, NewWebhook,
    QueueItemData, QueueItemPriority, QueueItemStatus, StartInfo, StopStrategy, TransactionResult,
};
use uiorch_api::resources::webhooks;
use uiorch_api::{
    ClientConfig, Credentials, Error, FolderScope, ODataQuery, OrchestratorClient, RetryPolicy,
    TransportConfig,
};

const BASE: &str = "/acme/DefaultTenant/orchestrator_/";

async fn setup() -> (MockServer, OrchestratorClient) {
    let server = MockServer::start().await;
    let base = Url::parse(&format!("{}{BASE}", server.uri())).unwrap();
    let retry = RetryPolicy {
        max_retries: 1,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_secs(1),
    };
    let config = ClientConfig::new(base, Credentials::token(SecretString::from("t")))
        .with_folder(FolderScope::Id(1))
        .with_transport(TransportConfig::default().with_retry(retry));
    (server, OrchestratorClient::new(config).unwrap())
}

fn api(p: &str) -> String {
    format!("{BASE}{p}")
}

fn content(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), Value::from(*v)))
        .collect()
}

// ── Jobs ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_start_jobs_wraps_start_info() {
    let (server, client) = setup().await;
    let release_key = Uuid::parse_str("5b1f3c4e-9a55-4d0e-8f3c-2b7a1e0d9c11").unwrap();

    Mock::given(method("POST"))
        .and(path(api("odata/Jobs/UiPath.Server.Configuration.OData.StartJobs")))
        .and(body_json(json!({
            "startInfo": {
                "ReleaseKey": "5b1f3c4e-9a55-4d0e-8f3c-2b7a1e0d9c11",
                "Strategy": "ModernJobsCount",
                "JobsCount": 2,
                "InputArguments": "{\"InvoiceId\":\"INV-1\"}",
                "Source": "Manual"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "value": [
                { "Id": 11, "State": "Pending" },
                { "Id": 12, "State": "Pending" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let info = StartInfo::new(release_key)
        .jobs_count(2)
        .input_arguments(&json!({ "InvoiceId": "INV-1" }));
    let jobs = client.jobs().start(&info).await.unwrap();

    assert_eq!(jobs.iter().map(|j| j.id).collect::<Vec<_>>(), vec![11, 12]);
    assert!(jobs.iter().all(|j| j.state == JobState::Pending));
}

#[tokio::test]
async fn test_start_specific_without_robots_is_rejected_locally() {
    let (server, client) = setup().await;
    let info = StartInfo::new(Uuid::nil()).on_robots(vec![]);

    let err = client.jobs().start(&info).await.unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "robot_ids"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_stop_job_sends_strategy() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("odata/Jobs(42)/UiPath.Server.Configuration.OData.StopJob")))
        .and(body_json(json!({ "strategy": "SoftStop" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("odata/Jobs/UiPath.Server.Configuration.OData.StopJobs")))
        .and(body_json(json!({ "jobIds": [1, 2], "strategy": "Kill" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.jobs().stop(42, StopStrategy::SoftStop).await.unwrap();
    client.jobs().stop_many(&[1, 2], StopStrategy::Kill).await.unwrap();
    assert!(client.jobs().stop_many(&[], StopStrategy::Kill).await.is_err());
}

// ── Queues ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_queue_item_names_the_queue() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("odata/Queues/UiPathODataSvc.AddQueueItem")))
        .and(body_json(json!({
            "itemData": {
                "Name": "Invoices",
                "Priority": "High",
                "SpecificContent": { "InvoiceId": "INV-1" },
                "Reference": "INV-1"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "Id": 900,
            "Status": "New",
            "Priority": "High",
            "Reference": "INV-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let data = QueueItemData::new(content(&[("InvoiceId", "INV-1")]))
        .priority(QueueItemPriority::High)
        .reference("INV-1");
    let item = client.queues().add_item("Invoices", &data).await.unwrap();

    assert_eq!(item.id, 900);
    assert_eq!(item.status, QueueItemStatus::New);
}

#[tokio::test]
async fn test_bulk_add_reports_failures() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("odata/Queues/UiPathODataSvc.BulkAddQueueItems")))
        .and(body_string_contains("\"commitType\":\"ProcessAllIndependently\""))
        .and(body_string_contains("\"queueName\":\"Invoices\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Success": false,
            "FailedItems": [{ "Reference": "dup" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = vec![
        QueueItemData::new(content(&[("n", "1")])),
        QueueItemData::new(content(&[("n", "2")])).reference("dup"),
    ];
    let result = client
        .queues()
        .bulk_add_items("Invoices", &items, BulkCommitType::ProcessAllIndependently)
        .await
        .unwrap();

    assert_eq!(result.success, Some(false));
    assert_eq!(result.failed_items.len(), 1);

    let err = client
        .queues()
        .bulk_add_items("Invoices", &[], BulkCommitType::AllOrNothing)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[tokio::test]
async fn test_start_transaction_handles_empty_queue() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("odata/Queues/UiPathODataSvc.StartTransaction")))
        .and(body_json(json!({
            "transactionData": { "Name": "Invoices", "RobotIdentifier": "robot-key" }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let next = client
        .queues()
        .start_transaction("Invoices", Some("robot-key"), None)
        .await
        .unwrap();
    assert!(next.is_none());
}

#[tokio::test]
async fn test_set_transaction_result_posts_to_item() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("odata/Queues(900)/UiPathODataSvc.SetTransactionResult")))
        .and(body_json(json!({
            "transactionResult": {
                "IsSuccessful": false,
                "ProcessingException": { "Reason": "amount mismatch", "Type": "BusinessException" }
            }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = TransactionResult::failure(ExceptionType::BusinessException, "amount mismatch");
    client
        .queues()
        .set_transaction_result(900, &result)
        .await
        .unwrap();
}

// ── Assets ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_asset_by_name_filters_and_limits() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("odata/Assets")))
        .and(query_param("$filter", "Name eq 'O''Brien'"))
        .and(query_param("$top", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let found = client.assets().get_by_name("O'Brien").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_create_text_asset() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("odata/Assets")))
        .and(body_json(json!({
            "Name": "ApiBaseUrl",
            "ValueScope": "Global",
            "ValueType": "Text",
            "StringValue": "https://erp.local"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "Id": 3,
            "Name": "ApiBaseUrl",
            "ValueType": "Text",
            "StringValue": "https://erp.local"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let asset = client
        .assets()
        .create(&NewAsset::text("ApiBaseUrl", "https://erp.local"))
        .await
        .unwrap();
    assert_eq!(asset.id, 3);
}

#[tokio::test]
async fn test_robot_asset_keeps_password_secret() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api(
            "odata/Assets/UiPath.Server.Configuration.OData.GetRobotAssetByNameForRobotKey(robotKey='r-1',assetName='ErpLogin')",
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Name": "ErpLogin",
            "ValueType": "Credential",
            "CredentialUsername": "svc-erp",
            "CredentialPassword": "p@ss"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let asset = client
        .assets()
        .get_robot_asset("r-1", "ErpLogin")
        .await
        .unwrap();
    assert_eq!(asset.credential_username.as_deref(), Some("svc-erp"));
    assert_eq!(asset.credential_password.unwrap().expose_secret(), "p@ss");
    assert!(!format!("{:?}", asset.extra).contains("p@ss"));
}

// ── Packages ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_package_upload_and_download() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("odata/Processes/UiPath.Server.Configuration.OData.UploadPackage")))
        .and(body_string_contains("filename=\"Invoices.1.0.2.nupkg\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{ "Body": "{\"Id\":\"Invoices\"}", "Status": "Ok" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api(
            "odata/Processes/UiPath.Server.Configuration.OData.DownloadPackage(key='Invoices:1.0.2')",
        )))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04nupkg".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let uploaded = client
        .packages()
        .upload("Invoices.1.0.2.nupkg", Bytes::from_static(b"PK\x03\x04nupkg"))
        .await
        .unwrap();
    assert_eq!(uploaded["value"][0]["Status"], "Ok");

    let bytes = client.packages().download("Invoices:1.0.2").await.unwrap();
    assert_eq!(&bytes[..4], b"PK\x03\x04");
}

#[tokio::test]
async fn test_upload_requires_file_name() {
    let (_server, client) = setup().await;
    let err = client
        .packages()
        .upload("", Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "file_name"));
}

// ── Folders ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_folder_key_endpoints() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(api("api/Folders/DeleteByKey")))
        .and(query_param("key", "f-key"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(api("api/Folders/PatchNameDescription")))
        .and(query_param("key", "f-key"))
        .and(body_json(json!({ "Name": "Finance" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client
        .folders()
        .update_name_description("f-key", Some("Finance"), Some(""))
        .await
        .unwrap();
    client.folders().delete_by_key("f-key").await.unwrap();
}

#[tokio::test]
async fn test_folder_calls_drop_folder_header() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("odata/Folders")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{ "Id": 1, "DisplayName": "Shared", "FullyQualifiedName": "Shared" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.folders().list(&ODataQuery::new()).await.unwrap();
    assert_eq!(page.value.len(), 1);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("x-uipath-organizationunitid"));
    assert!(!requests[0].headers.contains_key("x-uipath-folderpath"));
}

// ── Maintenance ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_maintenance_start_uses_query_parameters() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("api/Maintenance/Start")))
        .and(query_param("phase", "Draining"))
        .and(query_param("force", "false"))
        .and(query_param("killJobs", "true"))
        .and(query_param("tenantId", "3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .maintenance()
        .start(MaintenancePhase::Draining, false, true, Some(3))
        .await
        .unwrap();
}

// ── Webhooks ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_webhook_validates_and_posts() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("odata/Webhooks")))
        .and(body_json(json!({
            "Name": "ops",
            "Url": "https://hooks.example.com/uipath",
            "Enabled": true,
            "Secret": "s3cr3t",
            "SubscribeToAllEvents": false,
            "AllowInsecureSsl": false,
            "Events": [{ "EventType": "job.faulted" }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "Id": 4,
            "Url": "https://hooks.example.com/uipath",
            "Enabled": true,
            "Events": [{ "EventType": "job.faulted" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hook = NewWebhook::new("ops", "https://hooks.example.com/uipath")
        .secret("s3cr3t")
        .events(["job.faulted"]);
    let created = client.webhooks().create(&hook).await.unwrap();
    assert_eq!(created.id, 4);
    assert_eq!(created.events[0].event_type, "job.faulted");

    let bad = NewWebhook::new("ops", "not a url");
    assert!(client.webhooks().create(&bad).await.is_err());
}

#[test]
fn test_signed_delivery_round_trip() {
    let body = br#"{"Type":"queueItem.added","EventId":"e-9","TenantId":7}"#;
    let signature = webhooks::sign(b"s3cr3t", body);

    let event = webhooks::parse_event(b"s3cr3t", body, &signature).unwrap();
    assert_eq!(event.event_type, "queueItem.added");
    assert_eq!(event.tenant_id, Some(7));

    let err = webhooks::parse_event(b"other", body, &signature).unwrap_err();
    assert!(matches!(err, Error::InvalidSignature));
}

// ── Stats & status ──────────────────────────────────────────────────

#[tokio::test]
async fn test_count_stats_decode() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("api/Stats/GetCountStats")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "title": "Processes", "count": 12, "hasPermissions": true },
            { "title": "Queues", "count": 3, "hasPermissions": false }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let stats = client.stats().counts().await.unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].title, "Processes");
    assert_eq!(stats[1].count, 3);
}

#[tokio::test]
async fn test_status_tolerates_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("api/Status/Get")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.status().get().await.unwrap(), None);
}
