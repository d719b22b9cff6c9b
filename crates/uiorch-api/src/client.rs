// Orchestrator HTTP client
//
// Wraps `reqwest::Client` with bearer-token injection, tenant and folder
// headers, retry/backoff, one-shot token refresh on 401, and mapping of
// error statuses to typed errors. Every resource group in `resources/`
// goes through the request helpers defined here.

use std::sync::Arc;
use std::time::Duration;

use async_stream::try_stream;
use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{Authenticator, Credentials};
use crate::error::{ApiError, Error};
use crate::odata::{ODataList, ODataQuery};
use crate::transport::{RetryPolicy, RetryVerdict, TransportConfig};

/// Automation Cloud root; tenants live at `{root}/{org}/{tenant}/orchestrator_/`.
pub const CLOUD_URL: &str = "https://cloud.uipath.com";

pub const TENANT_HEADER: &str = "X-UIPATH-TenantName";
pub const FOLDER_ID_HEADER: &str = "X-UIPATH-OrganizationUnitId";
pub const FOLDER_PATH_HEADER: &str = "X-UIPATH-FolderPath";

/// Default page size used by the `list_all` helpers.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

pub(crate) type Params<'a> = &'a [(&'a str, String)];

/// Which folder (organization unit) a call operates in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderScope {
    /// Numeric folder id, sent as `X-UIPATH-OrganizationUnitId`.
    Id(i64),
    /// Fully qualified folder path, sent as `X-UIPATH-FolderPath`.
    Path(String),
}

/// Everything needed to talk to one Orchestrator tenant.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Orchestrator root, e.g. `https://cloud.uipath.com/acme/DefaultTenant/orchestrator_/`
    /// or `https://orchestrator.corp.local/`.
    pub base_url: Url,
    pub credentials: Credentials,
    /// Sent as `X-UIPATH-TenantName` when set.
    pub tenant_name: Option<String>,
    pub folder: Option<FolderScope>,
    pub transport: TransportConfig,
}

impl ClientConfig {
    pub fn new(base_url: Url, credentials: Credentials) -> Self {
        Self {
            base_url,
            credentials,
            tenant_name: None,
            folder: None,
            transport: TransportConfig::default(),
        }
    }

    /// Automation Cloud tenant: `https://cloud.uipath.com/{org}/{tenant}/orchestrator_/`.
    pub fn cloud(organization: &str, tenant: &str, credentials: Credentials) -> Result<Self, Error> {
        if organization.is_empty() {
            return Err(Error::validation("organization", "must not be empty"));
        }
        if tenant.is_empty() {
            return Err(Error::validation("tenant", "must not be empty"));
        }
        let base_url = Url::parse(&format!("{CLOUD_URL}/{organization}/{tenant}/orchestrator_/"))?;
        Ok(Self::new(base_url, credentials))
    }

    pub fn with_tenant_name(mut self, tenant_name: impl Into<String>) -> Self {
        self.tenant_name = Some(tenant_name.into());
        self
    }

    pub fn with_folder(mut self, folder: FolderScope) -> Self {
        self.folder = Some(folder);
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}

/// Request body, kept in a form that can be re-sent on retry.
#[derive(Debug, Clone)]
pub(crate) enum Payload {
    Empty,
    Json(Value),
    Upload { file_name: String, bytes: Bytes },
}

impl Payload {
    pub(crate) fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self, Error> {
        serde_json::to_value(body)
            .map(Self::Json)
            .map_err(|e| Error::validation("body", format!("not serializable: {e}")))
    }
}

/// Orchestrator error bodies from REST endpoints.
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_code: Option<Value>,
    #[serde(default)]
    trace_id: Option<String>,
}

/// Orchestrator error bodies from OData endpoints.
#[derive(serde::Deserialize)]
struct ODataErrorBody {
    error: ODataErrorInner,
}

#[derive(serde::Deserialize)]
struct ODataErrorInner {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

struct Inner {
    http: reqwest::Client,
    base_url: Url,
    auth: Authenticator,
    tenant_name: Option<String>,
    retry: RetryPolicy,
    /// Per-request limit of `http`, when this crate built it.
    timeout: Option<Duration>,
}

/// Async client for one Orchestrator tenant.
///
/// Cloning is cheap: clones share the HTTP pool and the token cache. Use
/// [`in_folder`](Self::in_folder) to get a handle scoped to another folder.
/// Resource groups hang off the client as borrowed handles:
/// `client.jobs().list(&query)`.
#[derive(Clone)]
pub struct OrchestratorClient {
    inner: Arc<Inner>,
    folder: Option<FolderScope>,
}

impl std::fmt::Debug for OrchestratorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("folder", &self.folder)
            .finish_non_exhaustive()
    }
}

impl OrchestratorClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client, creating the HTTP client from `config.transport`.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        let timeout = config.transport.timeout;
        Ok(Self::assemble(config, http, Some(timeout)))
    }

    /// Wrap an existing `reqwest::Client`. Timeout and TLS settings of
    /// `config.transport` are then the caller's responsibility; the retry
    /// policy still applies.
    pub fn with_http(config: ClientConfig, http: reqwest::Client) -> Self {
        Self::assemble(config, http, None)
    }

    fn assemble(config: ClientConfig, http: reqwest::Client, timeout: Option<Duration>) -> Self {
        let base_url = normalize_base_url(config.base_url);
        let auth = Authenticator::new(config.credentials, base_url.clone());
        Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                auth,
                tenant_name: config.tenant_name,
                retry: config.transport.retry,
                timeout,
            }),
            folder: config.folder,
        }
    }

    /// The normalized Orchestrator base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The folder scope applied to every request from this handle.
    pub fn folder(&self) -> Option<&FolderScope> {
        self.folder.as_ref()
    }

    /// A handle sharing this client's connection and token, scoped to `folder`.
    pub fn in_folder(&self, folder: FolderScope) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            folder: Some(folder),
        }
    }

    /// A handle with no folder header (tenant-level endpoints).
    pub fn without_folder(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            folder: None,
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"odata/Jobs(5)"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Core send loop ───────────────────────────────────────────────

    fn build_request(
        &self,
        method: Method,
        url: Url,
        params: Params<'_>,
        payload: &Payload,
        token: &SecretString,
    ) -> Result<reqwest::RequestBuilder, Error> {
        let mut builder = self
            .inner
            .http
            .request(method, url)
            .bearer_auth(token.expose_secret())
            .header(ACCEPT, "application/json");

        if let Some(ref tenant) = self.inner.tenant_name {
            builder = builder.header(TENANT_HEADER, tenant);
        }
        match self.folder {
            Some(FolderScope::Id(id)) => builder = builder.header(FOLDER_ID_HEADER, id.to_string()),
            Some(FolderScope::Path(ref path)) => builder = builder.header(FOLDER_PATH_HEADER, path),
            None => {}
        }
        if !params.is_empty() {
            builder = builder.query(params);
        }

        builder = match payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(body),
            Payload::Upload { file_name, bytes } => {
                let len = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
                let part = Part::stream_with_length(bytes.clone(), len)
                    .file_name(file_name.clone())
                    .mime_str("application/octet-stream")?;
                builder.multipart(Form::new().part("file", part))
            }
        };
        Ok(builder)
    }

    /// Send a request, applying token refresh and the retry policy.
    ///
    /// Returns the final response whatever its status; callers decide how
    /// to interpret it.
    async fn send(
        &self,
        method: Method,
        path: &str,
        params: Params<'_>,
        payload: &Payload,
    ) -> Result<reqwest::Response, Error> {
        let url = self.url(path)?;
        let idempotent = method.is_idempotent();
        let mut attempt: u32 = 0;
        let mut refreshed = false;

        loop {
            let token = self.inner.auth.token(&self.inner.http).await?;
            debug!("{method} {url}");
            let request =
                self.build_request(method.clone(), url.clone(), params, payload, &token)?;

            match request.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status == StatusCode::UNAUTHORIZED && !refreshed && self.inner.auth.can_refresh()
                    {
                        debug!("token rejected, refreshing and retrying once");
                        refreshed = true;
                        self.inner.auth.invalidate(&token).await;
                        continue;
                    }

                    match self
                        .inner
                        .retry
                        .on_status(status, resp.headers(), attempt, idempotent)
                    {
                        RetryVerdict::Retry(delay) => {
                            warn!(%status, attempt, ?delay, "retrying {method} {url}");
                            attempt += 1;
                            tokio::time::sleep(delay).await;
                        }
                        RetryVerdict::RateLimited(retry_after_secs) => {
                            return Err(Error::RateLimited { retry_after_secs });
                        }
                        RetryVerdict::GiveUp => return Ok(resp),
                    }
                }
                Err(err) => match self.inner.retry.on_transport(&err, attempt, idempotent) {
                    RetryVerdict::Retry(delay) => {
                        warn!(error = %err, attempt, ?delay, "retrying {method} {url}");
                        attempt += 1;
                        tokio::time::sleep(delay).await;
                    }
                    RetryVerdict::GiveUp | RetryVerdict::RateLimited(_) => {
                        return Err(self.transport_error(err));
                    }
                },
            }
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout: self.inner.timeout,
            }
        } else {
            Error::Transport(err)
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }
        let body = resp.text().await?;
        decode(&body)
    }

    async fn handle_optional<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<Option<T>, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }
        let body = resp.text().await?;
        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(None);
        }
        decode(&body).map(Some)
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        Error::from_status(error_detail(status, &raw))
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.get_with_params(path, &[]).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Params<'_>,
    ) -> Result<T, Error> {
        let resp = self.send(Method::GET, path, params, &Payload::Empty).await?;
        Self::handle_response(resp).await
    }

    /// GET that tolerates an empty body (`None`).
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Params<'_>,
    ) -> Result<Option<T>, Error> {
        let resp = self.send(Method::GET, path, params, &Payload::Empty).await?;
        Self::handle_optional(resp).await
    }

    /// GET an OData collection with system query options.
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &ODataQuery,
    ) -> Result<ODataList<T>, Error> {
        self.get_with_params(path, &query.to_params()).await
    }

    /// GET a binary payload (package download, export, screenshot).
    pub(crate) async fn get_bytes(&self, path: &str, params: Params<'_>) -> Result<Bytes, Error> {
        let resp = self.send(Method::GET, path, params, &Payload::Empty).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }
        Ok(resp.bytes().await?)
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let resp = self
            .send(Method::POST, path, &[], &Payload::json(body)?)
            .await?;
        Self::handle_response(resp).await
    }

    /// POST whose response may legitimately be empty (e.g. 204 No Content).
    pub(crate) async fn post_optional<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, Error> {
        let resp = self
            .send(Method::POST, path, &[], &Payload::json(body)?)
            .await?;
        Self::handle_optional(resp).await
    }

    pub(crate) async fn post_no_response<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let resp = self
            .send(Method::POST, path, &[], &Payload::json(body)?)
            .await?;
        Self::handle_empty(resp).await
    }

    /// POST with query parameters and no body.
    pub(crate) async fn post_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Params<'_>,
    ) -> Result<Option<T>, Error> {
        let resp = self.send(Method::POST, path, params, &Payload::Empty).await?;
        Self::handle_optional(resp).await
    }

    pub(crate) async fn post_params_no_response(
        &self,
        path: &str,
        params: Params<'_>,
    ) -> Result<(), Error> {
        let resp = self.send(Method::POST, path, params, &Payload::Empty).await?;
        Self::handle_empty(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, Error> {
        let resp = self
            .send(Method::PUT, path, &[], &Payload::json(body)?)
            .await?;
        Self::handle_optional(resp).await
    }

    pub(crate) async fn put_no_response<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let resp = self
            .send(Method::PUT, path, &[], &Payload::json(body)?)
            .await?;
        Self::handle_empty(resp).await
    }

    pub(crate) async fn patch_no_response<B: Serialize + ?Sized>(
        &self,
        path: &str,
        params: Params<'_>,
        body: &B,
    ) -> Result<(), Error> {
        let resp = self
            .send(Method::PATCH, path, params, &Payload::json(body)?)
            .await?;
        Self::handle_empty(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        self.delete_with_params(path, &[]).await
    }

    pub(crate) async fn delete_with_params(
        &self,
        path: &str,
        params: Params<'_>,
    ) -> Result<(), Error> {
        let resp = self.send(Method::DELETE, path, params, &Payload::Empty).await?;
        Self::handle_empty(resp).await
    }

    /// Multipart upload of a single file under the `file` form field.
    pub(crate) async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<T, Error> {
        if file_name.is_empty() {
            return Err(Error::validation("file_name", "must not be empty"));
        }
        let payload = Payload::Upload {
            file_name: file_name.to_owned(),
            bytes,
        };
        let resp = self.send(Method::POST, path, &[], &payload).await?;
        Self::handle_response(resp).await
    }

    // ── Generic escape hatch ─────────────────────────────────────────

    /// Send an arbitrary request relative to the base URL.
    ///
    /// Returns `None` when the response carries no content. Use this for
    /// endpoints that have no typed wrapper.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Option<Value>, Error> {
        let payload = body.map_or(Payload::Empty, |b| Payload::Json(b.clone()));
        let resp = self.send(method, path, params, &payload).await?;
        Self::handle_optional(resp).await
    }

    // ── Pagination ───────────────────────────────────────────────────

    /// Lazily walk every page of an OData collection.
    ///
    /// Pages are requested with `$top=page_size`, advancing `$skip`, and
    /// `$count=true`. Any `$top` in `query` is replaced; `$skip` is used as
    /// the starting offset. The stream ends on a short page or once
    /// `@odata.count` items have been seen.
    pub fn stream_all<'a, T>(
        &'a self,
        path: &'a str,
        query: ODataQuery,
        page_size: u32,
    ) -> impl Stream<Item = Result<T, Error>> + 'a
    where
        T: DeserializeOwned + 'a,
    {
        try_stream! {
            let page_size = page_size.max(1);
            let mut skip = query.skip.unwrap_or(0);

            loop {
                let params = query.clone().top(page_size).skip(skip).count(true).to_params();
                let page: ODataList<T> = self.get_with_params(path, &params).await?;
                let received = u32::try_from(page.value.len()).unwrap_or(u32::MAX);
                let total = page.count;

                for item in page.value {
                    yield item;
                }

                skip = skip.saturating_add(received);
                if received < page_size || total.is_some_and(|t| i64::from(skip) >= t) {
                    break;
                }
            }
        }
    }

    /// Collect every page of an OData collection into one `Vec<T>`.
    pub async fn collect_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &ODataQuery,
        page_size: u32,
    ) -> Result<Vec<T>, Error> {
        self.stream_all(path, query.clone(), page_size)
            .try_collect()
            .await
    }
}

/// Ensure the base path ends with `/` so relative joins append instead of replace.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    url
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

fn value_to_code(v: Value) -> String {
    match v {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Extract message, error code, and trace id from an error body.
fn error_detail(status: StatusCode, raw: &str) -> ApiError {
    let fallback = || {
        if raw.trim().is_empty() {
            status.to_string()
        } else {
            raw.chars().take(500).collect()
        }
    };

    if let Ok(odata) = serde_json::from_str::<ODataErrorBody>(raw) {
        return ApiError {
            status: status.as_u16(),
            message: odata.error.message.unwrap_or_else(fallback),
            error_code: odata.error.code.map(value_to_code).filter(|c| !c.is_empty()),
            trace_id: None,
        };
    }

    if let Ok(rest) = serde_json::from_str::<RestErrorBody>(raw) {
        if rest.message.is_some() || rest.error_code.is_some() {
            return ApiError {
                status: status.as_u16(),
                message: rest.message.unwrap_or_else(fallback),
                error_code: rest.error_code.map(value_to_code),
                trace_id: rest.trace_id,
            };
        }
    }

    ApiError {
        status: status.as_u16(),
        message: fallback(),
        error_code: None,
        trace_id: None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_rest_error_body() {
        let d = error_detail(
            StatusCode::NOT_FOUND,
            r#"{"message":"Robot does not exist.","errorCode":1002,"traceId":"00-abc"}"#,
        );
        assert_eq!(d.status, 404);
        assert_eq!(d.message, "Robot does not exist.");
        assert_eq!(d.error_code.as_deref(), Some("1002"));
        assert_eq!(d.trace_id.as_deref(), Some("00-abc"));
    }

    #[test]
    fn parses_odata_error_body() {
        let d = error_detail(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":"","message":"The query specified in the URI is not valid."}}"#,
        );
        assert_eq!(d.message, "The query specified in the URI is not valid.");
        assert_eq!(d.error_code, None);
    }

    #[test]
    fn falls_back_to_raw_text_or_status() {
        let d = error_detail(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(d.message, "upstream down");

        let d = error_detail(StatusCode::CONFLICT, "");
        assert_eq!(d.message, "409 Conflict");
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = normalize_base_url(Url::parse("https://host/acme/tenant/orchestrator_").unwrap());
        assert_eq!(url.as_str(), "https://host/acme/tenant/orchestrator_/");
        assert_eq!(
            url.join("odata/Jobs(5)").unwrap().as_str(),
            "https://host/acme/tenant/orchestrator_/odata/Jobs(5)"
        );
    }

    #[test]
    fn cloud_config_composes_tenant_url() {
        let cfg = ClientConfig::cloud(
            "acme",
            "DefaultTenant",
            Credentials::token(SecretString::from("t")),
        )
        .unwrap();
        assert_eq!(
            cfg.base_url.as_str(),
            "https://cloud.uipath.com/acme/DefaultTenant/orchestrator_/"
        );
        assert!(ClientConfig::cloud("", "t", Credentials::token(SecretString::from("t"))).is_err());
    }
}
