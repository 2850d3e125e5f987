//! Client layer: performs HTTP calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE, HeaderName};
use serde_json::Value;
use tokio::sync::Semaphore;

use crate::cursor::ApiCursor;
use crate::domain::{ApiKey, ApiUrl, Params, ValidationError};
use crate::entity::FromRecord;
use crate::resources::{Organization, Project};
use crate::transport::{
    ApiResponse, DEFAULT_COMPRESSION_THRESHOLD, Page, TransportError, decode_content,
    decode_count, decode_json_response, decode_page, encode_json_body, encode_query,
};

mod error;
#[cfg(test)]
pub(crate) mod testing;

pub use error::{ErrorKind, TelerivetError};

const DEFAULT_API_URL: &str = "https://api.telerivet.com/v1";
const DEFAULT_MAX_CONNECTIONS: usize = 5;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
pub(crate) struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub username: String,
    pub headers: Vec<(HeaderName, String)>,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub status: u16,
    pub content_encoding: Option<String>,
    pub body: Vec<u8>,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(request.method, &request.url)
                .basic_auth(request.username, Some(""));
            for (name, value) in request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let content_encoding = response
                .headers()
                .get(CONTENT_ENCODING)
                .and_then(|it| it.to_str().ok())
                .map(str::to_owned);
            let body = response.bytes().await?.to_vec();
            Ok(HttpResponse {
                status,
                content_encoding,
                body,
            })
        })
    }
}

/// Caps the number of requests in flight, and so the number of open sockets.
///
/// A permit is held until the response body has been read.
struct LimitedTransport<T> {
    inner: T,
    permits: Semaphore,
}

impl<T: HttpTransport> LimitedTransport<T> {
    fn new(inner: T, max_in_flight: usize) -> Self {
        Self {
            inner,
            permits: Semaphore::new(max_in_flight),
        }
    }
}

impl<T: HttpTransport> HttpTransport for LimitedTransport<T> {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let _permit = self.permits.acquire().await?;
            self.inner.send(request).await
        })
    }
}

#[derive(Debug, Clone)]
/// Authentication credentials for Telerivet API calls.
///
/// Each API key belongs to a Telerivet user account; every call runs with that
/// user's permissions.
pub struct Auth {
    api_key: ApiKey,
}

impl Auth {
    /// Create [`Auth`] from an API key and validate that it is non-empty after trimming.
    pub fn api_key(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            api_key: ApiKey::new(value)?,
        })
    }

    fn username(&self) -> &str {
        self.api_key.as_str()
    }
}

#[derive(Debug, Clone)]
/// Builder for [`TelerivetClient`].
///
/// Use this when you need to customize the API url, timeout, user-agent, pool size
/// or the request compression threshold.
pub struct TelerivetClientBuilder {
    auth: Auth,
    api_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    max_connections: usize,
    compression_threshold: usize,
}

impl TelerivetClientBuilder {
    /// Create a builder with the default API url and no timeout/user-agent override.
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            api_url: DEFAULT_API_URL.to_owned(),
            timeout: None,
            user_agent: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            compression_threshold: DEFAULT_COMPRESSION_THRESHOLD,
        }
    }

    /// Override the versioned API base url (default `https://api.telerivet.com/v1`).
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Bound the number of concurrent connections (default 5).
    ///
    /// Requests beyond the bound wait for a free slot; idle keep-alive connections
    /// are pooled up to the same bound.
    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// JSON bodies of at least this many bytes are sent gzip-compressed (default 400).
    pub fn compression_threshold(mut self, bytes: usize) -> Self {
        self.compression_threshold = bytes;
        self
    }

    /// Build a [`TelerivetClient`].
    pub fn build(self) -> Result<TelerivetClient, TelerivetError> {
        let api_url = ApiUrl::new(self.api_url)?;
        if self.max_connections == 0 {
            return Err(ValidationError::ZeroLimit {
                field: "max_connections",
            }
            .into());
        }

        let user_agent = self.user_agent.unwrap_or_else(default_user_agent);
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(self.max_connections)
            .user_agent(user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|err| TelerivetError::Transport(Box::new(err)))?;

        Ok(TelerivetClient {
            auth: self.auth,
            api_url,
            compression_threshold: self.compression_threshold,
            num_requests: Arc::new(AtomicU64::new(0)),
            http: Arc::new(LimitedTransport::new(
                ReqwestTransport { client },
                self.max_connections,
            )),
        })
    }
}

fn default_user_agent() -> String {
    format!("telerivet-rust/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Clone)]
/// Handle to the Telerivet REST API.
///
/// Cloning is cheap: clones share the connection pool and the request counter.
/// Entities and cursors keep a clone so they can load, save and page on their own.
pub struct TelerivetClient {
    auth: Auth,
    api_url: ApiUrl,
    compression_threshold: usize,
    num_requests: Arc<AtomicU64>,
    http: Arc<dyn HttpTransport>,
}

impl fmt::Debug for TelerivetClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelerivetClient")
            .field("api_url", &self.api_url.as_str())
            .field("num_requests", &self.num_requests())
            .finish_non_exhaustive()
    }
}

impl TelerivetClient {
    /// Create a client using the default settings.
    ///
    /// For more customization, use [`TelerivetClient::builder`].
    pub fn new(auth: Auth) -> Result<Self, TelerivetError> {
        TelerivetClientBuilder::new(auth).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(auth: Auth) -> TelerivetClientBuilder {
        TelerivetClientBuilder::new(auth)
    }

    /// Number of requests issued through this client and its clones.
    pub fn num_requests(&self) -> u64 {
        self.num_requests.load(Ordering::Relaxed)
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_str()
    }

    /// Perform one request against `path` (relative to the API url) and return the
    /// parsed JSON body.
    ///
    /// GET and DELETE send `params` in the query string; POST and PUT send them as a
    /// JSON body, gzip-compressed once it reaches the compression threshold.
    ///
    /// Errors:
    /// - [`TelerivetError::Transport`] when the request could not be performed,
    /// - [`TelerivetError::Protocol`] when the body is not JSON,
    /// - [`TelerivetError::InvalidParameter`], [`TelerivetError::NotFound`] or
    ///   [`TelerivetError::Api`] when the body carries an `error` envelope.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
    ) -> Result<Value, TelerivetError> {
        let params = params.filter(|it| !it.is_empty());
        let sends_body = matches!(method, Method::POST | Method::PUT);

        let mut url = self.api_url.join(path);
        let mut headers = vec![(ACCEPT_ENCODING, "gzip".to_owned())];
        let mut body = None;
        let mut compressed = false;

        match params {
            Some(params) if sends_body => {
                let encoded = encode_json_body(params, self.compression_threshold)
                    .map_err(|err| TelerivetError::Parse(Box::new(err)))?;
                headers.push((CONTENT_TYPE, "application/json".to_owned()));
                if encoded.gzip {
                    headers.push((CONTENT_ENCODING, "gzip".to_owned()));
                    compressed = true;
                }
                body = Some(encoded.bytes);
            }
            Some(params) => {
                let query = encode_query(params);
                if !query.is_empty() {
                    url.push('?');
                    url.push_str(&query);
                }
            }
            None => {}
        }

        let number = self.num_requests.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(%method, path, request = number, compressed, "sending API request");

        let response = self
            .http
            .send(HttpRequest {
                method,
                url,
                username: self.auth.username().to_owned(),
                headers,
                body,
            })
            .await
            .map_err(TelerivetError::Transport)?;

        let status = response.status;
        let body = decode_content(response.body, response.content_encoding.as_deref())
            .map_err(|err| TelerivetError::Parse(Box::new(err)))?;

        match decode_json_response(&body) {
            Ok(ApiResponse::Ok(value)) if (200..=299).contains(&status) => Ok(value),
            Ok(ApiResponse::Ok(_)) => {
                let text = String::from_utf8_lossy(&body);
                Err(TelerivetError::HttpStatus {
                    status,
                    body: (!text.trim().is_empty()).then(|| text.into_owned()),
                })
            }
            Ok(ApiResponse::Error(error)) => {
                tracing::debug!(request = number, code = ?error.code, "API returned an error");
                Err(TelerivetError::from_api_error(error))
            }
            Err(TransportError::Json(_)) => Err(TelerivetError::Protocol {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
            Err(err) => Err(TelerivetError::Parse(Box::new(err))),
        }
    }

    /// Build a cursor over the collection at `path`.
    ///
    /// Fails with [`TelerivetError::Construction`] when `params` contains `count`;
    /// use [`ApiCursor::count`] instead.
    pub fn cursor<E: FromRecord>(
        &self,
        path: impl Into<String>,
        params: Params,
    ) -> Result<ApiCursor<E>, TelerivetError> {
        ApiCursor::new(self.clone(), path.into(), params)
    }

    pub(crate) async fn request_page(&self, path: &str, params: &Params) -> Result<Page, TelerivetError> {
        let value = self.request(Method::GET, path, Some(params)).await?;
        decode_page(value).map_err(|err| TelerivetError::Parse(Box::new(err)))
    }

    pub(crate) async fn request_count(&self, path: &str, params: &Params) -> Result<u64, TelerivetError> {
        let value = self.request(Method::GET, path, Some(params)).await?;
        decode_count(value).map_err(|err| TelerivetError::Parse(Box::new(err)))
    }

    /// Perform a request whose response is a single record, wrapped as a loaded entity.
    pub(crate) async fn request_entity<E: FromRecord>(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
    ) -> Result<E, TelerivetError> {
        let value = self.request(method, path, params).await?;
        let data = into_record(value)?;
        Ok(E::from_record(self.clone(), data, true))
    }

    /// Retrieve the project with the given id.
    pub async fn get_project_by_id(&self, id: &str) -> Result<Project, TelerivetError> {
        self.request_entity(Method::GET, &format!("/projects/{id}"), None)
            .await
    }

    /// Reference a project by id without making an API request.
    pub fn init_project_by_id(&self, id: &str) -> Project {
        Project::from_record(self.clone(), record_with([("id", id)]), false)
    }

    /// Query projects accessible to the current user account.
    ///
    /// Supported options include `name` (with modifiers such as `name[prefix]`),
    /// `sort`, `sort_dir`, `page_size` and `offset`.
    pub fn query_projects(&self, options: Params) -> Result<ApiCursor<Project>, TelerivetError> {
        self.cursor("/projects", options)
    }

    /// Retrieve the organization with the given id.
    pub async fn get_organization_by_id(&self, id: &str) -> Result<Organization, TelerivetError> {
        self.request_entity(Method::GET, &format!("/organizations/{id}"), None)
            .await
    }

    /// Reference an organization by id without making an API request.
    pub fn init_organization_by_id(&self, id: &str) -> Organization {
        Organization::from_record(self.clone(), record_with([("id", id)]), false)
    }

    /// Query organizations accessible to the current user account.
    pub fn query_organizations(
        &self,
        options: Params,
    ) -> Result<ApiCursor<Organization>, TelerivetError> {
        self.cursor("/organizations", options)
    }
}

/// Interpret a response body as a single record.
pub(crate) fn into_record(value: Value) -> Result<Params, TelerivetError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(TelerivetError::Parse(
            format!("expected a JSON object record, got {other}").into(),
        )),
    }
}

/// Build the identifying data of an unloaded entity.
pub(crate) fn record_with<const N: usize>(keys: [(&str, &str); N]) -> Params {
    keys.into_iter()
        .map(|(name, value)| (name.to_owned(), Value::String(value.to_owned())))
        .collect()
}
