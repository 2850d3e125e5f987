//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::sync::{Arc, Mutex};
use std::sync::atomic::AtomicU64;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use reqwest::header::{CONTENT_ENCODING, HeaderName};
use serde_json::Value;

use super::*;

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug, Default)]
struct FakeTransportState {
    requests: Vec<HttpRequest>,
    responses: VecDeque<Canned>,
}

#[derive(Debug)]
enum Canned {
    Response(HttpResponse),
    Failure(String),
    /// Never completes.
    Pending,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_raw(&self, status: u16, content_encoding: Option<&str>, body: Vec<u8>) {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(Canned::Response(HttpResponse {
                status,
                content_encoding: content_encoding.map(str::to_owned),
                body,
            }));
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.push_raw(status, None, serde_json::to_vec(&body).unwrap());
    }

    pub fn push_gzip_json(&self, status: u16, body: Value) {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&serde_json::to_vec(&body).unwrap())
            .unwrap();
        self.push_raw(status, Some("gzip"), encoder.finish().unwrap());
    }

    pub fn push_failure(&self, message: &str) {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(Canned::Failure(message.to_owned()));
    }

    /// Queue a response that never arrives, for exercising dropped requests.
    pub fn push_pending(&self) {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(Canned::Pending);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.state
            .lock()
            .unwrap()
            .requests
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl HttpTransport for FakeTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let canned = {
                let mut state = self.state.lock().unwrap();
                state.requests.push(request);
                state.responses.pop_front()
            };
            match canned {
                Some(Canned::Response(response)) => Ok(response),
                Some(Canned::Failure(message)) => Err(message.into()),
                Some(Canned::Pending) => std::future::pending().await,
                None => Err("no canned response left".into()),
            }
        })
    }
}

impl HttpRequest {
    pub fn header(&self, name: HeaderName) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Request body as JSON, inflated when it was sent gzip-compressed.
    pub fn json_body(&self) -> Value {
        let body = self.body.as_deref().expect("request has no body");
        if self.header(CONTENT_ENCODING) == Some("gzip") {
            let mut inflated = Vec::new();
            GzDecoder::new(body).read_to_end(&mut inflated).unwrap();
            serde_json::from_slice(&inflated).unwrap()
        } else {
            serde_json::from_slice(body).unwrap()
        }
    }

    /// Path and query relative to the fake API url.
    pub fn path(&self) -> &str {
        self.url
            .strip_prefix("https://example.invalid/v1")
            .unwrap_or(&self.url)
    }
}

pub(crate) fn fake_client(transport: &FakeTransport) -> TelerivetClient {
    TelerivetClient {
        auth: Auth::api_key("test_key").unwrap(),
        api_url: ApiUrl::new("https://example.invalid/v1").unwrap(),
        compression_threshold: DEFAULT_COMPRESSION_THRESHOLD,
        num_requests: Arc::new(AtomicU64::new(0)),
        http: Arc::new(transport.clone()),
    }
}

pub(crate) fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other:?}"),
    }
}
