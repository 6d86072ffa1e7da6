//! Where the catalog document comes from.
//!
//! Uses enum dispatch instead of a trait object because async methods are
//! not dyn-compatible. [`HttpSource`] is the production path; [`StubSource`]
//! is a scripted in-memory source for tests and local runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde_json::Value;

use crate::error::FetchError;

/// Remote document used when no URL is configured.
pub const DEFAULT_SOURCE_URL: &str =
    "https://drive.google.com/uc?export=download&id=1zMA50U_5IDNZjxxuert2egrZwkM3lQqp";

/// A source of catalog documents.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Plain HTTP GET against a fixed URL.
    Http(HttpSource),
    /// Scripted in-memory responses.
    Stub(StubSource),
}

impl DocumentSource {
    /// Fetch and parse one document.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on network failure, a non-2xx status, or a
    /// body that is not JSON.
    pub async fn fetch(&self) -> Result<Value, FetchError> {
        match self {
            Self::Http(source) => source.fetch().await,
            Self::Stub(source) => source.fetch(),
        }
    }

    /// Human-readable description for logging.
    pub fn describe(&self) -> &str {
        match self {
            Self::Http(source) => source.url(),
            Self::Stub(_) => "stub",
        }
    }
}

impl From<HttpSource> for DocumentSource {
    fn from(source: HttpSource) -> Self {
        Self::Http(source)
    }
}

impl From<StubSource> for DocumentSource {
    fn from(source: StubSource) -> Self {
        Self::Stub(source)
    }
}

// ---------------------------------------------------------------------------
// HTTP source
// ---------------------------------------------------------------------------

/// Fetches the document with an unauthenticated GET.
///
/// Redirects are followed (file hosts commonly answer the download link
/// with a redirect). No conditional-fetch headers are sent.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    /// Build a source for `url` whose requests give up after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// The configured document URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Request(format!("GET {}: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(format!("reading body of {}: {e}", self.url)))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Stub source
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct StubInner {
    next: Mutex<Result<Value, FetchError>>,
    fetches: AtomicUsize,
}

/// In-memory source that returns whatever it was last told to.
///
/// Clones share state, so a test can hand one clone to the loader and keep
/// another to flip between success and failure.
#[derive(Debug, Clone)]
pub struct StubSource {
    inner: Arc<StubInner>,
}

impl StubSource {
    /// A stub that fails every fetch until a document is set.
    pub fn new() -> Self {
        Self::with_response(Err(FetchError::Request(String::from(
            "stub has no document",
        ))))
    }

    /// A stub that serves `document`.
    pub fn with_document(document: Value) -> Self {
        Self::with_response(Ok(document))
    }

    fn with_response(response: Result<Value, FetchError>) -> Self {
        Self {
            inner: Arc::new(StubInner {
                next: Mutex::new(response),
                fetches: AtomicUsize::new(0),
            }),
        }
    }

    /// Serve `document` from now on.
    pub fn set_document(&self, document: Value) {
        *self.lock() = Ok(document);
    }

    /// Fail with `error` from now on.
    pub fn set_failure(&self, error: FetchError) {
        *self.lock() = Err(error);
    }

    /// Number of fetches attempted so far.
    pub fn fetch_count(&self) -> usize {
        self.inner.fetches.load(Ordering::Acquire)
    }

    fn fetch(&self) -> Result<Value, FetchError> {
        self.inner.fetches.fetch_add(1, Ordering::AcqRel);
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Result<Value, FetchError>> {
        self.inner.next.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for StubSource {
    fn default() -> Self {
        Self::new()
    }
}
