//! Error types for the catalog store.
//!
//! [`FetchError`] covers everything that can go wrong while pulling the
//! remote document. It is logged by the loader and never reaches HTTP
//! clients. [`QueryError`] is what read operations return; the server crate
//! maps each variant to a status code.

/// Errors raised while fetching or decoding the remote document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read
    /// (connection refused, DNS failure, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The remote host answered with a non-success status code.
    #[error("remote returned HTTP {0}")]
    Status(u16),

    /// The body was not valid JSON.
    #[error("malformed JSON: {0}")]
    Decode(String),

    /// The body was JSON but not shaped like a catalog document.
    #[error("unexpected document shape: {0}")]
    Shape(String),

    /// The HTTP client could not be constructed.
    #[error("client setup failed: {0}")]
    Client(String),
}

/// Errors returned by read operations against the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// No snapshot has been loaded successfully yet.
    #[error("catalog data is still loading, try again in a few seconds")]
    NotReady,

    /// No record carries the requested identifier.
    #[error("product {0} not found")]
    NotFound(i64),

    /// A required parameter was missing or empty.
    #[error("{0}")]
    BadRequest(String),
}
