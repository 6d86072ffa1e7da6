//! Shared application state for the API server.
//!
//! [`AppState`] is wrapped in [`Arc`](std::sync::Arc) and injected via
//! Axum's `State` extractor. It only holds the read side of the catalog;
//! the loader keeps its own handle on the same store.

use catalog_store::CatalogQuery;

/// Shared state for the Axum application.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Read-only access to the current snapshot.
    pub query: CatalogQuery,
    /// Label reported as `dataSource` by `/api/status`.
    pub data_source: String,
}

impl AppState {
    /// Create application state around a query service.
    pub fn new(query: CatalogQuery, data_source: impl Into<String>) -> Self {
        Self {
            query,
            data_source: data_source.into(),
        }
    }
}
