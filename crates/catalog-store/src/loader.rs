//! One fetch-and-replace cycle.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use crate::error::FetchError;
use crate::mapping::FieldMapping;
use crate::snapshot::Snapshot;
use crate::source::DocumentSource;
use crate::store::SnapshotStore;

/// Pulls the remote document and installs it into a [`SnapshotStore`].
///
/// The loader is the store's only writer. It never merges: a successful
/// reload replaces the whole snapshot, a failed one leaves it alone.
#[derive(Debug)]
pub struct SnapshotLoader {
    source: DocumentSource,
    mapping: FieldMapping,
    store: Arc<SnapshotStore>,
}

impl SnapshotLoader {
    /// Create a loader writing into `store`.
    pub fn new(
        source: impl Into<DocumentSource>,
        mapping: FieldMapping,
        store: Arc<SnapshotStore>,
    ) -> Self {
        Self {
            source: source.into(),
            mapping,
            store,
        }
    }

    /// The store this loader writes into.
    pub const fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Fetch, decode, and install a fresh snapshot.
    ///
    /// Returns the number of records loaded. On failure the previous
    /// snapshot (if any) keeps serving and the error is logged here; the
    /// caller only needs the result for its own bookkeeping.
    ///
    /// # Errors
    ///
    /// Any [`FetchError`] from the source or from decoding the document.
    pub async fn reload(&self) -> Result<usize, FetchError> {
        info!(source = self.source.describe(), "loading catalog document");

        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                let count = snapshot.len();
                self.store.install(snapshot);
                info!(records = count, "catalog snapshot installed");
                Ok(count)
            }
            Err(e) => {
                error!(
                    source = self.source.describe(),
                    error = %e,
                    "catalog reload failed"
                );
                Err(e)
            }
        }
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot, FetchError> {
        let document = self.source.fetch().await?;
        Snapshot::from_document(document, &self.mapping, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::source::StubSource;

    fn loader_with(stub: &StubSource) -> SnapshotLoader {
        SnapshotLoader::new(
            stub.clone(),
            FieldMapping::english(),
            Arc::new(SnapshotStore::new()),
        )
    }

    #[tokio::test]
    async fn successful_reload_installs_snapshot() {
        let stub = StubSource::with_document(json!({
            "products": [{"id": 1}, {"id": 2}, {"id": 3}],
        }));
        let loader = loader_with(&stub);

        assert_eq!(loader.reload().await, Ok(3));
        assert_eq!(loader.store().status().record_count, 3);
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_snapshot() {
        let stub = StubSource::with_document(json!({"products": [{"id": 1}]}));
        let loader = loader_with(&stub);
        assert_eq!(loader.reload().await, Ok(1));
        let before = loader.store().current();

        stub.set_failure(FetchError::Request(String::from("connection refused")));
        assert!(loader.reload().await.is_err());

        assert_eq!(loader.store().current(), before);
    }

    #[tokio::test]
    async fn malformed_document_is_not_installed() {
        let stub = StubSource::with_document(json!({"products": "nope"}));
        let loader = loader_with(&stub);

        assert!(matches!(loader.reload().await, Err(FetchError::Shape(_))));
        assert!(!loader.store().is_ready());
    }

    #[tokio::test]
    async fn failure_before_first_load_stays_not_ready() {
        let stub = StubSource::new();
        let loader = loader_with(&stub);

        assert!(loader.reload().await.is_err());
        assert!(!loader.store().is_ready());
    }
}
