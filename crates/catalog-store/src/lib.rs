//! In-memory catalog snapshot, loader, and query service.
//!
//! This crate owns everything behind the HTTP surface of the catalog
//! mirror:
//!
//! - **[`SnapshotStore`]** -- the single shared slot holding the last
//!   successfully loaded [`Snapshot`]
//! - **[`SnapshotLoader`]** -- fetches the remote document through a
//!   [`DocumentSource`] and swaps it into the store
//! - **[`spawn_refresh`]** -- background task that reloads on a fixed
//!   interval until its cancellation token fires
//! - **[`CatalogQuery`]** -- read-only lookups (list, by id, by category,
//!   search, distinct categories, status)
//!
//! # Architecture
//!
//! ```text
//! DocumentSource --> SnapshotLoader --> SnapshotStore <-- CatalogQuery
//! ```
//!
//! The loader is the only writer. It replaces the snapshot wholesale, so a
//! query either sees the previous document in full or the new one in full.
//! A failed reload leaves the store untouched.

pub mod error;
pub mod loader;
pub mod mapping;
pub mod query;
pub mod refresh;
pub mod snapshot;
pub mod source;
pub mod store;

pub use error::{FetchError, QueryError};
pub use loader::SnapshotLoader;
pub use mapping::{FieldMapping, UnknownSchema};
pub use query::CatalogQuery;
pub use refresh::{DEFAULT_REFRESH_INTERVAL, spawn_refresh};
pub use snapshot::{Record, Snapshot};
pub use source::{DEFAULT_SOURCE_URL, DocumentSource, HttpSource, StubSource};
pub use store::{SnapshotStatus, SnapshotStore};
