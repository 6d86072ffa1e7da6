//! The immutable catalog snapshot.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::FetchError;
use crate::mapping::FieldMapping;

/// One catalog entry. No schema is enforced beyond the mapped fields.
pub type Record = Value;

/// A fully decoded catalog document as of one successful reload.
///
/// Snapshots are never mutated after construction. The loader builds a new
/// one per reload and swaps it into the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Records in document order.
    pub records: Vec<Record>,
    /// When the reload that produced this snapshot completed.
    pub loaded_at: DateTime<Utc>,
}

impl Snapshot {
    /// Decode a fetched document using `mapping`.
    ///
    /// The document must be a JSON object. A missing collection key yields
    /// an empty snapshot; a collection key holding anything but an array is
    /// rejected.
    pub fn from_document(
        document: Value,
        mapping: &FieldMapping,
        loaded_at: DateTime<Utc>,
    ) -> Result<Self, FetchError> {
        let Value::Object(mut root) = document else {
            return Err(FetchError::Shape(String::from(
                "document root is not a JSON object",
            )));
        };

        let records = match root.remove(&mapping.collection) {
            None => Vec::new(),
            Some(Value::Array(records)) => records,
            Some(_) => {
                return Err(FetchError::Shape(format!(
                    "`{}` is not an array",
                    mapping.collection
                )));
            }
        };

        Ok(Self { records, loaded_at })
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
