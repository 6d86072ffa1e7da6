//! Read-only queries against the current snapshot.
//!
//! Every operation grabs the current [`Snapshot`](crate::Snapshot) once and
//! scans it linearly. The dataset is a single in-memory document, so there
//! are no indexes. Nothing here can trigger a reload.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::QueryError;
use crate::mapping::FieldMapping;
use crate::snapshot::{Record, Snapshot};
use crate::store::{SnapshotStatus, SnapshotStore};

/// Query service over a shared [`SnapshotStore`].
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    store: Arc<SnapshotStore>,
    mapping: FieldMapping,
}

impl CatalogQuery {
    /// Create a query service reading `store` through `mapping`.
    pub const fn new(store: Arc<SnapshotStore>, mapping: FieldMapping) -> Self {
        Self { store, mapping }
    }

    /// All records in document order.
    pub fn list_all(&self) -> Result<Vec<Record>, QueryError> {
        Ok(self.snapshot()?.records.clone())
    }

    /// The record whose identifier equals `id`.
    pub fn get_by_id(&self, id: i64) -> Result<Record, QueryError> {
        self.snapshot()?
            .records
            .iter()
            .find(|r| self.mapping.id_matches(r, id))
            .cloned()
            .ok_or(QueryError::NotFound(id))
    }

    /// Records whose category contains `category`, ignoring case.
    ///
    /// Records without a string category never match. No match is an empty
    /// result, not an error.
    pub fn filter_by_category(&self, category: &str) -> Result<Vec<Record>, QueryError> {
        let snapshot = self.snapshot()?;
        let needle = category.to_lowercase();

        Ok(snapshot
            .records
            .iter()
            .filter(|r| contains_folded(self.mapping.category_of(r), &needle))
            .cloned()
            .collect())
    }

    /// Records whose name or category contains `query`, ignoring case.
    ///
    /// Readiness is checked before the query, so an empty query against an
    /// unloaded store reports [`QueryError::NotReady`].
    pub fn search(&self, query: Option<&str>) -> Result<Vec<Record>, QueryError> {
        let snapshot = self.snapshot()?;
        let needle = match query {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => {
                return Err(QueryError::BadRequest(String::from(
                    "query parameter `q` is required",
                )));
            }
        };

        Ok(snapshot
            .records
            .iter()
            .filter(|r| {
                contains_folded(self.mapping.name_of(r), &needle)
                    || contains_folded(self.mapping.category_of(r), &needle)
            })
            .cloned()
            .collect())
    }

    /// Distinct category values, in order of first appearance.
    pub fn list_categories(&self) -> Result<Vec<String>, QueryError> {
        let snapshot = self.snapshot()?;
        let mut seen = HashSet::new();

        Ok(snapshot
            .records
            .iter()
            .filter_map(|r| self.mapping.category_of(r))
            .filter(|c| seen.insert(*c))
            .map(ToOwned::to_owned)
            .collect())
    }

    /// Loader state. Never fails.
    pub fn status(&self) -> SnapshotStatus {
        self.store.status()
    }

    fn snapshot(&self) -> Result<Arc<Snapshot>, QueryError> {
        self.store.current().ok_or(QueryError::NotReady)
    }
}

fn contains_folded(haystack: Option<&str>, folded_needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(folded_needle))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::{Value, json};

    use super::*;

    fn query_over(document: Value, mapping: FieldMapping) -> CatalogQuery {
        let store = Arc::new(SnapshotStore::new());
        if let Ok(snapshot) = Snapshot::from_document(document, &mapping, Utc::now()) {
            store.install(snapshot);
        }
        CatalogQuery::new(store, mapping)
    }

    fn furniture() -> CatalogQuery {
        query_over(
            json!({"products": [
                {"id": 1, "name": "Chair", "category": "Furniture"},
                {"id": 2, "name": "Table", "category": "Furniture"},
                {"id": 3, "name": "Desk Lamp", "category": "Lighting"},
                {"id": 4, "name": "Poster"},
                {"id": 5, "name": "Armchair", "category": "furniture"},
            ]}),
            FieldMapping::english(),
        )
    }

    fn ids(records: &[Record]) -> Vec<i64> {
        records
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_i64))
            .collect()
    }

    #[test]
    fn everything_is_not_ready_before_first_load() {
        let query = CatalogQuery::new(Arc::new(SnapshotStore::new()), FieldMapping::english());

        assert_eq!(query.list_all(), Err(QueryError::NotReady));
        assert_eq!(query.get_by_id(1), Err(QueryError::NotReady));
        assert_eq!(query.filter_by_category("x"), Err(QueryError::NotReady));
        assert_eq!(query.search(Some("x")), Err(QueryError::NotReady));
        assert_eq!(query.search(None), Err(QueryError::NotReady));
        assert_eq!(query.list_categories(), Err(QueryError::NotReady));
        assert!(!query.status().ready);
    }

    #[test]
    fn get_by_id_hits_and_misses() {
        let query = furniture();
        assert_eq!(
            query.get_by_id(2),
            Ok(json!({"id": 2, "name": "Table", "category": "Furniture"}))
        );
        assert_eq!(query.get_by_id(42), Err(QueryError::NotFound(42)));
    }

    #[test]
    fn get_by_id_accepts_integral_float_ids() {
        let query = query_over(
            json!({"products": [{"id": 2.0, "name": "Table"}]}),
            FieldMapping::english(),
        );
        assert_eq!(query.get_by_id(2), Ok(json!({"id": 2.0, "name": "Table"})));
        assert_eq!(query.get_by_id(3), Err(QueryError::NotFound(3)));
    }

    #[test]
    fn category_filter_is_case_insensitive_substring() {
        let query = furniture();
        let hits = query.filter_by_category("FURN");
        assert_eq!(hits.as_deref().map(ids), Ok(vec![1, 2, 5]));

        let none = query.filter_by_category("garden");
        assert_eq!(none, Ok(Vec::new()));
    }

    #[test]
    fn search_matches_name_or_category() {
        let query = furniture();
        assert_eq!(query.search(Some("ch")).as_deref().map(ids), Ok(vec![1, 5]));
        assert_eq!(query.search(Some("light")).as_deref().map(ids), Ok(vec![3]));
        assert_eq!(query.search(Some("POSTER")).as_deref().map(ids), Ok(vec![4]));
    }

    #[test]
    fn search_requires_a_query() {
        let query = furniture();
        assert!(matches!(query.search(None), Err(QueryError::BadRequest(_))));
        assert!(matches!(query.search(Some("")), Err(QueryError::BadRequest(_))));
    }

    #[test]
    fn categories_are_distinct_in_first_seen_order() {
        let query = furniture();
        assert_eq!(
            query.list_categories(),
            Ok(vec![
                String::from("Furniture"),
                String::from("Lighting"),
                String::from("furniture"),
            ])
        );
    }

    #[test]
    fn status_counts_records() {
        let status = furniture().status();
        assert!(status.ready);
        assert_eq!(status.record_count, 5);
        assert!(status.loaded_at.is_some());
    }

    #[test]
    fn end_to_end_chair_and_table() {
        let query = query_over(
            json!({"products": [{"id": 1, "name": "Chair"}, {"id": 2, "name": "Table"}]}),
            FieldMapping::english(),
        );

        assert_eq!(query.get_by_id(2), Ok(json!({"id": 2, "name": "Table"})));
        assert_eq!(query.get_by_id(3), Err(QueryError::NotFound(3)));
        assert_eq!(query.search(Some("ch")), Ok(vec![json!({"id": 1, "name": "Chair"})]));
    }

    #[test]
    fn spanish_mapping_drives_every_lookup() {
        let query = query_over(
            json!({"productos": [
                {"IdProducto": 7, "NombreArchivo": "silla.png", "Categoria": "Muebles"},
                {"IdProducto": 8, "NombreArchivo": "lampara.png", "Categoria": "Luces"},
            ]}),
            FieldMapping::spanish(),
        );

        assert!(query.get_by_id(8).is_ok());
        assert_eq!(query.filter_by_category("mueb").map(|r| r.len()), Ok(1));
        assert_eq!(query.search(Some("LAMP")).map(|r| r.len()), Ok(1));
        assert_eq!(
            query.list_categories(),
            Ok(vec![String::from("Muebles"), String::from("Luces")])
        );
    }
}
