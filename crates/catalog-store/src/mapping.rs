//! Field mapping between a catalog document variant and the query service.
//!
//! The same service has been fed two document layouts over time: an
//! English one (`products` / `id` / `name` / `category`) and a Spanish one
//! (`productos` / `IdProducto` / `NombreArchivo` / `Categoria`). The route
//! aliases are shared by both, so every lookup goes through a
//! [`FieldMapping`] that names the fields to read.

use std::str::FromStr;

use serde_json::Value;

/// Names of the fields the service interprets in a catalog document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Top-level key whose value is the array of records.
    pub collection: String,
    /// Numeric identifier field of a record.
    pub id: String,
    /// Display name field of a record.
    pub name: String,
    /// Category field of a record.
    pub category: String,
}

impl FieldMapping {
    /// The canonical English layout.
    pub fn english() -> Self {
        Self {
            collection: String::from("products"),
            id: String::from("id"),
            name: String::from("name"),
            category: String::from("category"),
        }
    }

    /// The Spanish layout used by the older deployment.
    pub fn spanish() -> Self {
        Self {
            collection: String::from("productos"),
            id: String::from("IdProducto"),
            name: String::from("NombreArchivo"),
            category: String::from("Categoria"),
        }
    }

    /// Whether the record's identifier is numerically equal to `id`.
    ///
    /// Integral floats count (`2.0` is the id `2`); strings never do, so
    /// `"2"` is not the id `2`.
    #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
    pub fn id_matches(&self, record: &Value, id: i64) -> bool {
        let Some(Value::Number(number)) = record.get(&self.id) else {
            return false;
        };

        if let Some(n) = number.as_i64() {
            return n == id;
        }
        if !number.is_f64() {
            // u64 beyond i64::MAX
            return false;
        }

        number
            .as_f64()
            .is_some_and(|f| f.fract() == 0.0 && f == id as f64)
    }

    /// The record's name, if it has a string one.
    pub fn name_of<'a>(&self, record: &'a Value) -> Option<&'a str> {
        record.get(&self.name).and_then(Value::as_str)
    }

    /// The record's category, if it has a string one.
    pub fn category_of<'a>(&self, record: &'a Value) -> Option<&'a str> {
        record.get(&self.category).and_then(Value::as_str)
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::english()
    }
}

/// Returned when a schema preset name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown catalog schema `{0}` (expected `english` or `spanish`)")]
pub struct UnknownSchema(pub String);

impl FromStr for FieldMapping {
    type Err = UnknownSchema;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" | "products" => Ok(Self::english()),
            "spanish" | "es" | "productos" => Ok(Self::spanish()),
            other => Err(UnknownSchema(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_names_parse() {
        assert_eq!("english".parse::<FieldMapping>(), Ok(FieldMapping::english()));
        assert_eq!(" ES ".parse::<FieldMapping>(), Ok(FieldMapping::spanish()));
        assert_eq!("productos".parse::<FieldMapping>(), Ok(FieldMapping::spanish()));
        assert!("klingon".parse::<FieldMapping>().is_err());
    }

    #[test]
    fn id_match_is_numeric_only() {
        let mapping = FieldMapping::english();
        assert!(mapping.id_matches(&serde_json::json!({"id": 2}), 2));
        assert!(!mapping.id_matches(&serde_json::json!({"id": "2"}), 2));
        assert!(!mapping.id_matches(&serde_json::json!({"name": "x"}), 2));
        assert!(!mapping.id_matches(&serde_json::json!(7), 7));
    }

    #[test]
    fn integral_float_id_matches() {
        let mapping = FieldMapping::english();
        assert!(mapping.id_matches(&serde_json::json!({"id": 2.0}), 2));
        assert!(mapping.id_matches(&serde_json::json!({"id": -4.0}), -4));
        assert!(!mapping.id_matches(&serde_json::json!({"id": 2.5}), 2));
        assert!(!mapping.id_matches(&serde_json::json!({"id": 3.0}), 2));
        assert!(!mapping.id_matches(&serde_json::json!({"id": u64::MAX}), -1));
    }

    #[test]
    fn spanish_fields_are_read() {
        let mapping = FieldMapping::spanish();
        let record = serde_json::json!({
            "IdProducto": 10,
            "NombreArchivo": "silla.png",
            "Categoria": "Muebles",
        });
        assert!(mapping.id_matches(&record, 10));
        assert_eq!(mapping.name_of(&record), Some("silla.png"));
        assert_eq!(mapping.category_of(&record), Some("Muebles"));
    }
}
