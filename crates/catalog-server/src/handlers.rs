//! REST endpoint handlers.
//!
//! All handlers read from the current snapshot via [`AppState`]. None of
//! them can trigger a reload.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Endpoint directory |
//! | `GET` | `/health` | Liveness probe |
//! | `GET` | `/api/status` | Loader state |
//! | `GET` | `/api/products`, `/api/productos` | All products |
//! | `GET` | `/api/products/{id}`, `/api/productos/{id}` | One product by numeric id |
//! | `GET` | `/api/productos/categoria/{categoria}` | Products by category substring |
//! | `GET` | `/api/search?q=`, `/api/buscar?q=` | Products whose name or category matches |
//! | `GET` | `/api/categorias` | Distinct categories |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use catalog_store::Record;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response and query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/search` and `GET /api/buscar`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Substring to look for in product names and categories.
    pub q: Option<String>,
}

/// One entry of the endpoint directory.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    /// HTTP method.
    pub method: &'static str,
    /// Route template.
    pub path: &'static str,
    /// What the endpoint returns.
    pub description: &'static str,
}

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct Directory {
    /// Service name.
    pub name: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Available endpoints.
    pub endpoints: Vec<EndpointInfo>,
}

/// Body of `GET /api/status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    /// `active` once a snapshot is loaded, `loading` before.
    pub status: &'static str,
    /// Whether a snapshot is loaded.
    pub ready: bool,
    /// When the current snapshot was loaded.
    pub last_update: Option<DateTime<Utc>>,
    /// Number of products in the current snapshot.
    pub total_products: usize,
    /// Where the catalog comes from.
    pub data_source: String,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthBody {
    /// Always `OK`.
    pub status: &'static str,
    /// Current server time, RFC 3339 with milliseconds.
    pub timestamp: String,
}

const ENDPOINTS: [(&str, &str); 11] = [
    ("/", "This endpoint directory"),
    ("/health", "Liveness probe"),
    ("/api/status", "Loader state and product count"),
    ("/api/products", "All products"),
    ("/api/productos", "All products"),
    ("/api/products/{id}", "One product by numeric id"),
    ("/api/productos/{id}", "One product by numeric id"),
    (
        "/api/productos/categoria/{categoria}",
        "Products whose category contains the given text",
    ),
    ("/api/search?q=", "Products whose name or category contains q"),
    ("/api/buscar?q=", "Products whose name or category contains q"),
    ("/api/categorias", "Distinct product categories"),
];

// ---------------------------------------------------------------------------
// GET / and GET /health
// ---------------------------------------------------------------------------

/// List the available endpoints.
pub async fn index() -> Json<Directory> {
    Json(Directory {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS
            .iter()
            .map(|&(path, description)| EndpointInfo {
                method: "GET",
                path,
                description,
            })
            .collect(),
    })
}

/// Liveness probe. Answers even before the first snapshot loads.
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "OK",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Report whether the catalog is loaded, when, and how big it is.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusBody> {
    let status = state.query.status();

    Json(StatusBody {
        status: if status.ready { "active" } else { "loading" },
        ready: status.ready,
        last_update: status.loaded_at,
        total_products: status.record_count,
        data_source: state.data_source.clone(),
    })
}

// ---------------------------------------------------------------------------
// Product endpoints
// ---------------------------------------------------------------------------

/// Return every product.
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    Ok(Json(state.query.list_all()?))
}

/// Return the product with the given numeric id.
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let id = raw_id
        .trim()
        .parse::<i64>()
        .map_err(|e| ApiError::InvalidId(format!("{raw_id}: {e}")))?;

    Ok(Json(state.query.get_by_id(id)?))
}

/// Return products whose category contains the path segment.
pub async fn products_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Record>>, ApiError> {
    Ok(Json(state.query.filter_by_category(&category)?))
}

/// Return products whose name or category contains `q`.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Record>>, ApiError> {
    Ok(Json(state.query.search(params.q.as_deref())?))
}

/// Return the distinct product categories.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.query.list_categories()?))
}
