//! GET /api/models - The static model catalog.

use axum::Json;

use parley_core::models::{ModelCatalog, catalog};

pub async fn list_models() -> Json<ModelCatalog> {
    Json(catalog())
}
