//! Schema HTTP Routes
//!
//! Read-only view of the registry.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::boundary::{Boundary, BoundaryResult};
use crate::schema::Schema;

/// One entry of `GET /schemas`
#[derive(Debug, Serialize)]
pub struct SchemaSummary {
    pub schema_id: String,
    pub schema_version: String,
    pub description: Option<String>,
    pub fields: Vec<String>,
    pub is_async: bool,
}

impl From<&Schema> for SchemaSummary {
    fn from(schema: &Schema) -> Self {
        Self {
            schema_id: schema.schema_id.clone(),
            schema_version: schema.schema_version.clone(),
            description: schema.description.clone(),
            fields: schema.fields.iter().map(|f| f.name.clone()).collect(),
            is_async: schema.is_async(),
        }
    }
}

pub fn schema_routes() -> Router<Boundary> {
    Router::new()
        .route("/", get(list_schemas))
        .route("/:schema_id/:schema_version", get(get_schema))
}

async fn list_schemas(State(boundary): State<Boundary>) -> Json<Vec<SchemaSummary>> {
    let summaries = boundary
        .registry()
        .list()
        .iter()
        .map(|schema| SchemaSummary::from(schema.as_ref()))
        .collect();
    Json(summaries)
}

async fn get_schema(
    State(boundary): State<Boundary>,
    Path((schema_id, schema_version)): Path<(String, String)>,
) -> BoundaryResult<Json<Schema>> {
    let schema = boundary.schema(&schema_id, &schema_version)?;
    Ok(Json(Schema::clone(&schema)))
}
