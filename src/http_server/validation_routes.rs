//! Validation HTTP Routes
//!
//! One schema, three transports:
//!
//! - `POST /validate/:id/:version` JSON body
//! - `POST /validate/:id/:version/form` urlencoded body
//! - `GET /validate/:id/:version/query` query string
//!
//! Form and query payloads are plain strings; schemas meant for them
//! enable coercion on non-string fields. The schema is resolved before the
//! payload is decoded, so an unknown schema is always a 404.

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::boundary::{record_from_pairs, Boundary, BoundaryError, BoundaryResult};
use crate::observability::{Event, Logger};
use crate::schema::Schema;

/// Accepted payload response
#[derive(Debug, Serialize)]
pub struct ValidatedResponse {
    pub schema_id: String,
    pub schema_version: String,
    pub value: Value,
}

pub fn validation_routes() -> Router<Boundary> {
    Router::new()
        .route("/:schema_id/:schema_version", post(validate_json))
        .route("/:schema_id/:schema_version/form", post(validate_form))
        .route("/:schema_id/:schema_version/query", get(validate_query))
}

async fn validate_json(
    State(boundary): State<Boundary>,
    Path((schema_id, schema_version)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> BoundaryResult<Json<ValidatedResponse>> {
    let schema = boundary.schema(&schema_id, &schema_version)?;
    let Json(payload) = body.map_err(|r| malformed(&schema, r.body_text()))?;

    respond(&boundary, &schema, payload).await
}

async fn validate_form(
    State(boundary): State<Boundary>,
    Path((schema_id, schema_version)): Path<(String, String)>,
    body: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> BoundaryResult<Json<ValidatedResponse>> {
    let schema = boundary.schema(&schema_id, &schema_version)?;
    let Form(pairs) = body.map_err(|r| malformed(&schema, r.body_text()))?;

    respond(&boundary, &schema, record_from_pairs(&schema, pairs)).await
}

async fn validate_query(
    State(boundary): State<Boundary>,
    Path((schema_id, schema_version)): Path<(String, String)>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> BoundaryResult<Json<ValidatedResponse>> {
    let schema = boundary.schema(&schema_id, &schema_version)?;
    let Query(pairs) = query.map_err(|r| malformed(&schema, r.body_text()))?;

    respond(&boundary, &schema, record_from_pairs(&schema, pairs)).await
}

fn malformed(schema: &Schema, reason: String) -> BoundaryError {
    Logger::info(
        Event::MalformedPayload.as_str(),
        &[
            ("schema_id", schema.schema_id.as_str()),
            ("reason", reason.as_str()),
        ],
    );
    BoundaryError::malformed(reason)
}

async fn respond(
    boundary: &Boundary,
    schema: &Schema,
    payload: Value,
) -> BoundaryResult<Json<ValidatedResponse>> {
    let record = boundary.validate_with(schema, &payload).await?;

    Ok(Json(ValidatedResponse {
        schema_id: schema.schema_id.clone(),
        schema_version: schema.schema_version.clone(),
        value: record.to_json(),
    }))
}
