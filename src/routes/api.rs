// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON API over the coordinator.
//!
//! Mutations are queued and answered with `202 Accepted`; the new state is
//! visible through `GET /api/results` once persisted.

use crate::error::{AppError, Result};
use crate::models::{has_control_chars, NewResult, ResultsView, SortMode, ViewQuery};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::{Validate, ValidationError};

/// API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/results", get(get_results).post(create_result))
        .route("/api/results/{id}", put(update_result).delete(delete_result))
        .route("/api/classes", get(get_classes))
}

// ─── Views ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct ResultsQuery {
    /// Sort mode key: name, sprint or jump
    sort: Option<String>,
    /// Class to show; omitted or blank for all classes
    class: Option<String>,
}

fn parse_view_query(params: &ResultsQuery) -> Result<ViewQuery> {
    let sort = params
        .sort
        .as_deref()
        .map(str::parse::<SortMode>)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?
        .unwrap_or_default();
    Ok(ViewQuery::new(sort, params.class.as_deref()))
}

/// Get the grouped and sorted result list.
async fn get_results(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResultsQuery>,
) -> Result<Json<ResultsView>> {
    let query = parse_view_query(&params)?;
    tracing::debug!(sort = %query.sort, class = ?query.class_filter, "Fetching results view");
    Ok(Json(state.coordinator.view(&query)))
}

#[derive(Serialize)]
pub struct ClassesResponse {
    pub classes: Vec<String>,
}

/// Get the distinct class names.
async fn get_classes(State(state): State<Arc<AppState>>) -> Json<ClassesResponse> {
    Json(ClassesResponse {
        classes: state.coordinator.known_classes(),
    })
}

// ─── Mutations ───────────────────────────────────────────────

fn validate_not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Text fields end up on one export line each, so no line breaks.
fn validate_single_line(payload: &ResultPayload) -> std::result::Result<(), ValidationError> {
    let class_name = payload.class_name.as_deref().unwrap_or("");
    if has_control_chars(payload.name.trim()) || has_control_chars(class_name.trim()) {
        return Err(ValidationError::new("control_characters"));
    }
    Ok(())
}

/// Result fields as sent by API clients.
///
/// `serde_json` only produces finite numbers, so no range check is needed.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_single_line"))]
pub struct ResultPayload {
    #[validate(length(max = 100))]
    pub class_name: Option<String>,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    pub jump_meters: Option<f64>,
    pub sprint_seconds: Option<f64>,
}

impl ResultPayload {
    fn into_fields(self) -> NewResult {
        NewResult {
            class_name: self
                .class_name
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            name: self.name.trim().to_string(),
            jump_meters: self.jump_meters,
            sprint_seconds: self.sprint_seconds,
        }
    }
}

#[derive(Serialize)]
pub struct AcceptedResponse {
    pub accepted: bool,
}

fn accepted() -> (StatusCode, Json<AcceptedResponse>) {
    (StatusCode::ACCEPTED, Json(AcceptedResponse { accepted: true }))
}

/// Queue a new result.
async fn create_result(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResultPayload>,
) -> Result<(StatusCode, Json<AcceptedResponse>)> {
    payload.validate()?;
    state.coordinator.add_or_update(None, payload.into_fields());
    Ok(accepted())
}

/// Queue a wholesale replacement of result `id`.
///
/// Unknown IDs are ignored by the store.
async fn update_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<ResultPayload>,
) -> Result<(StatusCode, Json<AcceptedResponse>)> {
    payload.validate()?;
    state.coordinator.add_or_update(Some(id), payload.into_fields());
    Ok(accepted())
}

/// Queue deletion of result `id`.
async fn delete_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<AcceptedResponse>) {
    state.coordinator.delete(id);
    accepted()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, class_name: Option<&str>) -> ResultPayload {
        ResultPayload {
            class_name: class_name.map(String::from),
            name: name.to_string(),
            jump_meters: Some(4.0),
            sprint_seconds: None,
        }
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(payload("   ", None).validate().is_err());
        assert!(payload("", None).validate().is_err());
        assert!(payload("Max", None).validate().is_ok());
    }

    #[test]
    fn test_line_breaks_rejected() {
        assert!(payload("Max\nEvil;x;1;2", None).validate().is_err());
        assert!(payload("Max", Some("10a\r9b")).validate().is_err());
        assert!(payload(" Max\n", Some("10a ")).validate().is_ok());
    }

    #[test]
    fn test_overlong_class_rejected() {
        let long_class = "a".repeat(101);
        assert!(payload("Max", Some(&long_class)).validate().is_err());
    }

    #[test]
    fn test_payload_fields_trimmed() {
        let fields = payload("  Max ", Some("  ")).into_fields();
        assert_eq!(fields.name, "Max");
        assert_eq!(fields.class_name, None);
    }

    #[test]
    fn test_unknown_sort_is_bad_request() {
        let params = ResultsQuery {
            sort: Some("fastest".to_string()),
            class: None,
        };
        assert!(matches!(parse_view_query(&params), Err(AppError::BadRequest(_))));
    }
}
