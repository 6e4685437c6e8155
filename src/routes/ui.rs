// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Browser UI routes: the results page, form submission, delete and export.

use crate::error::Result;
use crate::models::{ResultForm, SortMode, ViewQuery};
use crate::routes::page::{page_url, render_page};
use crate::services::DEFAULT_EXPORT_FILENAME;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// UI routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(show_page))
        .route("/results", post(submit_result))
        .route("/results/{id}/delete", post(delete_result))
        .route("/export.csv", get(export_csv))
}

/// Sort and class selection as sent by the selectors and hidden fields.
#[derive(Debug, Default, Deserialize)]
struct SelectionParams {
    sort: Option<String>,
    class: Option<String>,
}

impl SelectionParams {
    /// Unknown sort keys fall back to the default mode.
    fn view_query(&self) -> ViewQuery {
        let sort = self
            .sort
            .as_deref()
            .and_then(|s| s.parse::<SortMode>().ok())
            .unwrap_or_default();
        ViewQuery::new(sort, self.class.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct PageParams {
    #[serde(flatten)]
    selection: SelectionParams,
    edit: Option<String>,
}

/// Show the page. `?edit=<id>` fills the form with that record.
async fn show_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Html<String> {
    let query = params.selection.view_query();
    let view = state.coordinator.view(&query);

    let edit_id = params.edit.as_deref().and_then(|raw| raw.trim().parse::<i64>().ok());
    let form = edit_id
        .and_then(|id| {
            state
                .coordinator
                .snapshot()
                .records
                .iter()
                .find(|r| r.id == id)
                .map(ResultForm::from_record)
        })
        .unwrap_or_default();

    Html(render_page(&view, &form))
}

/// Entry form fields plus the selection to return to.
#[derive(Debug, Deserialize)]
struct SubmitParams {
    #[serde(default)]
    id: String,
    #[serde(default)]
    class_name: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    jump: String,
    #[serde(default)]
    sprint: String,
    sort: Option<String>,
    class: Option<String>,
}

impl SubmitParams {
    fn split(self) -> (ResultForm, SelectionParams) {
        (
            ResultForm {
                id: self.id,
                class_name: self.class_name,
                name: self.name,
                jump: self.jump,
                sprint: self.sprint,
            },
            SelectionParams {
                sort: self.sort,
                class: self.class,
            },
        )
    }
}

/// Add or update a result from the form.
///
/// A refused form is shown again with the entered values kept.
async fn submit_result(
    State(state): State<Arc<AppState>>,
    Form(params): Form<SubmitParams>,
) -> Response {
    let (form, selection) = params.split();
    let query = selection.view_query();

    match form.parse() {
        Ok(submission) => {
            tracing::debug!(id = ?submission.id, "Form submitted");
            state
                .coordinator
                .add_or_update(submission.id, submission.fields);
            // Let the redirected page show the change.
            state.coordinator.flush().await;
            Redirect::to(&page_url(&query, None)).into_response()
        }
        Err(e) => {
            tracing::debug!(reason = %e, "Form refused");
            let view = state.coordinator.view(&query);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render_page(&view, &form)),
            )
                .into_response()
        }
    }
}

/// Delete a result and return to the page.
async fn delete_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(selection): Form<SelectionParams>,
) -> Redirect {
    state.coordinator.delete(id);
    state.coordinator.flush().await;
    Redirect::to(&page_url(&selection.view_query(), None))
}

/// Download all results as CSV.
async fn export_csv(State(state): State<Arc<AppState>>) -> Result<Response> {
    let mut buffer: Vec<u8> = Vec::new();
    state.coordinator.export_csv(&mut buffer).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DEFAULT_EXPORT_FILENAME),
            ),
        ],
        buffer,
    )
        .into_response())
}
