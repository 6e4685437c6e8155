// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-rendered HTML for the results page.

use crate::models::{
    ResultForm, ResultRecord, ResultsView, SortMode, ViewQuery, ALL_CLASSES_LABEL,
};
use crate::services::DEFAULT_EXPORT_FILENAME;

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:1rem auto;padding:0 1rem}\
label{display:block;margin:.5rem 0}input[type=text]{width:100%}\
.card{border:1px solid #ccc;border-radius:6px;padding:.5rem .75rem;margin:.4rem 0;display:flex;gap:.75rem;align-items:center}\
.card .info{flex:1}.card form{margin:0}";

/// Escape text for use in HTML content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Page URL for a view selection, optionally opening a record for editing.
pub fn page_url(query: &ViewQuery, edit: Option<i64>) -> String {
    let mut params = Vec::new();
    if query.sort != SortMode::default() {
        params.push(format!("sort={}", query.sort.key()));
    }
    if let Some(class) = &query.class_filter {
        params.push(format!("class={}", urlencoding::encode(class)));
    }
    if let Some(id) = edit {
        params.push(format!("edit={}", id));
    }

    if params.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", params.join("&"))
    }
}

/// Hidden inputs carrying the view selection through a POST.
fn selection_fields(query: &ViewQuery) -> String {
    format!(
        r#"<input type="hidden" name="sort" value="{}"><input type="hidden" name="class" value="{}">"#,
        query.sort.key(),
        escape(query.class_filter.as_deref().unwrap_or("")),
    )
}

fn text_input(label: &str, name: &str, value: &str) -> String {
    format!(
        r#"<label>{label}<input type="text" name="{name}" value="{value}"></label>"#,
        label = escape(label),
        name = name,
        value = escape(value),
    )
}

fn format_measure(value: Option<f64>, unit: &str) -> String {
    value
        .map(|v| format!("{} {}", v, unit))
        .unwrap_or_else(|| "–".to_string())
}

fn render_form(form: &ResultForm, query: &ViewQuery) -> String {
    let editing = form.editing_id().is_some();
    let mut html = String::from(r#"<form method="post" action="/results">"#);
    html.push_str(&format!(
        r#"<input type="hidden" name="id" value="{}">"#,
        escape(form.id.trim())
    ));
    html.push_str(&selection_fields(query));
    html.push_str(&text_input("Klasse", "class_name", &form.class_name));
    html.push_str(&text_input("Name", "name", &form.name));
    html.push_str(&text_input("Sprungweite (m) – optional", "jump", &form.jump));
    html.push_str(&text_input("Sprintzeit (s) – optional", "sprint", &form.sprint));
    html.push_str(r#"<button type="submit">Speichern</button>"#);
    if editing {
        html.push_str(&format!(
            r#" <a href="{}">Abbrechen</a>"#,
            escape(&page_url(query, None))
        ));
    }
    html.push_str("</form>");
    html
}

fn render_selectors(view: &ResultsView) -> String {
    let mut html = String::from(r#"<form method="get" action="/"><select name="sort">"#);
    for mode in SortMode::ALL {
        html.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            mode.key(),
            if mode == view.sort { " selected" } else { "" },
            escape(mode.label()),
        ));
    }
    html.push_str(r#"</select> <select name="class">"#);
    html.push_str(&format!(
        r#"<option value=""{}>{}</option>"#,
        if view.class_filter.is_none() { " selected" } else { "" },
        ALL_CLASSES_LABEL,
    ));
    for class in &view.known_classes {
        html.push_str(&format!(
            r#"<option value="{value}"{selected}>{value}</option>"#,
            value = escape(class),
            selected = if view.class_filter.as_ref() == Some(class) { " selected" } else { "" },
        ));
    }
    html.push_str(r#"</select> <button type="submit">Anzeigen</button></form>"#);
    html
}

fn render_card(record: &ResultRecord, query: &ViewQuery) -> String {
    format!(
        r#"<div class="card"><div class="info"><strong>{name}</strong><br>Sprung: {jump} | Sprint: {sprint}</div><a href="{edit}">Bearbeiten</a><form method="post" action="/results/{id}/delete">{selection}<button type="submit">Löschen</button></form></div>"#,
        name = escape(&record.name),
        jump = format_measure(record.jump_meters, "m"),
        sprint = format_measure(record.sprint_seconds, "s"),
        edit = escape(&page_url(query, Some(record.id))),
        id = record.id,
        selection = selection_fields(query),
    )
}

/// Render the complete page: entry form, selectors and grouped list.
pub fn render_page(view: &ResultsView, form: &ResultForm) -> String {
    let query = ViewQuery {
        sort: view.sort,
        class_filter: view.class_filter.clone(),
    };

    let mut html = String::from("<!DOCTYPE html><html lang=\"de\"><head><meta charset=\"utf-8\">");
    html.push_str(r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#);
    html.push_str(&format!("<title>Athletik</title><style>{}</style></head><body>", STYLE));
    html.push_str(&format!(
        r#"<h1>Athletik</h1><p><a href="/export.csv" download="{file}">Export ({file})</a></p>"#,
        file = DEFAULT_EXPORT_FILENAME,
    ));
    html.push_str(&render_form(form, &query));
    html.push_str(&render_selectors(view));

    for group in &view.groups {
        html.push_str(&format!("<h2>{}</h2>", escape(&group.label)));
        for record in &group.results {
            html.push_str(&render_card(record, &query));
        }
    }

    html.push_str("</body></html>");
    html
}
