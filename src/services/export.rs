// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Semicolon-separated export of all results.
//!
//! Format: a fixed header line, then one line per record (oldest first).
//! Fields are not quoted; a `;` inside a value is replaced with `,`.

use crate::error::{AppError, Result};
use crate::models::ResultRecord;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Header line of every export.
pub const CSV_HEADER: &str = "klasse;name;sprung_m;sprint_s";

/// Suggested file name for downloads.
pub const DEFAULT_EXPORT_FILENAME: &str = "athletik.csv";

/// Keep a field on one line without the separator.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            ';' => ',',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect()
}

fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Render one record as a line (without line terminator).
pub fn csv_row(record: &ResultRecord) -> String {
    format!(
        "{};{};{};{}",
        sanitize(record.class_name.as_deref().unwrap_or("")),
        sanitize(&record.name),
        format_number(record.jump_meters),
        format_number(record.sprint_seconds),
    )
}

/// Render the full export text, header included.
pub fn render_csv<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a ResultRecord>,
{
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for record in records {
        out.push_str(&csv_row(record));
        out.push('\n');
    }
    out
}

/// Write the export to `sink` as UTF-8 and flush it. Returns bytes written.
pub async fn write_csv<W>(records: &[ResultRecord], sink: &mut W) -> Result<usize>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let text = render_csv(records);
    sink.write_all(text.as_bytes())
        .await
        .map_err(|e| AppError::Export(e.to_string()))?;
    sink.flush()
        .await
        .map_err(|e| AppError::Export(e.to_string()))?;
    Ok(text.len())
}
