// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Athletic test result model for storage and API.

use serde::{Deserialize, Serialize};

/// Label of the group holding results without a class.
pub const NO_CLASS_LABEL: &str = "(keine Klasse)";

/// Whether `text` holds control characters such as line breaks, which
/// would split a record across export lines.
pub fn has_control_chars(text: &str) -> bool {
    text.chars().any(char::is_control)
}

/// Stored result record in the `results` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    /// Row ID, assigned by the store on insert
    pub id: i64,
    /// School class (e.g. "10a"), blank or missing means no class
    #[sqlx(rename = "className")]
    pub class_name: Option<String>,
    /// Athlete name
    pub name: String,
    /// Long jump distance in meters
    #[sqlx(rename = "jumpMeters")]
    pub jump_meters: Option<f64>,
    /// Sprint time in seconds
    #[sqlx(rename = "sprintSeconds")]
    pub sprint_seconds: Option<f64>,
}

impl ResultRecord {
    /// Build a record with the given ID from a field set.
    pub fn from_new(id: i64, fields: NewResult) -> Self {
        Self {
            id,
            class_name: fields.class_name,
            name: fields.name,
            jump_meters: fields.jump_meters,
            sprint_seconds: fields.sprint_seconds,
        }
    }

    /// Trimmed class name, or `None` when missing or blank.
    pub fn class_key(&self) -> Option<&str> {
        self.class_name
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Name of the display group this record belongs to.
    pub fn group_label(&self) -> &str {
        self.class_key().unwrap_or(NO_CLASS_LABEL)
    }
}

/// Field set for inserting a result or replacing an existing one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResult {
    pub class_name: Option<String>,
    pub name: String,
    pub jump_meters: Option<f64>,
    pub sprint_seconds: Option<f64>,
}

impl NewResult {
    pub fn new(
        class_name: Option<String>,
        name: impl Into<String>,
        jump_meters: Option<f64>,
        sprint_seconds: Option<f64>,
    ) -> Self {
        Self {
            class_name,
            name: name.into(),
            jump_meters,
            sprint_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(class_name: Option<&str>) -> ResultRecord {
        ResultRecord::from_new(
            1,
            NewResult::new(class_name.map(String::from), "Max", Some(4.5), None),
        )
    }

    #[test]
    fn test_control_chars_detected() {
        assert!(has_control_chars("Max\nEvil"));
        assert!(has_control_chars("10a\r"));
        assert!(has_control_chars("a\tb"));
        assert!(!has_control_chars("Jörg Müller-Lüdenscheidt"));
    }

    #[test]
    fn test_class_key_trims() {
        assert_eq!(record(Some("  10a ")).class_key(), Some("10a"));
    }

    #[test]
    fn test_blank_class_uses_sentinel_group() {
        assert_eq!(record(None).group_label(), NO_CLASS_LABEL);
        assert_eq!(record(Some("   ")).group_label(), NO_CLASS_LABEL);
        assert_eq!(record(Some("9b")).group_label(), "9b");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(record(Some("10a"))).unwrap();
        assert_eq!(json["className"], "10a");
        assert_eq!(json["jumpMeters"], 4.5);
        assert!(json["sprintSeconds"].is_null());
    }
}
