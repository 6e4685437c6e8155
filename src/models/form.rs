// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entry form state and parsing.
//!
//! The form carries raw text exactly as typed. Parsing decides whether the
//! submission may be dispatched; a rejected form is shown again unchanged.

use serde::{Deserialize, Serialize};

use crate::models::{has_control_chars, NewResult, ResultRecord};

/// Raw form fields as submitted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultForm {
    /// ID of the record being edited, empty when adding
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub jump: String,
    #[serde(default)]
    pub sprint: String,
}

/// A parsed submission ready for the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSubmission {
    /// `Some` when editing an existing record
    pub id: Option<i64>,
    pub fields: NewResult,
}

/// Reasons a form is refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("Name is required")]
    EmptyName,

    #[error("Invalid number in field '{0}'")]
    InvalidNumber(&'static str),

    #[error("Invalid record ID")]
    InvalidId,

    #[error("Control characters in field '{0}'")]
    ControlCharacter(&'static str),
}

impl ResultForm {
    /// Populate the form from a stored record for editing.
    pub fn from_record(record: &ResultRecord) -> Self {
        Self {
            id: record.id.to_string(),
            class_name: record.class_name.clone().unwrap_or_default(),
            name: record.name.clone(),
            jump: record.jump_meters.map(|v| v.to_string()).unwrap_or_default(),
            sprint: record
                .sprint_seconds
                .map(|v| v.to_string())
                .unwrap_or_default(),
        }
    }

    /// ID of the record being edited, if any.
    pub fn editing_id(&self) -> Option<i64> {
        self.id.trim().parse().ok()
    }

    /// Validate and convert the raw text.
    pub fn parse(&self) -> Result<FormSubmission, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::EmptyName);
        }

        let id = match self.id.trim() {
            "" => None,
            raw => Some(raw.parse::<i64>().map_err(|_| FormError::InvalidId)?),
        };

        if has_control_chars(name) {
            return Err(FormError::ControlCharacter("name"));
        }
        if has_control_chars(self.class_name.trim()) {
            return Err(FormError::ControlCharacter("class_name"));
        }

        let class_name = Some(self.class_name.trim())
            .filter(|c| !c.is_empty())
            .map(String::from);

        Ok(FormSubmission {
            id,
            fields: NewResult {
                class_name,
                name: name.to_string(),
                jump_meters: parse_decimal(&self.jump, "jump")?,
                sprint_seconds: parse_decimal(&self.sprint, "sprint")?,
            },
        })
    }
}

/// Parse an optional decimal, accepting a comma as decimal separator.
fn parse_decimal(raw: &str, field: &'static str) -> Result<Option<f64>, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or(FormError::InvalidNumber(field))
}
