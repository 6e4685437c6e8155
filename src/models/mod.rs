// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod form;
pub mod result;
pub mod view;

pub use form::{FormError, FormSubmission, ResultForm};
pub use result::{has_control_chars, NewResult, ResultRecord, NO_CLASS_LABEL};
pub use view::{ClassGroup, ResultsView, SortMode, ViewQuery, ALL_CLASSES_LABEL};
