// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules.

pub mod origin;
pub mod security;

pub use origin::require_same_origin;
pub use security::add_security_headers;
