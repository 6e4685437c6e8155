// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Same-origin guard for the loopback server.
//!
//! Requests must name this server in `Host`, and state-changing requests
//! must not come from another site. Requests without these headers come
//! from non-browser clients and pass.

use crate::config::Config;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// `host:port` values this server answers to.
///
/// Empty when bound to an unspecified address, which disables the check.
fn allowed_hosts(config: &Config) -> Vec<String> {
    if config.bind_addr.is_unspecified() {
        return Vec::new();
    }

    let mut hosts = vec![config.listen_addr()];
    if config.bind_addr.is_loopback() {
        hosts.push(format!("localhost:{}", config.port));
    }
    hosts
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn host_allowed(headers: &HeaderMap, allowed: &[String]) -> bool {
    match header_str(headers, header::HOST.as_str()) {
        None => true,
        Some(_) if allowed.is_empty() => true,
        Some(host) => allowed.iter().any(|a| a.eq_ignore_ascii_case(host)),
    }
}

fn same_origin(headers: &HeaderMap, allowed: &[String]) -> bool {
    if let Some(site) = header_str(headers, "sec-fetch-site") {
        if !matches!(site, "same-origin" | "none") {
            return false;
        }
    }

    match header_str(headers, header::ORIGIN.as_str()) {
        None => true,
        Some(origin) => {
            let Some(authority) = origin.strip_prefix("http://") else {
                return false;
            };
            if allowed.is_empty() {
                // Unspecified bind address: compare against the Host actually used.
                return header_str(headers, header::HOST.as_str())
                    .is_some_and(|host| host.eq_ignore_ascii_case(authority));
            }
            allowed.iter().any(|a| a.eq_ignore_ascii_case(authority))
        }
    }
}

/// Reject foreign `Host` headers and cross-site state-changing requests.
pub async fn require_same_origin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let allowed = allowed_hosts(&state.config);
    let headers = request.headers();

    if !host_allowed(headers, &allowed) {
        tracing::warn!(host = ?headers.get(header::HOST), "Blocked request for foreign host");
        return Err(StatusCode::FORBIDDEN);
    }

    if !request.method().is_safe() && !same_origin(headers, &allowed) {
        tracing::warn!(
            method = %request.method(),
            uri = %request.uri(),
            origin = ?headers.get(header::ORIGIN),
            "Blocked cross-site request"
        );
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}
