// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! Security headers middleware.

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Policy for JSON endpoints.
const API_CSP: &str = "default-src 'none'; frame-ancestors 'none'";

/// Policy for the interactive documentation pages, which load their UI bundle
/// from a CDN and inline the OpenAPI document.
const DOCS_CSP: &str = "default-src 'self'; \
     script-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net; \
     style-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net https://fonts.googleapis.com; \
     font-src 'self' data: https://fonts.gstatic.com; img-src 'self' data: https:; \
     connect-src 'self'; worker-src 'self' blob:; frame-ancestors 'none'";

fn is_docs_path(path: &str) -> bool {
    path == "/docs" || path.starts_with("/docs/") || path == "/redoc" || path.starts_with("/redoc/")
}

/// Add security headers to all responses.
pub async fn add_security_headers(req: Request, next: Next) -> Response {
    let docs = is_docs_path(req.uri().path());
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(if docs { DOCS_CSP } else { API_CSP }),
    );
    headers.insert(header::REFERRER_POLICY, HeaderValue::from_static("no-referrer"));

    if !docs && !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }

    response
}
