//! # CORS
//!
//! Builds the [`CorsLayer`] for the `/auth` API from [`CorsConfig`].
//!
//! The single-page client is normally served from the same origin. During
//! development it runs on its own dev server, so cross-origin requests that
//! carry the session cookie must be allowed explicitly:
//!
//! ```text
//! CORS_ORIGINS=http://localhost:3000
//! CORS_CREDENTIALS=true
//! ```
//!
//! With no origins configured, `http://localhost:3000` is allowed.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::web::CorsConfig;

/// Origin of the client dev server, allowed when none is configured.
pub const DEFAULT_DEV_ORIGIN: &str = "http://localhost:3000";

/// Parses a comma-separated origin list. Blank or invalid entries are
/// skipped.
fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect()
}

pub fn build_cors(cors: &CorsConfig) -> CorsLayer {
    let origins = parse_origins(&cors.env);

    // A wildcard is not allowed together with credentials, so always list.
    let allow = if origins.is_empty() {
        AllowOrigin::list([HeaderValue::from_static(DEFAULT_DEV_ORIGIN)])
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(cors.credentials)
}
