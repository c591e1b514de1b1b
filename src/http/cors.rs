//! CORS layer construction.

use crate::config::CorsConfig;
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Build the CORS layer from configuration.
///
/// Fields left unset fall back to a wildcard, so an empty `[cors]` section
/// (or none at all) yields a fully permissive policy. Configured values
/// that fail to parse are skipped; if none of a field's values parse, that
/// field falls back to the wildcard as well.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    cors = match &config.origin {
        Some(values) => {
            let origins: Vec<HeaderValue> = values
                .iter()
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                cors.allow_origin(Any)
            } else {
                cors.allow_origin(origins)
            }
        }
        None => cors.allow_origin(Any),
    };

    cors = match &config.methods {
        Some(values) => {
            let methods: Vec<Method> = values
                .iter()
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if methods.is_empty() {
                cors.allow_methods(Any)
            } else {
                cors.allow_methods(methods)
            }
        }
        None => cors.allow_methods(Any),
    };

    cors = match &config.headers {
        Some(values) => {
            let headers: Vec<HeaderName> = values
                .iter()
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if headers.is_empty() {
                cors.allow_headers(Any)
            } else {
                cors.allow_headers(headers)
            }
        }
        None => cors.allow_headers(Any),
    };

    cors
}
