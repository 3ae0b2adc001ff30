use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

use crate::config;
use crate::error::ApiError;

/// Header carrying the static API key for all /api routes.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Static API-key middleware. Every request under /api must present the
/// configured key in the x-api-key header; there are no per-user identities.
pub async fn api_key_middleware(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let configured = &config::config().security.api_key;

    if configured.is_empty() {
        tracing::error!("SECURITY_API_KEY is not set; refusing protected request");
        return Err(ApiError::internal_server_error("API key is not configured"));
    }

    let provided = headers
        .get(API_KEY_HEADER)
        .ok_or_else(|| ApiError::unauthorized(format!("Missing {} header", API_KEY_HEADER)))?
        .to_str()
        .map_err(|_| ApiError::unauthorized(format!("Invalid {} header", API_KEY_HEADER)))?;

    if !keys_match(provided, configured) {
        tracing::warn!("Rejected request with invalid API key");
        return Err(ApiError::unauthorized("Invalid API key"));
    }

    Ok(next.run(request).await)
}

/// Compare SHA-256 digests instead of the raw strings, so the comparison
/// operates on fixed-length values regardless of what the client sent.
fn keys_match(provided: &str, configured: &str) -> bool {
    let provided = Sha256::digest(provided.as_bytes());
    let configured = Sha256::digest(configured.as_bytes());
    provided == configured
}
