// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared-secret authentication middleware.
//!
//! Every endpoint except `/health` requires the deployment secret in the
//! `x-api-secret` header. With no secret configured, all requests are
//! rejected (fail-closed).

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

/// Authentication configuration for the gateway.
#[derive(Clone)]
pub struct AuthConfig {
    /// Expected value of the `x-api-secret` header.
    pub api_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_secret", &"[redacted]")
            .finish()
    }
}

/// Middleware comparing the `x-api-secret` header against the configured
/// secret.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth.api_secret.is_empty() {
        tracing::error!("gateway has no api secret configured -- rejecting request");
        return Err(StatusCode::UNAUTHORIZED);
    }

    let provided = request
        .headers()
        .get("x-api-secret")
        .and_then(|v| v.to_str().ok());

    if provided == Some(auth.api_secret.as_str()) {
        return Ok(next.run(request).await);
    }

    Err(StatusCode::UNAUTHORIZED)
}
