//! CurrentUser extractor
//!
//! Reuses the identity placed by [`require_auth`](super::require_auth);
//! validates the header itself when the route is not behind the middleware.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, JwtService, middleware::authenticate};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                security_log!("WARN", "auth_missing", uri = parts.uri.to_string());
                return Err(AppError::not_authenticated());
            }
        };

        let user = authenticate(state.jwt_service(), token, &parts.uri.to_string())?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
