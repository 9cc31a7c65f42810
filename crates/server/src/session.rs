// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction and authentication for the report routes.
//!
//! This module provides the Axum extractor that validates the session token
//! and builds the viewer context at the server boundary.

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap, StatusCode,
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
    },
};
use enrolall_api::{ViewerContext, authenticate_viewer};
use tracing::{debug, warn};

use crate::{AppState, PageError};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "enrolall_session";

/// Extractor for an authenticated viewer.
///
/// # Authentication Flow
///
/// 1. Take the token from `Authorization: Bearer <token>`, or failing that
///    from the `enrolall_session` cookie
/// 2. Validate the session via `authenticate_viewer`
/// 3. Load the operator's capability grants
///
/// # Errors
///
/// Rejects the request with an HTTP 401 error page if no token is present,
/// the Authorization header is malformed, or the session is unknown,
/// expired or belongs to a disabled operator.
pub struct SessionViewer(pub ViewerContext);

impl FromRequestParts<AppState> for SessionViewer {
    type Rejection = PageError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, state).await.map(Self)
    }
}

/// Validates the session named by the request headers.
///
/// # Errors
///
/// Returns an HTML error page: 401 for a missing or rejected session, 500
/// if storage fails.
pub async fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<ViewerContext, PageError> {
    let lang: &str = &state.settings.lang;
    let token: &str = session_token(headers).map_err(|err| {
        debug!(error = %err, "No usable session credentials");
        PageError::new(StatusCode::UNAUTHORIZED, err.to_string(), lang)
    })?;

    let mut persistence = state.persistence.lock().await;
    let viewer: ViewerContext = authenticate_viewer(&mut persistence, token).map_err(|err| {
        warn!(error = %err, "Session validation failed");
        PageError::from_api(err, lang)
    })?;
    drop(persistence);

    debug!(
        login_name = %viewer.actor().id,
        role = ?viewer.actor().role,
        "Session validated successfully"
    );
    Ok(viewer)
}

/// Finds the session token in the request headers.
///
/// A present Authorization header wins over the cookie and must be a
/// well-formed bearer token.
///
/// # Errors
///
/// Returns an error if neither source yields a token.
pub fn session_token(headers: &HeaderMap) -> Result<&str, SessionError> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        let value: &str = value
            .to_str()
            .map_err(|_| SessionError::InvalidAuthorizationHeader)?;
        return value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(SessionError::InvalidAuthorizationHeader);
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or(SessionError::MissingCredentials)
}

/// `Set-Cookie` value that stores a session token.
#[must_use]
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value that clears the session cookie.
#[must_use]
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Session extraction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Neither an Authorization header nor a session cookie was sent.
    MissingCredentials,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "Login required"),
            Self::InvalidAuthorizationHeader => write!(f, "Invalid Authorization header format"),
        }
    }
}
