// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Query parameters of the report routes.
///
/// Both are kept as raw text: malformed values are not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolmentReportRequest {
    /// The category to drill into.
    #[serde(default)]
    pub id: Option<String>,
    /// The course context of the legacy route.
    #[serde(default)]
    pub course: Option<String>,
}

impl EnrolmentReportRequest {
    /// Reads the report parameters from a raw query string.
    ///
    /// A parameter given more than once is ambiguous and treated as absent.
    /// Unknown parameters are ignored.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut ids: Vec<String> = Vec::new();
        let mut courses: Vec<String> = Vec::new();
        for (name, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            match name.as_ref() {
                "id" => ids.push(value.into_owned()),
                "course" => courses.push(value.into_owned()),
                _ => {}
            }
        }

        Self {
            id: single_value(ids),
            course: single_value(courses),
        }
    }
}

fn single_value(mut values: Vec<String>) -> Option<String> {
    if values.len() == 1 { values.pop() } else { None }
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The operator login name.
    pub login_name: String,
    /// The operator password.
    pub password: String,
}

/// API response for successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The session token (opaque).
    pub session_token: String,
    /// The anti-forgery key of the session.
    pub sesskey: String,
    /// The operator's login name.
    pub login_name: String,
    /// The operator's display name.
    pub display_name: String,
    /// The operator's role.
    pub role: String,
    /// Session expiration timestamp (ISO 8601).
    pub expires_at: String,
}

/// API response for logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Always `true`; logging out an unknown session is not an error.
    pub success: bool,
}
