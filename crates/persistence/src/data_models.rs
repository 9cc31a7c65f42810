// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// A stored operator account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorData {
    pub operator_id: i64,
    /// Always uppercase.
    pub login_name: String,
    pub display_name: String,
    pub password_hash: String,
    /// `Admin` or `Staff`.
    pub role: String,
    pub is_disabled: bool,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// A stored login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    /// Anti-forgery key embedded in links that change state.
    pub sesskey: String,
    pub operator_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    /// ISO 8601 timestamp.
    pub expires_at: String,
}

/// One capability an operator holds in one course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityGrantData {
    pub grant_id: i64,
    pub operator_id: i64,
    pub course_id: i64,
    pub capability: String,
}
