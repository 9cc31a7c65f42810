// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator, session and capability grant queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{CapabilityGrantData, OperatorData, SessionData};
use crate::diesel_schema::{capability_grants, operators, sessions};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = operators)]
struct OperatorRow {
    operator_id: i64,
    login_name: String,
    display_name: String,
    password_hash: String,
    role: String,
    is_disabled: i32,
    created_at: String,
    last_login_at: Option<String>,
}

impl From<OperatorRow> for OperatorData {
    fn from(row: OperatorRow) -> Self {
        Self {
            operator_id: row.operator_id,
            login_name: row.login_name,
            display_name: row.display_name,
            password_hash: row.password_hash,
            role: row.role,
            is_disabled: row.is_disabled != 0,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
struct SessionRow {
    session_id: i64,
    session_token: String,
    sesskey: String,
    operator_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = capability_grants)]
struct GrantRow {
    grant_id: i64,
    operator_id: i64,
    course_id: i64,
    capability: String,
}

/// Retrieves an operator by login name.
///
/// The `login_name` is normalized to uppercase for case-insensitive lookup.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the operator is not found.
pub fn get_operator_by_login(
    conn: &mut SqliteConnection,
    login_name: &str,
) -> Result<Option<OperatorData>, PersistenceError> {
    let normalized_login: String = login_name.trim().to_uppercase();

    debug!("Looking up operator by login_name: {}", normalized_login);

    let row: Option<OperatorRow> = operators::table
        .filter(operators::login_name.eq(&normalized_login))
        .select(OperatorRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(OperatorData::from))
}

/// Retrieves an operator by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the operator is not found.
pub fn get_operator_by_id(
    conn: &mut SqliteConnection,
    operator_id: i64,
) -> Result<Option<OperatorData>, PersistenceError> {
    let row: Option<OperatorRow> = operators::table
        .filter(operators::operator_id.eq(operator_id))
        .select(OperatorRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(OperatorData::from))
}

/// Counts operator accounts, disabled ones included.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_operators(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(operators::table.count().get_result(conn)?)
}

/// Retrieves a session by token.
///
/// Expiry is not checked here.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the session is not found.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    debug!("Looking up session by token");

    let row: Option<SessionRow> = sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(|row| SessionData {
        session_id: row.session_id,
        session_token: row.session_token,
        sesskey: row.sesskey,
        operator_id: row.operator_id,
        created_at: row.created_at,
        last_activity_at: row.last_activity_at,
        expires_at: row.expires_at,
    }))
}

/// Lists the capability grants of one operator, ordered by course.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_capability_grants(
    conn: &mut SqliteConnection,
    operator_id: i64,
) -> Result<Vec<CapabilityGrantData>, PersistenceError> {
    let rows: Vec<GrantRow> = capability_grants::table
        .filter(capability_grants::operator_id.eq(operator_id))
        .order((
            capability_grants::course_id.asc(),
            capability_grants::capability.asc(),
        ))
        .select(GrantRow::as_select())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| CapabilityGrantData {
            grant_id: row.grant_id,
            operator_id: row.operator_id,
            course_id: row.course_id,
            capability: row.capability,
        })
        .collect())
}

/// Checks a plain-text password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns an error if the stored hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::CorruptRecord(format!("Unreadable password hash: {e}")))
}
