// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator, session and capability grant mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use enrolall_domain::CourseId;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{capability_grants, operators, sessions};
use crate::error::PersistenceError;

/// Creates a new operator.
///
/// The `login_name` is normalized to uppercase for case-insensitive uniqueness.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `login_name` - The login name (will be normalized)
/// * `display_name` - The display name
/// * `password` - The plain-text password (will be hashed)
/// * `role` - The role (`Admin` or `Staff`)
///
/// # Errors
///
/// Returns an error if the password cannot be hashed or the login name
/// already exists.
pub fn create_operator(
    conn: &mut SqliteConnection,
    login_name: &str,
    display_name: &str,
    password: &str,
    role: &str,
) -> Result<i64, PersistenceError> {
    let normalized_login: String = login_name.trim().to_uppercase();
    if normalized_login.is_empty() {
        return Err(PersistenceError::Other(String::from(
            "Login name cannot be empty",
        )));
    }

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(operators::table)
        .values((
            operators::login_name.eq(&normalized_login),
            operators::display_name.eq(display_name),
            operators::password_hash.eq(&password_hash),
            operators::role.eq(role),
        ))
        .execute(conn)?;

    let operator_id: i64 = get_last_insert_rowid(conn)?;
    info!(operator_id, login_name = %normalized_login, role, "Created operator");
    Ok(operator_id)
}

/// Records a successful login.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(
    conn: &mut SqliteConnection,
    operator_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(operators::table)
        .filter(operators::operator_id.eq(operator_id))
        .set(operators::last_login_at.eq(diesel::dsl::sql::<
            diesel::sql_types::Nullable<diesel::sql_types::Text>,
        >("CURRENT_TIMESTAMP")))
        .execute(conn)?;
    Ok(())
}

/// Disables an operator and ends their sessions.
///
/// # Errors
///
/// Returns `PersistenceError::OperatorNotFound` if no operator has the ID.
pub fn disable_operator(
    conn: &mut SqliteConnection,
    operator_id: i64,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        let updated: usize = diesel::update(operators::table)
            .filter(operators::operator_id.eq(operator_id))
            .set(operators::is_disabled.eq(1))
            .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::OperatorNotFound(operator_id.to_string()));
        }

        let ended: usize = diesel::delete(sessions::table)
            .filter(sessions::operator_id.eq(operator_id))
            .execute(conn)?;

        info!(operator_id, sessions_ended = ended, "Disabled operator");
        Ok(())
    })
}

/// Creates a session.
///
/// # Arguments
///
/// * `session_token` - The bearer token identifying the session
/// * `sesskey` - The anti-forgery key for this session
/// * `operator_id` - The session owner
/// * `expires_at` - ISO 8601 expiry timestamp
///
/// # Errors
///
/// Returns an error if the operator does not exist or the token is taken.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    sesskey: &str,
    operator_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::sesskey.eq(sesskey),
            sessions::operator_id.eq(operator_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = get_last_insert_rowid(conn)?;
    debug!(session_id, operator_id, expires_at, "Created session");
    Ok(session_id)
}

/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(
            sessions::last_activity_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;
    Ok(())
}

/// Deletes a session by token. Deleting an unknown token is not an error.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;
    debug!(deleted, "Deleted session");
    Ok(())
}

/// Grants a capability to an operator in one course.
///
/// Granting a capability the operator already holds is a no-op.
///
/// # Errors
///
/// Returns an error if the operator or course does not exist.
pub fn grant_capability(
    conn: &mut SqliteConnection,
    operator_id: i64,
    course: CourseId,
    capability: &str,
) -> Result<(), PersistenceError> {
    let inserted: usize = diesel::insert_or_ignore_into(capability_grants::table)
        .values((
            capability_grants::operator_id.eq(operator_id),
            capability_grants::course_id.eq(course.value()),
            capability_grants::capability.eq(capability),
        ))
        .execute(conn)?;

    if inserted > 0 {
        info!(operator_id, course_id = %course, capability, "Granted capability");
    }
    Ok(())
}
