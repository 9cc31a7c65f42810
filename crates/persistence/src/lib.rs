// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the enrolment methods overview.
//!
//! Stores the course catalog, enrolment instances, user enrolments and the
//! operator accounts, sessions and capability grants used to authorize
//! viewers. Built on Diesel with a `SQLite` backend.
//!
//! ## Testing
//!
//! Every call to `Persistence::new_in_memory()` gets its own shared
//! in-memory database, so tests never see each other's data.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use enrolall::{CoreError, ReportSource};
use enrolall_domain::{Category, CategoryId, Course, CourseId, EnrolmentInstance, InstanceId};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{CapabilityGrantData, OperatorData, SessionData};
pub use error::PersistenceError;

/// Persistence adapter over one `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a persistence adapter over a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_enrolall_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a persistence adapter over a database file, creating it if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not valid UTF-8 or the database cannot
    /// be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Course catalog
    // ========================================================================

    /// Lists every course, ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_courses(&mut self) -> Result<Vec<Course>, PersistenceError> {
        queries::list_courses(&mut self.conn)
    }

    /// Lists the enrolment instances of a course, ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn enrolment_instances(
        &mut self,
        course: CourseId,
    ) -> Result<Vec<EnrolmentInstance>, PersistenceError> {
        queries::enrolment_instances(&mut self.conn, course)
    }

    /// Counts the user enrolments made through an instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_user_enrolments(&mut self, instance: InstanceId) -> Result<u64, PersistenceError> {
        queries::count_user_enrolments(&mut self.conn, instance)
    }

    /// Retrieves a category by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_category(&mut self, id: CategoryId) -> Result<Option<Category>, PersistenceError> {
        queries::get_category(&mut self.conn, id)
    }

    /// Stores a category.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the identifier is taken.
    pub fn create_category(&mut self, category: &Category) -> Result<(), PersistenceError> {
        mutations::create_category(&mut self.conn, category)
    }

    /// Stores a course.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the identifier or short name
    /// is taken.
    pub fn create_course(&mut self, course: &Course) -> Result<(), PersistenceError> {
        mutations::create_course(&mut self.conn, course)
    }

    /// Stores an enrolment instance.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the course does not exist.
    pub fn create_enrolment_instance(
        &mut self,
        instance: &EnrolmentInstance,
    ) -> Result<(), PersistenceError> {
        mutations::create_enrolment_instance(&mut self.conn, instance)
    }

    /// Enrols a user through an instance and returns the enrolment ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance does not exist or the user is
    /// already enrolled through it.
    pub fn enrol_user(
        &mut self,
        instance: InstanceId,
        user_name: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::enrol_user(&mut self.conn, instance, user_name)
    }

    // ========================================================================
    // Operators and sessions
    // ========================================================================

    /// Creates a new operator and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the login name already exists.
    pub fn create_operator(
        &mut self,
        login_name: &str,
        display_name: &str,
        password: &str,
        role: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::create_operator(&mut self.conn, login_name, display_name, password, role)
    }

    /// Retrieves an operator by login name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_operator_by_login(
        &mut self,
        login_name: &str,
    ) -> Result<Option<OperatorData>, PersistenceError> {
        queries::get_operator_by_login(&mut self.conn, login_name)
    }

    /// Retrieves an operator by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_operator_by_id(
        &mut self,
        operator_id: i64,
    ) -> Result<Option<OperatorData>, PersistenceError> {
        queries::get_operator_by_id(&mut self.conn, operator_id)
    }

    /// Counts operator accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_operators(&mut self) -> Result<i64, PersistenceError> {
        queries::count_operators(&mut self.conn)
    }

    /// Checks a plain-text password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored hash is malformed.
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
        queries::verify_password(password, password_hash)
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_last_login(&mut self, operator_id: i64) -> Result<(), PersistenceError> {
        mutations::update_last_login(&mut self.conn, operator_id)
    }

    /// Disables an operator and deletes their sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator does not exist.
    pub fn disable_operator(&mut self, operator_id: i64) -> Result<(), PersistenceError> {
        mutations::disable_operator(&mut self.conn, operator_id)
    }

    /// Creates a session and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator does not exist or the token is taken.
    pub fn create_session(
        &mut self,
        session_token: &str,
        sesskey: &str,
        operator_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::create_session(
            &mut self.conn,
            session_token,
            sesskey,
            operator_id,
            expires_at,
        )
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::delete_session(&mut self.conn, session_token)
    }

    // ========================================================================
    // Capability grants
    // ========================================================================

    /// Grants a capability to an operator in one course.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator or course does not exist.
    pub fn grant_capability(
        &mut self,
        operator_id: i64,
        course: CourseId,
        capability: &str,
    ) -> Result<(), PersistenceError> {
        mutations::grant_capability(&mut self.conn, operator_id, course, capability)
    }

    /// Lists the capability grants of an operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_capability_grants(
        &mut self,
        operator_id: i64,
    ) -> Result<Vec<CapabilityGrantData>, PersistenceError> {
        queries::list_capability_grants(&mut self.conn, operator_id)
    }
}

impl ReportSource for Persistence {
    fn list_courses(&mut self) -> Result<Vec<Course>, CoreError> {
        Ok(Self::list_courses(self)?)
    }

    fn enrolment_instances(&mut self, course: CourseId) -> Result<Vec<EnrolmentInstance>, CoreError> {
        Ok(Self::enrolment_instances(self, course)?)
    }

    fn count_user_enrolments(&mut self, instance: InstanceId) -> Result<u64, CoreError> {
        Ok(Self::count_user_enrolments(self, instance)?)
    }

    fn category(&mut self, id: CategoryId) -> Result<Option<Category>, CoreError> {
        Ok(self.get_category(id)?)
    }
}
