// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use enrolall_domain::CourseId;

use super::{create_test_persistence, seed_sciences};
use crate::error::PersistenceError;
use crate::{CapabilityGrantData, OperatorData, Persistence, SessionData};

const EXPIRES_AT: &str = "2099-01-01T00:00:00Z";

#[test]
fn test_create_operator_normalizes_login() {
    let mut persistence: Persistence = create_test_persistence();
    let operator_id: i64 = persistence
        .create_operator("testop", "Test Operator", "password", "Admin")
        .unwrap();

    let operator: OperatorData = persistence
        .get_operator_by_login("TestOp")
        .unwrap()
        .unwrap();
    assert_eq!(operator.operator_id, operator_id);
    assert_eq!(operator.login_name, "TESTOP");
    assert_eq!(operator.display_name, "Test Operator");
    assert_eq!(operator.role, "Admin");
    assert!(!operator.is_disabled);
    assert!(operator.last_login_at.is_none());
}

#[test]
fn test_password_is_stored_hashed() {
    let mut persistence: Persistence = create_test_persistence();
    let operator_id: i64 = persistence
        .create_operator("hashme", "Hash Me", "s3cret", "Staff")
        .unwrap();

    let operator: OperatorData = persistence.get_operator_by_id(operator_id).unwrap().unwrap();
    assert_ne!(operator.password_hash, "s3cret");
    assert!(bcrypt::verify("s3cret", &operator.password_hash).unwrap());
}

#[test]
fn test_duplicate_login_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .create_operator("dup", "First", "password", "Admin")
        .unwrap();
    let result: Result<i64, PersistenceError> =
        persistence.create_operator("DUP", "Second", "password", "Admin");
    assert!(result.is_err());
}

#[test]
fn test_unknown_role_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let result: Result<i64, PersistenceError> =
        persistence.create_operator("op", "Operator", "password", "Lecturer");
    assert!(result.is_err());
}

#[test]
fn test_missing_operator_lookups_return_none() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(
        persistence
            .get_operator_by_login("nobody")
            .unwrap()
            .is_none()
    );
    assert!(persistence.get_operator_by_id(77).unwrap().is_none());
}

#[test]
fn test_update_last_login() {
    let mut persistence: Persistence = create_test_persistence();
    let operator_id: i64 = persistence
        .create_operator("op", "Operator", "password", "Admin")
        .unwrap();
    persistence.update_last_login(operator_id).unwrap();

    let operator: OperatorData = persistence.get_operator_by_id(operator_id).unwrap().unwrap();
    assert!(operator.last_login_at.is_some());
}

#[test]
fn test_session_lifecycle() {
    let mut persistence: Persistence = create_test_persistence();
    let operator_id: i64 = persistence
        .create_operator("op", "Operator", "password", "Admin")
        .unwrap();

    let session_id: i64 = persistence
        .create_session("token-1", "key-1", operator_id, EXPIRES_AT)
        .unwrap();

    let session: SessionData = persistence
        .get_session_by_token("token-1")
        .unwrap()
        .unwrap();
    assert_eq!(session.session_id, session_id);
    assert_eq!(session.sesskey, "key-1");
    assert_eq!(session.operator_id, operator_id);
    assert_eq!(session.expires_at, EXPIRES_AT);

    persistence.update_session_activity(session_id).unwrap();
    persistence.delete_session("token-1").unwrap();
    assert!(
        persistence
            .get_session_by_token("token-1")
            .unwrap()
            .is_none()
    );

    // Deleting again is harmless.
    persistence.delete_session("token-1").unwrap();
}

#[test]
fn test_session_requires_existing_operator() {
    let mut persistence: Persistence = create_test_persistence();
    let result: Result<i64, PersistenceError> =
        persistence.create_session("token", "key", 999, EXPIRES_AT);
    assert!(result.is_err());
}

#[test]
fn test_disable_operator_ends_sessions() {
    let mut persistence: Persistence = create_test_persistence();
    let operator_id: i64 = persistence
        .create_operator("op", "Operator", "password", "Staff")
        .unwrap();
    persistence
        .create_session("token-a", "key-a", operator_id, EXPIRES_AT)
        .unwrap();

    persistence.disable_operator(operator_id).unwrap();

    let operator: OperatorData = persistence.get_operator_by_id(operator_id).unwrap().unwrap();
    assert!(operator.is_disabled);
    assert!(
        persistence
            .get_session_by_token("token-a")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_disable_unknown_operator_fails() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(matches!(
        persistence.disable_operator(5),
        Err(PersistenceError::OperatorNotFound(_))
    ));
}

#[test]
fn test_grants_are_listed_by_course_and_deduplicated() {
    let mut persistence: Persistence = create_test_persistence();
    seed_sciences(&mut persistence);
    let operator_id: i64 = persistence
        .create_operator("staff", "Staff", "password", "Staff")
        .unwrap();

    persistence
        .grant_capability(operator_id, CourseId::new(1), "course:enrolreview")
        .unwrap();
    persistence
        .grant_capability(operator_id, CourseId::new(1), "course:enrolconfig")
        .unwrap();
    persistence
        .grant_capability(operator_id, CourseId::new(1), "course:enrolreview")
        .unwrap();

    let grants: Vec<CapabilityGrantData> =
        persistence.list_capability_grants(operator_id).unwrap();
    let capabilities: Vec<&str> = grants.iter().map(|g| g.capability.as_str()).collect();
    assert_eq!(
        capabilities,
        vec!["course:enrolconfig", "course:enrolreview"]
    );
    assert!(grants.iter().all(|g| g.course_id == 1));
}

#[test]
fn test_grant_requires_existing_course() {
    let mut persistence: Persistence = create_test_persistence();
    let operator_id: i64 = persistence
        .create_operator("staff", "Staff", "password", "Staff")
        .unwrap();
    let result: Result<(), PersistenceError> =
        persistence.grant_capability(operator_id, CourseId::new(404), "course:enrolreview");
    assert!(result.is_err());
}

#[test]
fn test_verify_password() {
    let mut persistence: Persistence = create_test_persistence();
    let operator_id: i64 = persistence
        .create_operator("op", "Operator", "correct horse", "Admin")
        .unwrap();
    let operator: OperatorData = persistence.get_operator_by_id(operator_id).unwrap().unwrap();

    assert!(Persistence::verify_password("correct horse", &operator.password_hash).unwrap());
    assert!(!Persistence::verify_password("wrong", &operator.password_hash).unwrap());
    assert!(Persistence::verify_password("x", "not-a-hash").is_err());
}
