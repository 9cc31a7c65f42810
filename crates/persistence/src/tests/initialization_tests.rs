// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::PathBuf;

use crate::Persistence;
use crate::error::PersistenceError;

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = Persistence::new_in_memory().unwrap();
    let mut db2: Persistence = Persistence::new_in_memory().unwrap();

    db1.create_operator("op1", "Operator One", "password", "Admin")
        .unwrap();

    assert_eq!(db1.count_operators().unwrap(), 1);
    assert_eq!(db2.count_operators().unwrap(), 0);
}

#[test]
fn test_file_database_survives_reopen() {
    let path: PathBuf = std::env::temp_dir().join(format!(
        "enrolall_reopen_{}.sqlite3",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        persistence
            .create_operator("admin", "Admin", "password", "Admin")
            .unwrap();
    }

    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    assert_eq!(reopened.count_operators().unwrap(), 1);

    drop(reopened);
    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(path.with_extension("sqlite3-wal"));
    let _ = std::fs::remove_file(path.with_extension("sqlite3-shm"));
}

#[test]
fn test_unopenable_path_fails() {
    let path: PathBuf = std::env::temp_dir()
        .join("enrolall_missing_dir")
        .join("nested")
        .join("db.sqlite3");
    let result: Result<Persistence, PersistenceError> = Persistence::new_with_file(&path);
    assert!(matches!(
        result,
        Err(PersistenceError::DatabaseConnectionFailed(_))
    ));
}
