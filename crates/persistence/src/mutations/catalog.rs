// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Course catalog and enrolment mutations.
//!
//! Catalog records keep the identifiers they are created with, so links
//! and category filters stay stable across imports.

use diesel::SqliteConnection;
use diesel::prelude::*;
use enrolall_domain::{
    Category, Course, EnrolmentInstance, InstanceId, validate_category, validate_course,
    validate_instance,
};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{course_categories, courses, enrol, user_enrolments};
use crate::error::PersistenceError;

/// Stores a category.
///
/// # Errors
///
/// Returns an error if the category fails validation or the identifier is
/// already taken.
pub fn create_category(
    conn: &mut SqliteConnection,
    category: &Category,
) -> Result<(), PersistenceError> {
    validate_category(category)?;

    diesel::insert_into(course_categories::table)
        .values((
            course_categories::category_id.eq(category.id.value()),
            course_categories::name.eq(&category.name),
        ))
        .execute(conn)?;

    info!(category_id = %category.id, name = %category.name, "Created category");
    Ok(())
}

/// Stores a course.
///
/// The category is not checked: category `0` is the implicit root and has no
/// record.
///
/// # Errors
///
/// Returns an error if the course fails validation or the identifier or
/// short name is already taken.
pub fn create_course(conn: &mut SqliteConnection, course: &Course) -> Result<(), PersistenceError> {
    validate_course(course)?;

    diesel::insert_into(courses::table)
        .values((
            courses::course_id.eq(course.id.value()),
            courses::fullname.eq(&course.fullname),
            courses::shortname.eq(&course.shortname),
            courses::category_id.eq(course.category.value()),
        ))
        .execute(conn)?;

    info!(
        course_id = %course.id,
        shortname = %course.shortname,
        category_id = %course.category,
        "Created course"
    );
    Ok(())
}

/// Stores an enrolment instance.
///
/// The type tag is not checked against the registered plugins; the report
/// rejects unknown types when it renders them.
///
/// # Errors
///
/// Returns an error if the type tag is malformed, the course does not
/// exist, or the identifier is already taken.
pub fn create_enrolment_instance(
    conn: &mut SqliteConnection,
    instance: &EnrolmentInstance,
) -> Result<(), PersistenceError> {
    validate_instance(instance)?;

    diesel::insert_into(enrol::table)
        .values((
            enrol::instance_id.eq(instance.id.value()),
            enrol::course_id.eq(instance.course.value()),
            enrol::enrol_type.eq(&instance.enrol_type),
            enrol::status.eq(instance.status.code()),
            enrol::name.eq(instance.name.as_deref()),
            enrol::custom_text.eq(instance.custom_text.as_deref()),
        ))
        .execute(conn)?;

    info!(
        instance_id = %instance.id,
        course_id = %instance.course,
        enrol_type = %instance.enrol_type,
        status = %instance.status,
        "Created enrolment instance"
    );
    Ok(())
}

/// Enrols a user through an instance.
///
/// # Returns
///
/// The new user enrolment identifier.
///
/// # Errors
///
/// Returns an error if the user name is blank, the instance does not exist,
/// or the user is already enrolled through it.
pub fn enrol_user(
    conn: &mut SqliteConnection,
    instance: InstanceId,
    user_name: &str,
) -> Result<i64, PersistenceError> {
    let user_name: &str = user_name.trim();
    if user_name.is_empty() {
        return Err(PersistenceError::Other(String::from(
            "User name cannot be empty",
        )));
    }

    diesel::insert_into(user_enrolments::table)
        .values((
            user_enrolments::instance_id.eq(instance.value()),
            user_enrolments::user_name.eq(user_name),
        ))
        .execute(conn)?;

    let user_enrolment_id: i64 = get_last_insert_rowid(conn)?;
    debug!(user_enrolment_id, instance_id = %instance, "Enrolled user");
    Ok(user_enrolment_id)
}
