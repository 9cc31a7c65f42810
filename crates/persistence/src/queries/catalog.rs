// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Course catalog and enrolment queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use enrolall_domain::{
    Category, CategoryId, Course, CourseId, EnrolmentInstance, InstanceId, InstanceStatus,
};
use tracing::debug;

use crate::diesel_schema::{course_categories, courses, enrol, user_enrolments};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = courses)]
struct CourseRow {
    course_id: i64,
    fullname: String,
    shortname: String,
    category_id: i64,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Self::new(
            CourseId::new(row.course_id),
            &row.fullname,
            &row.shortname,
            CategoryId::new(row.category_id),
        )
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = course_categories)]
struct CategoryRow {
    category_id: i64,
    name: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = enrol)]
struct InstanceRow {
    instance_id: i64,
    course_id: i64,
    enrol_type: String,
    status: i32,
    name: Option<String>,
    custom_text: Option<String>,
}

impl From<InstanceRow> for EnrolmentInstance {
    fn from(row: InstanceRow) -> Self {
        Self {
            id: InstanceId::new(row.instance_id),
            course: CourseId::new(row.course_id),
            enrol_type: row.enrol_type,
            status: InstanceStatus::from_code(row.status),
            name: row.name,
            custom_text: row.custom_text,
        }
    }
}

/// Lists every course, ordered by identifier.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_courses(conn: &mut SqliteConnection) -> Result<Vec<Course>, PersistenceError> {
    let rows: Vec<CourseRow> = courses::table
        .order(courses::course_id.asc())
        .select(CourseRow::as_select())
        .load(conn)?;

    debug!(count = rows.len(), "Loaded courses");
    Ok(rows.into_iter().map(Course::from).collect())
}

/// Lists the enrolment instances of one course, ordered by identifier.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn enrolment_instances(
    conn: &mut SqliteConnection,
    course: CourseId,
) -> Result<Vec<EnrolmentInstance>, PersistenceError> {
    let rows: Vec<InstanceRow> = enrol::table
        .filter(enrol::course_id.eq(course.value()))
        .order(enrol::instance_id.asc())
        .select(InstanceRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(EnrolmentInstance::from).collect())
}

/// Counts the user enrolments made through one instance.
///
/// Every enrolment counts, whatever its own status.
///
/// # Errors
///
/// Returns an error if the database query fails or the count is negative.
pub fn count_user_enrolments(
    conn: &mut SqliteConnection,
    instance: InstanceId,
) -> Result<u64, PersistenceError> {
    let count: i64 = user_enrolments::table
        .filter(user_enrolments::instance_id.eq(instance.value()))
        .count()
        .get_result(conn)?;

    u64::try_from(count).map_err(|_| {
        PersistenceError::CorruptRecord(format!(
            "Negative enrolment count {count} for instance {instance}"
        ))
    })
}

/// Retrieves a category by identifier.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the category does not exist.
pub fn get_category(
    conn: &mut SqliteConnection,
    category: CategoryId,
) -> Result<Option<Category>, PersistenceError> {
    let row: Option<CategoryRow> = course_categories::table
        .filter(course_categories::category_id.eq(category.value()))
        .select(CategoryRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(|row| Category::new(CategoryId::new(row.category_id), &row.name)))
}
