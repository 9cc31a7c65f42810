// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Category, CategoryId, Course, EnrolmentInstance};

/// Maximum length of a plugin type tag.
const MAX_ENROL_TYPE_LEN: usize = 20;

/// Interprets the optional `id` query parameter of the report.
///
/// The parameter selects a category to drill into. Anything that is not a
/// positive integer means "no filter": absent, empty, non-numeric, zero and
/// negative values all fall back to the category index.
///
/// # Arguments
///
/// * `raw` - The raw parameter value, if one was supplied
///
/// # Returns
///
/// The selected category, or `None` for the unfiltered view.
#[must_use]
pub fn parse_category_filter(raw: Option<&str>) -> Option<CategoryId> {
    let value: i64 = raw?.trim().parse().ok()?;
    if value <= 0 {
        return None;
    }
    Some(CategoryId::new(value))
}

/// Validates a course before it is stored.
///
/// # Errors
///
/// Returns an error if the full name or short name is empty, or if the
/// category identifier is negative.
pub fn validate_course(course: &Course) -> Result<(), DomainError> {
    if course.fullname.trim().is_empty() {
        return Err(DomainError::InvalidCourseName(String::from(
            "Course full name cannot be empty",
        )));
    }
    if course.shortname.trim().is_empty() {
        return Err(DomainError::InvalidCourseShortName(String::from(
            "Course short name cannot be empty",
        )));
    }
    if course.category.value() < 0 {
        return Err(DomainError::InvalidIdentifier {
            kind: "category",
            value: course.category.value(),
        });
    }
    Ok(())
}

/// Validates a category before it is stored.
///
/// The root category is implicit and cannot be stored.
///
/// # Errors
///
/// Returns an error if the name is empty or the identifier is not positive.
pub fn validate_category(category: &Category) -> Result<(), DomainError> {
    if category.id.value() <= 0 {
        return Err(DomainError::InvalidIdentifier {
            kind: "category",
            value: category.id.value(),
        });
    }
    if category.name.trim().is_empty() {
        return Err(DomainError::InvalidCategoryName(String::from(
            "Category name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates an enrolment plugin type tag.
///
/// Tags are short lowercase ASCII identifiers (`manual`, `self`, ...).
///
/// # Errors
///
/// Returns an error if the tag is empty, too long, or contains characters
/// other than lowercase ASCII letters, digits and underscores.
pub fn validate_enrol_type(enrol_type: &str) -> Result<(), DomainError> {
    if enrol_type.is_empty() {
        return Err(DomainError::InvalidEnrolType(String::from(
            "Enrolment type cannot be empty",
        )));
    }
    if enrol_type.len() > MAX_ENROL_TYPE_LEN {
        return Err(DomainError::InvalidEnrolType(format!(
            "Enrolment type '{enrol_type}' is longer than {MAX_ENROL_TYPE_LEN} characters"
        )));
    }
    if !enrol_type
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(DomainError::InvalidEnrolType(format!(
            "Enrolment type '{enrol_type}' must be lowercase alphanumeric"
        )));
    }
    Ok(())
}

/// Validates an enrolment instance before it is stored.
///
/// # Errors
///
/// Returns an error if the plugin type tag is invalid.
pub fn validate_instance(instance: &EnrolmentInstance) -> Result<(), DomainError> {
    validate_enrol_type(&instance.enrol_type)
}
