// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use enrolall_domain::{CategoryId, Course};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::source::{Capability, PermissionChecker};

/// Narrows the course list to the courses the report will show.
///
/// A course is in scope when the filter is absent or names its category.
/// Every course in scope must be reviewable by the viewer: the first one
/// that is not aborts the whole report instead of being skipped.
///
/// Order of the input list is preserved.
///
/// # Arguments
///
/// * `courses` - Every course, in report order
/// * `filter` - The selected category, if any
/// * `viewer` - Capability checks for the current viewer
///
/// # Errors
///
/// Returns `CoreError::Unauthorized` for the first in-scope course the
/// viewer may not review.
pub fn filter_courses<P>(
    courses: Vec<Course>,
    filter: Option<CategoryId>,
    viewer: &P,
) -> Result<Vec<Course>, CoreError>
where
    P: PermissionChecker + ?Sized,
{
    let mut in_scope: Vec<Course> = Vec::with_capacity(courses.len());
    for course in courses {
        if filter.is_some_and(|category| category != course.category) {
            continue;
        }
        if !viewer.has_capability(course.id, Capability::EnrolReview) {
            warn!(
                course_id = %course.id,
                capability = %Capability::EnrolReview,
                "Viewer may not review enrolments of an in-scope course"
            );
            return Err(CoreError::Unauthorized {
                course: course.id,
                capability: Capability::EnrolReview,
            });
        }
        in_scope.push(course);
    }
    debug!(
        courses = in_scope.len(),
        filter = ?filter.map(CategoryId::value),
        "Access filter passed"
    );
    Ok(in_scope)
}
