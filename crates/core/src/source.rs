// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seams to the collaborators the report reads from.

use enrolall_domain::{Category, CategoryId, Course, CourseId, EnrolmentInstance, InstanceId};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Course-level capabilities consulted by the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// May see the enrolment methods of a course. Required for every course
    /// in scope.
    EnrolReview,
    /// May configure enrolment methods. Unlocks plugin action icons.
    EnrolConfig,
}

impl Capability {
    /// Every capability, in storage order.
    pub const ALL: [Self; 2] = [Self::EnrolReview, Self::EnrolConfig];

    /// The stored name of this capability.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnrolReview => "course:enrolreview",
            Self::EnrolConfig => "course:enrolconfig",
        }
    }

    /// Parses a stored capability name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cap| cap.as_str() == name)
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read access to courses, categories and enrolments.
///
/// Methods take `&mut self` because database connections do.
pub trait ReportSource {
    /// Lists every course, in the order the report iterates them.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn list_courses(&mut self) -> Result<Vec<Course>, CoreError>;

    /// Lists the enrolment instances configured on a course, in display
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn enrolment_instances(&mut self, course: CourseId)
    -> Result<Vec<EnrolmentInstance>, CoreError>;

    /// Counts the user enrolments attached to an instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn count_user_enrolments(&mut self, instance: InstanceId) -> Result<u64, CoreError>;

    /// Looks up a category record.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails. A missing record is
    /// `Ok(None)`.
    fn category(&mut self, id: CategoryId) -> Result<Option<Category>, CoreError>;
}

/// Answers capability checks for the viewer of a report.
pub trait PermissionChecker {
    /// Returns whether the viewer holds `capability` on `course`.
    fn has_capability(&self, course: CourseId, capability: Capability) -> bool;
}
