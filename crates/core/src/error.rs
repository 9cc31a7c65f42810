// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use enrolall_domain::{CategoryId, CourseId, DomainError, InstanceId};

use crate::source::Capability;

/// Errors that can abort a report request.
///
/// None of these are recoverable inside the report: either the full report
/// for the authorized scope is produced, or the request fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The viewer lacks a capability on a course that is in scope.
    Unauthorized {
        /// The course the check failed on.
        course: CourseId,
        /// The capability that was required.
        capability: Capability,
    },
    /// A category that must exist has no record.
    CategoryNotFound(CategoryId),
    /// An enrolment instance names a plugin type that is not registered.
    UnknownPlugin {
        /// The unregistered type tag.
        enrol_type: String,
        /// The instance referencing it, if the lookup came from an instance.
        instance: Option<InstanceId>,
    },
    /// A plugin type was registered twice.
    DuplicatePlugin(String),
    /// The storage collaborator failed.
    Source(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Unauthorized { course, capability } => {
                write!(f, "Missing capability '{capability}' on course {course}")
            }
            Self::CategoryNotFound(id) => write!(f, "Category {id} does not exist"),
            Self::UnknownPlugin {
                enrol_type,
                instance: Some(instance),
            } => write!(
                f,
                "Enrolment instance {instance} uses unknown plugin type '{enrol_type}'"
            ),
            Self::UnknownPlugin {
                enrol_type,
                instance: None,
            } => write!(f, "Unknown enrolment plugin type '{enrol_type}'"),
            Self::DuplicatePlugin(enrol_type) => {
                write!(f, "Enrolment plugin type '{enrol_type}' registered twice")
            }
            Self::Source(msg) => write!(f, "Data source error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
