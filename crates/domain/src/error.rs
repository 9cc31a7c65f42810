// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Course full name is empty or invalid.
    InvalidCourseName(String),
    /// Course short name is empty or invalid.
    InvalidCourseShortName(String),
    /// Category name is empty or invalid.
    InvalidCategoryName(String),
    /// Enrolment plugin type tag is empty or malformed.
    InvalidEnrolType(String),
    /// An identifier is out of range.
    InvalidIdentifier {
        /// What kind of identifier was rejected.
        kind: &'static str,
        /// The rejected value.
        value: i64,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCourseName(msg) => write!(f, "Invalid course name: {msg}"),
            Self::InvalidCourseShortName(msg) => write!(f, "Invalid course short name: {msg}"),
            Self::InvalidCategoryName(msg) => write!(f, "Invalid category name: {msg}"),
            Self::InvalidEnrolType(msg) => write!(f, "Invalid enrolment type: {msg}"),
            Self::InvalidIdentifier { kind, value } => {
                write!(f, "Invalid {kind} identifier: {value}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
