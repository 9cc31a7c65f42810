// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use enrolall::CoreError;
use enrolall_domain::DomainError;
use enrolall_persistence::PersistenceError;
use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Credentials were rejected.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The session token is unknown, expired or belongs to a disabled
    /// operator.
    #[error("Invalid session: {reason}")]
    InvalidSession {
        /// Why the session was rejected.
        reason: String,
    },
    /// The session store failed.
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl From<PersistenceError> for AuthError {
    fn from(err: PersistenceError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The viewer lacks a capability the request needs.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The capability required for this action.
        required_capability: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An enrolment instance uses a plugin type that is not registered.
    PluginLookupFailed {
        /// The unresolved type tag.
        enrol_type: String,
        /// A human-readable description of the failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_capability,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_capability}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::PluginLookupFailed { message, .. } => {
                write!(f, "Plugin lookup failed: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } | AuthError::InvalidSession { reason } => {
                Self::AuthenticationFailed { reason }
            }
            AuthError::Storage(message) => Self::Internal { message },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::ValidationFailed(domain) => translate_domain_error(domain),
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidCourseName(msg) => ApiError::InvalidInput {
            field: String::from("fullname"),
            message: msg,
        },
        DomainError::InvalidCourseShortName(msg) => ApiError::InvalidInput {
            field: String::from("shortname"),
            message: msg,
        },
        DomainError::InvalidCategoryName(msg) => ApiError::InvalidInput {
            field: String::from("category_name"),
            message: msg,
        },
        DomainError::InvalidEnrolType(msg) => ApiError::InvalidInput {
            field: String::from("enrol_type"),
            message: msg,
        },
        DomainError::InvalidIdentifier { kind, value } => ApiError::InvalidInput {
            field: format!("{kind}_id"),
            message: format!("Invalid {kind} identifier: {value}"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    let message: String = err.to_string();
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Unauthorized { course, capability } => ApiError::Unauthorized {
            action: format!("view enrolment methods of course {course}"),
            required_capability: capability.to_string(),
        },
        CoreError::CategoryNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Category"),
            message,
        },
        CoreError::UnknownPlugin { enrol_type, .. } => ApiError::PluginLookupFailed {
            enrol_type,
            message,
        },
        CoreError::DuplicatePlugin(_) | CoreError::Source(_) => ApiError::Internal { message },
    }
}
