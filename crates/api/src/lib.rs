// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the enrolment methods overview.
//!
//! Authenticates operators, builds the viewer context and runs the report
//! pipeline, translating core errors into the API contract.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod capabilities;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, NewSession, Role, ValidatedSession};
pub use capabilities::ViewerContext;
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use handlers::{
    authenticate_viewer, bootstrap_admin, enrolment_report, is_site_course_context, login,
    logout,
};
pub use request_response::{EnrolmentReportRequest, LoginRequest, LoginResponse, LogoutResponse};
