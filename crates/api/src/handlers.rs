// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request handlers.

use enrolall::{PluginRegistry, ReportPage, build_report};
use enrolall_domain::{CategoryId, parse_category_filter};
use enrolall_persistence::Persistence;
use tracing::{info, warn};

use crate::auth::{AuthenticationService, NewSession, ValidatedSession};
use crate::capabilities::ViewerContext;
use crate::error::{ApiError, translate_core_error};
use crate::request_response::{
    EnrolmentReportRequest, LoginRequest, LoginResponse, LogoutResponse,
};

/// Builds the enrolment methods report for one request.
///
/// A missing, empty, non-numeric or non-positive `id` shows the category
/// index; any other value drills into that category.
///
/// # Errors
///
/// Returns an error if the viewer may not review an in-scope course, the
/// selected category does not exist, an instance uses an unregistered
/// plugin type, or storage fails.
pub fn enrolment_report(
    persistence: &mut Persistence,
    registry: &PluginRegistry,
    viewer: &ViewerContext,
    request: &EnrolmentReportRequest,
) -> Result<ReportPage, ApiError> {
    let filter: Option<CategoryId> = parse_category_filter(request.id.as_deref());

    build_report(persistence, viewer, registry, filter, viewer.sesskey()).map_err(|err| {
        warn!(
            login_name = %viewer.actor().id,
            error = %err,
            "Enrolment report failed"
        );
        translate_core_error(err)
    })
}

/// Decides whether the legacy report route must send the viewer home.
///
/// The legacy route is reached from a course context; the site course is
/// not a real course and has no enrolment methods to review.
#[must_use]
pub fn is_site_course_context(request: &EnrolmentReportRequest, site_course_id: i64) -> bool {
    request
        .course
        .as_deref()
        .and_then(|course| course.trim().parse::<i64>().ok())
        .is_some_and(|course| course == site_course_id)
}

/// Validates a session token and builds the viewer context.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` if the session is not valid.
pub fn authenticate_viewer(
    persistence: &mut Persistence,
    session_token: &str,
) -> Result<ViewerContext, ApiError> {
    let session: ValidatedSession = AuthenticationService::validate_session(persistence, session_token)?;
    ViewerContext::load(persistence, &session)
}

/// Logs in with a login name and password.
///
/// # Errors
///
/// Returns an error if the credentials are rejected or the session cannot
/// be stored.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let session: NewSession =
        AuthenticationService::login(persistence, &request.login_name, &request.password)?;

    Ok(LoginResponse {
        session_token: session.session_token,
        sesskey: session.sesskey,
        login_name: session.operator.login_name,
        display_name: session.operator.display_name,
        role: session.operator.role,
        expires_at: session.expires_at,
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub fn logout(
    persistence: &mut Persistence,
    session_token: &str,
) -> Result<LogoutResponse, ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(LogoutResponse { success: true })
}

/// Creates the first admin operator of an empty store.
///
/// # Returns
///
/// The new operator ID, or `None` if operators already exist.
///
/// # Errors
///
/// Returns an error if the login name or password is empty or storage
/// fails.
pub fn bootstrap_admin(
    persistence: &mut Persistence,
    login_name: &str,
    password: &str,
) -> Result<Option<i64>, ApiError> {
    if login_name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("login_name"),
            message: String::from("Login name cannot be empty"),
        });
    }
    if password.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("password"),
            message: String::from("Password cannot be empty"),
        });
    }

    if persistence.count_operators()? > 0 {
        info!("Operators already exist, skipping bootstrap admin");
        return Ok(None);
    }

    let operator_id: i64 =
        persistence.create_operator(login_name, "Site administrator", password, "Admin")?;
    info!(operator_id, "Created bootstrap admin operator");
    Ok(Some(operator_id))
}
