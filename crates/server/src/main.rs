// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod demo;
mod pix;
mod session;
mod views;

use axum::{
    Json, Router,
    extract::{RawQuery, State as AxumState},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use clap::Parser;
use enrolall::{PluginRegistry, ReportPage};
use enrolall_api::{
    ApiError, EnrolmentReportRequest, LoginRequest, LoginResponse, LogoutResponse, ViewerContext,
    bootstrap_admin, enrolment_report, is_site_course_context, login, logout,
};
use enrolall_persistence::Persistence;
use maud::Markup;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::session::SessionViewer;

rust_i18n::i18n!("locales", fallback = "en");

/// Enrolall Server - enrolment methods of every course, by category
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "ENROLALL_DATABASE")]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, env = "ENROLALL_PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, env = "ENROLALL_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Enrolment plugin types enabled site-wide
    #[arg(
        long,
        env = "ENROLALL_ENABLED_PLUGINS",
        value_delimiter = ',',
        default_value = "manual,guest,self,cohort"
    )]
    enabled_plugins: Vec<String>,

    /// Language of the rendered pages
    #[arg(short, long, env = "ENROLALL_LANG", default_value = "en")]
    lang: String,

    /// Course ID of the site itself; the legacy report route sends it home
    #[arg(long, env = "ENROLALL_SITE_COURSE_ID", default_value_t = 1)]
    site_course_id: i64,

    /// Creates an admin operator on an empty store, given as `login:password`
    #[arg(long, env = "ENROLALL_BOOTSTRAP_ADMIN")]
    bootstrap_admin: Option<String>,

    /// Seeds a small demo catalog into an empty store
    #[arg(long, env = "ENROLALL_DEMO_DATA")]
    demo_data: bool,
}

/// Settings every report request reads.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ReportSettings {
    /// Language of the rendered pages.
    lang: String,
    /// Course ID of the site itself.
    site_course_id: i64,
}

/// Application state shared across handlers.
///
/// The persistence layer is wrapped in a Mutex to allow safe concurrent
/// access. The plugin registry is built once and only read afterwards.
#[derive(Clone)]
struct AppState {
    /// Catalog, operator and session storage.
    persistence: Arc<Mutex<Persistence>>,
    /// Enrolment plugins and the site-wide enabled set.
    registry: Arc<PluginRegistry>,
    /// Report settings from the command line.
    settings: Arc<ReportSettings>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// Maps an API error to its HTTP status.
const fn status_for(err: &ApiError) -> StatusCode {
    match err {
        ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
        ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
        ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
        ApiError::PluginLookupFailed { .. } | ApiError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// HTTP error wrapper for the JSON routes.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = status_for(&err);
        if status.is_server_error() {
            error!(error = %err, "Request failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// HTTP error wrapper for the report routes, rendered as an HTML page.
struct PageError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
    /// Language of the error page.
    lang: String,
}

impl PageError {
    fn new(status: StatusCode, message: String, lang: &str) -> Self {
        Self {
            status,
            message,
            lang: lang.to_string(),
        }
    }

    fn from_api(err: ApiError, lang: &str) -> Self {
        let status: StatusCode = status_for(&err);
        if status.is_server_error() {
            error!(error = %err, "Report request failed");
        }
        Self::new(status, err.to_string(), lang)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let body: Markup = views::error_page(&self.message, &self.lang);
        (self.status, body).into_response()
    }
}

/// Runs the report pipeline and renders the result.
async fn render_report(
    app_state: &AppState,
    viewer: &ViewerContext,
    request: &EnrolmentReportRequest,
) -> Result<Markup, PageError> {
    let lang: &str = &app_state.settings.lang;

    let mut persistence = app_state.persistence.lock().await;
    let page: ReportPage = enrolment_report(&mut persistence, &app_state.registry, viewer, request)
        .map_err(|err| PageError::from_api(err, lang))?;
    drop(persistence);

    Ok(views::report_page(&page, lang))
}

/// Handler for GET `/` endpoint.
async fn handle_home(AxumState(app_state): AxumState<AppState>) -> Markup {
    views::home_page(&app_state.settings.lang)
}

/// Handler for GET `/enrol/instancesAll` endpoint.
///
/// Shows the category index, or the course tables of the category named by
/// `id`.
async fn handle_enrolment_report(
    AxumState(app_state): AxumState<AppState>,
    SessionViewer(viewer): SessionViewer,
    RawQuery(query): RawQuery,
) -> Result<Markup, PageError> {
    let request: EnrolmentReportRequest = EnrolmentReportRequest::from_query(query.as_deref());
    info!(
        login_name = %viewer.actor().id,
        category = ?request.id,
        "Handling enrolment report request"
    );
    render_report(&app_state, &viewer, &request).await
}

/// Handler for GET `/enrol/instancesAll.php` endpoint.
///
/// Same as the report route, except that a request made from the site
/// course is sent home before the session is looked at.
async fn handle_legacy_enrolment_report(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Response, PageError> {
    let request: EnrolmentReportRequest = EnrolmentReportRequest::from_query(query.as_deref());
    if is_site_course_context(&request, app_state.settings.site_course_id) {
        info!(
            course = ?request.course,
            "Legacy report requested from the site course, redirecting home"
        );
        return Ok(Redirect::to("/").into_response());
    }

    let viewer: ViewerContext = session::authenticate(&headers, &app_state).await?;
    info!(
        login_name = %viewer.actor().id,
        category = ?request.id,
        "Handling legacy enrolment report request"
    );
    let body: Markup = render_report(&app_state, &viewer, &request).await?;
    Ok(body.into_response())
}

/// Handler for POST `/auth/login` endpoint.
///
/// Returns the session as JSON and stores the token in the session cookie.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, HttpError> {
    info!(login_name = %req.login_name, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = login(&mut persistence, &req)?;
    drop(persistence);

    let cookie: String = session::session_cookie(&response.session_token);
    Ok(([(SET_COOKIE, cookie)], Json(response)).into_response())
}

/// Handler for POST `/auth/logout` endpoint.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    let token: &str = session::session_token(&headers).map_err(|err| HttpError {
        status: StatusCode::UNAUTHORIZED,
        message: err.to_string(),
    })?;

    let mut persistence = app_state.persistence.lock().await;
    let response: LogoutResponse = logout(&mut persistence, token)?;
    drop(persistence);

    info!("Session logged out");
    let cookie: String = session::expired_session_cookie();
    Ok(([(SET_COOKIE, cookie)], Json(response)).into_response())
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_home))
        .route(views::REPORT_PATH, get(handle_enrolment_report))
        .route("/enrol/instancesAll.php", get(handle_legacy_enrolment_report))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route(pix::PIX_ROUTE, get(pix::handle_icon))
        .with_state(app_state)
}

/// Builds the plugin registry with the configured types enabled.
fn build_registry(enabled_plugins: &[String]) -> Result<PluginRegistry, enrolall::CoreError> {
    let mut registry: PluginRegistry = PluginRegistry::with_builtin_plugins()?;
    registry.set_enabled(enabled_plugins)?;
    Ok(registry)
}

/// Splits a `login:password` bootstrap credential.
fn parse_bootstrap_admin(value: &str) -> Result<(&str, &str), String> {
    value
        .split_once(':')
        .map(|(login_name, password)| (login_name.trim(), password))
        .filter(|(login_name, password)| !login_name.is_empty() && !password.is_empty())
        .ok_or_else(|| String::from("Bootstrap admin must be given as login:password"))
}

/// Checks that pages can be rendered in the requested language.
fn supported_lang(lang: &str) -> Result<String, String> {
    let lang: String = lang.trim().to_lowercase();
    if rust_i18n::available_locales!().contains(&lang.as_str()) {
        Ok(lang)
    } else {
        Err(format!("Unsupported language '{lang}'"))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing enrolall server");

    let lang: String = supported_lang(&args.lang)?;

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if let Some(credentials) = &args.bootstrap_admin {
        let (login_name, password) = parse_bootstrap_admin(credentials)?;
        bootstrap_admin(&mut persistence, login_name, password)?;
    }

    if args.demo_data {
        demo::seed_demo_catalog(&mut persistence)?;
    }

    let registry: PluginRegistry = build_registry(&args.enabled_plugins)?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        registry: Arc::new(registry),
        settings: Arc::new(ReportSettings {
            lang,
            site_course_id: args.site_course_id,
        }),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
