// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator authentication and sessions.

use enrolall_persistence::{OperatorData, Persistence, SessionData};
use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// Operator roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Site administrator: holds every capability on every course.
    Admin,
    /// Holds only the capabilities granted to it per course.
    Staff,
}

impl Role {
    /// Parses a stored role name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Admin" => Some(Self::Admin),
            "Staff" => Some(Self::Staff),
            _ => None,
        }
    }

    /// The stored role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Staff => "Staff",
        }
    }
}

/// An authenticated operator with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The operator's login name.
    pub id: String,
    /// The operator's database identifier.
    pub operator_id: i64,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: String, operator_id: i64, role: Role) -> Self {
        Self {
            id,
            operator_id,
            role,
        }
    }

    /// Builds the actor for a stored operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored role is not recognised.
    fn from_operator(operator: &OperatorData) -> Result<Self, AuthError> {
        let role: Role =
            Role::from_name(&operator.role).ok_or_else(|| AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {}", operator.role),
            })?;
        Ok(Self::new(
            operator.login_name.clone(),
            operator.operator_id,
            role,
        ))
    }
}

/// A session created by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    /// The bearer token for the session.
    pub session_token: String,
    /// The anti-forgery key for the session.
    pub sesskey: String,
    /// Expiry timestamp (ISO 8601).
    pub expires_at: String,
    /// The logged-in actor.
    pub actor: AuthenticatedActor,
    /// The stored operator.
    pub operator: OperatorData,
}

/// A session that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSession {
    /// The session owner.
    pub actor: AuthenticatedActor,
    /// The stored operator.
    pub operator: OperatorData,
    /// The anti-forgery key for the session.
    pub sesskey: String,
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Checks credentials and creates a session.
    ///
    /// Unknown login names and wrong passwords are reported identically.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are wrong, the operator is
    /// disabled, or the session cannot be stored.
    pub fn login(
        persistence: &mut Persistence,
        login_name: &str,
        password: &str,
    ) -> Result<NewSession, AuthError> {
        let rejected = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid login name or password"),
        };

        let operator: OperatorData = persistence
            .get_operator_by_login(login_name)?
            .ok_or_else(rejected)?;

        if !Persistence::verify_password(password, &operator.password_hash)? {
            warn!(login_name = %operator.login_name, "Rejected login: wrong password");
            return Err(rejected());
        }

        if operator.is_disabled {
            warn!(login_name = %operator.login_name, "Rejected login: operator disabled");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Operator is disabled"),
            });
        }

        let actor: AuthenticatedActor = AuthenticatedActor::from_operator(&operator)?;

        let session_token: String = Self::generate_session_token();
        let sesskey: String = Self::generate_sesskey();
        let expires_at: String = (OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION)
            .format(&Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format expiration time: {e}"),
            })?;

        persistence.create_session(&session_token, &sesskey, operator.operator_id, &expires_at)?;
        persistence.update_last_login(operator.operator_id)?;

        info!(login_name = %operator.login_name, role = actor.role.as_str(), "Operator logged in");

        Ok(NewSession {
            session_token,
            sesskey,
            expires_at,
            actor,
            operator,
        })
    }

    /// Validates a session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired, or if its
    /// operator is missing or disabled.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<ValidatedSession, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)?
            .ok_or_else(|| AuthError::InvalidSession {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(&session.expires_at, &Iso8601::DEFAULT)
            .map_err(|e| AuthError::InvalidSession {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::InvalidSession {
                reason: String::from("Session expired"),
            });
        }

        let operator: OperatorData = persistence
            .get_operator_by_id(session.operator_id)?
            .ok_or_else(|| AuthError::InvalidSession {
                reason: String::from("Operator not found"),
            })?;

        if operator.is_disabled {
            return Err(AuthError::InvalidSession {
                reason: String::from("Operator is disabled"),
            });
        }

        let actor: AuthenticatedActor = AuthenticatedActor::from_operator(&operator)?;
        persistence.update_session_activity(session.session_id)?;

        debug!(login_name = %actor.id, "Session validated");

        Ok(ValidatedSession {
            actor,
            operator,
            sesskey: session.sesskey,
        })
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence.delete_session(session_token)?;
        Ok(())
    }

    /// 256 random bits, hex encoded.
    fn generate_session_token() -> String {
        (0..4)
            .map(|_| format!("{:016x}", rand::random::<u64>()))
            .collect()
    }

    /// 64 random bits, hex encoded.
    fn generate_sesskey() -> String {
        format!("{:016x}", rand::random::<u64>())
    }
}
