// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The viewer context passed through the report pipeline.

use std::collections::HashSet;

use enrolall::{Capability, PermissionChecker};
use enrolall_domain::CourseId;
use enrolall_persistence::{CapabilityGrantData, Persistence};
use tracing::debug;

use crate::auth::{AuthenticatedActor, Role, ValidatedSession};
use crate::error::ApiError;

/// Who is looking at the report, and what they may do.
///
/// Grants are loaded once when the context is built; capability checks
/// never touch storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerContext {
    actor: AuthenticatedActor,
    sesskey: String,
    grants: HashSet<(CourseId, Capability)>,
}

impl ViewerContext {
    /// Creates a context from an actor and its grants.
    #[must_use]
    pub fn new<I>(actor: AuthenticatedActor, sesskey: &str, grants: I) -> Self
    where
        I: IntoIterator<Item = (CourseId, Capability)>,
    {
        Self {
            actor,
            sesskey: sesskey.to_string(),
            grants: grants.into_iter().collect(),
        }
    }

    /// Builds the context for a validated session.
    ///
    /// Admins need no grants. Grants naming an unknown capability are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the grants cannot be loaded.
    pub fn load(persistence: &mut Persistence, session: &ValidatedSession) -> Result<Self, ApiError> {
        if session.actor.role == Role::Admin {
            return Ok(Self::new(session.actor.clone(), &session.sesskey, []));
        }

        let stored: Vec<CapabilityGrantData> =
            persistence.list_capability_grants(session.actor.operator_id)?;
        let grants: Vec<(CourseId, Capability)> = stored
            .iter()
            .filter_map(|grant| {
                let capability: Option<Capability> = Capability::from_name(&grant.capability);
                if capability.is_none() {
                    debug!(capability = %grant.capability, "Ignoring unknown capability grant");
                }
                capability.map(|cap| (CourseId::new(grant.course_id), cap))
            })
            .collect();

        debug!(
            login_name = %session.actor.id,
            grants = grants.len(),
            "Loaded viewer grants"
        );
        Ok(Self::new(session.actor.clone(), &session.sesskey, grants))
    }

    /// The authenticated operator.
    #[must_use]
    pub const fn actor(&self) -> &AuthenticatedActor {
        &self.actor
    }

    /// The anti-forgery key of the viewer's session.
    #[must_use]
    pub fn sesskey(&self) -> &str {
        &self.sesskey
    }
}

impl PermissionChecker for ViewerContext {
    fn has_capability(&self, course: CourseId, capability: Capability) -> bool {
        match self.actor.role {
            Role::Admin => true,
            Role::Staff => self.grants.contains(&(course, capability)),
        }
    }
}
