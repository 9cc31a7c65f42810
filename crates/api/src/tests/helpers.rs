// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use enrolall::PluginRegistry;
use enrolall_domain::{
    Category, CategoryId, Course, CourseId, EnrolmentInstance, InstanceId, InstanceStatus,
};
use enrolall_persistence::Persistence;

use crate::{AuthenticationService, NewSession, ViewerContext, authenticate_viewer};

pub const ADMIN_LOGIN: &str = "admin";
pub const STAFF_LOGIN: &str = "staff";
pub const PASSWORD: &str = "correct horse battery";

/// A store with two categories, three courses and two operators.
///
/// - category 5 "Sciences": course 1 "Physics", course 3 "Chemistry"
/// - category 7 "Languages": course 2 "French"
/// - `admin` is an Admin; `staff` may review courses 1 and 3 and configure
///   course 1
pub fn create_test_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    for (id, name) in [(5, "Sciences"), (7, "Languages")] {
        persistence
            .create_category(&Category::new(CategoryId::new(id), name))
            .unwrap();
    }
    for (id, name, short, category) in [
        (1, "Physics", "PHYS", 5),
        (2, "French", "FR", 7),
        (3, "Chemistry", "CHEM", 5),
    ] {
        persistence
            .create_course(&Course::new(
                CourseId::new(id),
                name,
                short,
                CategoryId::new(category),
            ))
            .unwrap();
    }
    for (id, course, enrol_type, status) in [
        (10, 1, "manual", InstanceStatus::Enabled),
        (11, 1, "self", InstanceStatus::Disabled),
        (20, 2, "manual", InstanceStatus::Enabled),
        (30, 3, "guest", InstanceStatus::Enabled),
    ] {
        persistence
            .create_enrolment_instance(&EnrolmentInstance::new(
                InstanceId::new(id),
                CourseId::new(course),
                enrol_type,
                status,
            ))
            .unwrap();
    }
    persistence.enrol_user(InstanceId::new(10), "alice").unwrap();

    persistence
        .create_operator(ADMIN_LOGIN, "Site Admin", PASSWORD, "Admin")
        .unwrap();
    let staff_id: i64 = persistence
        .create_operator(STAFF_LOGIN, "Course Staff", PASSWORD, "Staff")
        .unwrap();
    for (course, capability) in [
        (1, "course:enrolreview"),
        (3, "course:enrolreview"),
        (1, "course:enrolconfig"),
    ] {
        persistence
            .grant_capability(staff_id, CourseId::new(course), capability)
            .unwrap();
    }

    persistence
}

pub fn create_test_registry() -> PluginRegistry {
    let mut registry: PluginRegistry = PluginRegistry::with_builtin_plugins().unwrap();
    registry
        .set_enabled(["manual", "self", "guest", "cohort"])
        .unwrap();
    registry
}

/// Logs in and returns the session and the viewer built from it.
pub fn login_viewer(persistence: &mut Persistence, login_name: &str) -> (NewSession, ViewerContext) {
    let session: NewSession = AuthenticationService::login(persistence, login_name, PASSWORD).unwrap();
    let viewer: ViewerContext = authenticate_viewer(persistence, &session.session_token).unwrap();
    (session, viewer)
}
