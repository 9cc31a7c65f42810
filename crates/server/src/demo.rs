// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Demo catalog for trying the report against an empty store.

use enrolall_domain::{
    Category, CategoryId, Course, CourseId, EnrolmentInstance, InstanceId, InstanceStatus,
};
use enrolall_persistence::{Persistence, PersistenceError};
use tracing::info;

/// Plugin-specific status code used by the demo's paused instance.
const PAUSED_STATUS: i32 = 2;

fn demo_categories() -> Vec<Category> {
    vec![
        Category::new(CategoryId::new(2), "Sciences"),
        Category::new(CategoryId::new(3), "Humanities"),
    ]
}

fn demo_courses() -> Vec<Course> {
    vec![
        Course::new(CourseId::new(1), "Enrolall site", "SITE", CategoryId::ROOT),
        Course::new(CourseId::new(2), "Physics 101", "PHYS101", CategoryId::new(2)),
        Course::new(CourseId::new(3), "Organic Chemistry", "CHEM201", CategoryId::new(2)),
        Course::new(CourseId::new(4), "Medieval History", "HIST110", CategoryId::new(3)),
    ]
}

fn demo_instances() -> Vec<EnrolmentInstance> {
    let physics: CourseId = CourseId::new(2);
    let chemistry: CourseId = CourseId::new(3);
    let history: CourseId = CourseId::new(4);

    vec![
        EnrolmentInstance::new(InstanceId::new(1), physics, "manual", InstanceStatus::Enabled),
        EnrolmentInstance::new(InstanceId::new(2), physics, "self", InstanceStatus::Disabled)
            .with_name("Open enrolment"),
        EnrolmentInstance::new(InstanceId::new(3), physics, "guest", InstanceStatus::Enabled),
        EnrolmentInstance::new(InstanceId::new(4), chemistry, "manual", InstanceStatus::Enabled),
        EnrolmentInstance::new(InstanceId::new(5), chemistry, "cohort", InstanceStatus::Enabled)
            .with_custom_text("First year students"),
        EnrolmentInstance::new(InstanceId::new(6), history, "manual", InstanceStatus::Enabled),
        EnrolmentInstance::new(InstanceId::new(7), history, "meta", InstanceStatus::Enabled)
            .with_custom_text("Physics 101"),
        EnrolmentInstance::new(
            InstanceId::new(8),
            history,
            "self",
            InstanceStatus::from_code(PAUSED_STATUS),
        ),
    ]
}

const DEMO_ENROLMENTS: [(i64, &str); 6] = [
    (1, "ada"),
    (1, "marie"),
    (1, "niels"),
    (4, "rosalind"),
    (5, "dorothy"),
    (6, "christine"),
];

/// Seeds the demo catalog unless the store already holds courses.
///
/// # Returns
///
/// `true` if the catalog was written.
///
/// # Errors
///
/// Returns an error if any record cannot be stored.
pub fn seed_demo_catalog(persistence: &mut Persistence) -> Result<bool, PersistenceError> {
    if !persistence.list_courses()?.is_empty() {
        info!("Store already holds courses, skipping demo catalog");
        return Ok(false);
    }

    for category in demo_categories() {
        persistence.create_category(&category)?;
    }
    for course in demo_courses() {
        persistence.create_course(&course)?;
    }
    for instance in demo_instances() {
        persistence.create_enrolment_instance(&instance)?;
    }
    for (instance, user_name) in DEMO_ENROLMENTS {
        persistence.enrol_user(InstanceId::new(instance), user_name)?;
    }

    info!(
        courses = demo_courses().len(),
        instances = demo_instances().len(),
        "Seeded demo catalog"
    );
    Ok(true)
}
