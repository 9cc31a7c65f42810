// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;
mod operator_tests;

use enrolall_domain::{
    Category, CategoryId, Course, CourseId, EnrolmentInstance, InstanceId, InstanceStatus,
};

use crate::Persistence;

/// Opens an empty in-memory database.
pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database should initialize")
}

/// Stores one category with a single course.
///
/// Category 5 "Sciences" holds course 1 "Physics" with a manual instance
/// (id 10, two users) and a disabled self instance (id 11, no users).
pub fn seed_sciences(persistence: &mut Persistence) {
    persistence
        .create_category(&Category::new(CategoryId::new(5), "Sciences"))
        .unwrap();
    persistence
        .create_course(&Course::new(
            CourseId::new(1),
            "Physics",
            "PHYS",
            CategoryId::new(5),
        ))
        .unwrap();
    persistence
        .create_enrolment_instance(&EnrolmentInstance::new(
            InstanceId::new(10),
            CourseId::new(1),
            "manual",
            InstanceStatus::Enabled,
        ))
        .unwrap();
    persistence
        .create_enrolment_instance(
            &EnrolmentInstance::new(
                InstanceId::new(11),
                CourseId::new(1),
                "self",
                InstanceStatus::Disabled,
            )
            .with_name("Walk-in"),
        )
        .unwrap();
    persistence.enrol_user(InstanceId::new(10), "alice").unwrap();
    persistence.enrol_user(InstanceId::new(10), "bob").unwrap();
}
