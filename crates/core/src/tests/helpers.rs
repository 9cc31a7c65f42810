// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory collaborators for report tests.

use std::collections::{HashMap, HashSet};

use enrolall_domain::{
    Category, CategoryId, Course, CourseId, EnrolmentInstance, InstanceId, InstanceStatus,
};

use crate::{Capability, CoreError, PermissionChecker, PluginRegistry, ReportSource};

pub const TEST_SESSKEY: &str = "abc123";

/// A report source backed by plain collections.
#[derive(Debug, Default)]
pub struct FakeSource {
    pub courses: Vec<Course>,
    pub categories: HashMap<CategoryId, Category>,
    pub instances: HashMap<CourseId, Vec<EnrolmentInstance>>,
    pub user_counts: HashMap<InstanceId, u64>,
    pub category_lookups: usize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_category(&mut self, id: i64, name: &str) {
        self.categories
            .insert(CategoryId::new(id), Category::new(CategoryId::new(id), name));
    }

    pub fn add_course(&mut self, id: i64, fullname: &str, category: i64) -> CourseId {
        let course_id: CourseId = CourseId::new(id);
        self.courses.push(Course::new(
            course_id,
            fullname,
            &format!("C{id}"),
            CategoryId::new(category),
        ));
        course_id
    }

    pub fn add_instance(
        &mut self,
        id: i64,
        course: CourseId,
        enrol_type: &str,
        status: InstanceStatus,
        users: u64,
    ) -> InstanceId {
        let instance_id: InstanceId = InstanceId::new(id);
        self.add_instance_record(EnrolmentInstance::new(instance_id, course, enrol_type, status));
        self.user_counts.insert(instance_id, users);
        instance_id
    }

    pub fn add_instance_record(&mut self, instance: EnrolmentInstance) {
        self.instances
            .entry(instance.course)
            .or_default()
            .push(instance);
    }
}

impl ReportSource for FakeSource {
    fn list_courses(&mut self) -> Result<Vec<Course>, CoreError> {
        Ok(self.courses.clone())
    }

    fn enrolment_instances(
        &mut self,
        course: CourseId,
    ) -> Result<Vec<EnrolmentInstance>, CoreError> {
        Ok(self.instances.get(&course).cloned().unwrap_or_default())
    }

    fn count_user_enrolments(&mut self, instance: InstanceId) -> Result<u64, CoreError> {
        Ok(self.user_counts.get(&instance).copied().unwrap_or(0))
    }

    fn category(&mut self, id: CategoryId) -> Result<Option<Category>, CoreError> {
        self.category_lookups += 1;
        Ok(self.categories.get(&id).cloned())
    }
}

/// A viewer described by explicit grants, or by blanket access.
#[derive(Debug, Default)]
pub struct TestViewer {
    pub everything: bool,
    pub grants: HashSet<(CourseId, Capability)>,
}

impl TestViewer {
    pub fn admin() -> Self {
        Self {
            everything: true,
            grants: HashSet::new(),
        }
    }

    pub fn with_grants(grants: &[(i64, Capability)]) -> Self {
        Self {
            everything: false,
            grants: grants
                .iter()
                .map(|(course, cap)| (CourseId::new(*course), *cap))
                .collect(),
        }
    }

    /// Review rights on every listed course, nothing else.
    pub fn reviewer_of(courses: &[i64]) -> Self {
        let grants: Vec<(i64, Capability)> = courses
            .iter()
            .map(|course| (*course, Capability::EnrolReview))
            .collect();
        Self::with_grants(&grants)
    }
}

impl PermissionChecker for TestViewer {
    fn has_capability(&self, course: CourseId, capability: Capability) -> bool {
        self.everything || self.grants.contains(&(course, capability))
    }
}

pub fn create_test_registry() -> PluginRegistry {
    let mut registry: PluginRegistry = PluginRegistry::with_builtin_plugins().unwrap();
    registry
        .set_enabled(["manual", "self", "guest", "cohort", "meta"])
        .unwrap();
    registry
}

/// Three courses in category 5, one in category 7, one in the root.
pub fn create_test_catalog() -> FakeSource {
    let mut source: FakeSource = FakeSource::new();
    source.add_category(5, "Sciences");
    source.add_category(7, "Languages");

    let physics: CourseId = source.add_course(1, "Physics", 5);
    let french: CourseId = source.add_course(2, "French", 7);
    let chemistry: CourseId = source.add_course(3, "Chemistry", 5);
    let biology: CourseId = source.add_course(4, "Biology", 5);
    let site: CourseId = source.add_course(5, "Front page", 0);

    source.add_instance(10, physics, "manual", InstanceStatus::Enabled, 12);
    source.add_instance(11, physics, "self", InstanceStatus::Disabled, 3);
    source.add_instance(20, french, "manual", InstanceStatus::Enabled, 8);
    source.add_instance(30, chemistry, "manual", InstanceStatus::Enabled, 5);
    source.add_instance(31, chemistry, "guest", InstanceStatus::Disabled, 0);
    source.add_instance(32, chemistry, "cohort", InstanceStatus::Other(5), 40);
    source.add_instance(40, biology, "manual", InstanceStatus::Enabled, 1);
    source.add_instance(50, site, "guest", InstanceStatus::Enabled, 0);
    source
}
