// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use enrolall_domain::{
    CategoryId, Course, CourseId, EnrolmentInstance, InstanceId, InstanceStatus,
};

use crate::tests::helpers::{
    FakeSource, TEST_SESSKEY, TestViewer, create_test_catalog, create_test_registry,
};
use crate::{
    ActionFragment, Align, Capability, CoreError, GroupedReport, InstanceName, PluginRegistry,
    ReportTable, aggregate_course, group_courses, instance_management_url, toggle_control,
};

const HIDE_ICON: ActionFragment = ActionFragment::Icon {
    pix: "t/hide",
    label: "disable",
};
const SHOW_ICON: ActionFragment = ActionFragment::Icon {
    pix: "t/show",
    label: "enable",
};

fn course(source: &FakeSource, id: i64) -> Course {
    source
        .courses
        .iter()
        .find(|course| course.id == CourseId::new(id))
        .cloned()
        .unwrap()
}

#[test]
fn test_toggle_enabled_instance_offers_hide() {
    assert_eq!(
        toggle_control(true, true, InstanceStatus::Enabled),
        (Some(HIDE_ICON), false)
    );
}

#[test]
fn test_toggle_disabled_instance_offers_show_and_dims() {
    assert_eq!(
        toggle_control(true, true, InstanceStatus::Disabled),
        (Some(SHOW_ICON), true)
    );
}

#[test]
fn test_toggle_plugin_specific_state_is_bare_image() {
    assert_eq!(
        toggle_control(true, true, InstanceStatus::Other(3)),
        (Some(ActionFragment::Image { pix: "t/show" }), false)
    );
}

#[test]
fn test_toggle_absent_when_plugin_inactive_or_not_togglable() {
    for status in [
        InstanceStatus::Enabled,
        InstanceStatus::Disabled,
        InstanceStatus::Other(9),
    ] {
        assert_eq!(toggle_control(false, true, status), (None, false));
        assert_eq!(toggle_control(true, false, status), (None, false));
        assert_eq!(toggle_control(false, false, status), (None, false));
    }
}

#[test]
fn test_management_url_carries_sesskey_and_course() {
    assert_eq!(
        instance_management_url(CourseId::new(42), "k3y"),
        "/enrol/instances?sesskey=k3y&id=42"
    );
}

#[test]
fn test_table_has_one_row_per_instance_in_order() {
    let mut source: FakeSource = create_test_catalog();
    let registry: PluginRegistry = create_test_registry();
    let chemistry: Course = course(&source, 3);

    let table: ReportTable = aggregate_course(
        &mut source,
        &chemistry,
        &registry,
        &TestViewer::reviewer_of(&[3]),
        TEST_SESSKEY,
    )
    .unwrap();

    assert_eq!(table.course, CourseId::new(3));
    let instances: Vec<i64> = table.rows.iter().map(|row| row.instance.value()).collect();
    assert_eq!(instances, vec![30, 31, 32]);
    let users: Vec<u64> = table.rows.iter().map(|row| row.users).collect();
    assert_eq!(users, vec![5, 0, 40]);
}

#[test]
fn test_rows_follow_toggle_table() {
    let mut source: FakeSource = create_test_catalog();
    let registry: PluginRegistry = create_test_registry();
    let chemistry: Course = course(&source, 3);

    let table: ReportTable = aggregate_course(
        &mut source,
        &chemistry,
        &registry,
        &TestViewer::reviewer_of(&[3]),
        TEST_SESSKEY,
    )
    .unwrap();

    assert_eq!(table.rows[0].actions, vec![HIDE_ICON]);
    assert!(!table.rows[0].dimmed);
    assert_eq!(table.rows[1].actions, vec![SHOW_ICON]);
    assert!(table.rows[1].dimmed);
    assert_eq!(
        table.rows[2].actions,
        vec![ActionFragment::Image { pix: "t/show" }]
    );
    assert!(!table.rows[2].dimmed);
}

#[test]
fn test_every_row_links_to_instance_management() {
    let mut source: FakeSource = create_test_catalog();
    let registry: PluginRegistry = create_test_registry();
    let physics: Course = course(&source, 1);

    let table: ReportTable = aggregate_course(
        &mut source,
        &physics,
        &registry,
        &TestViewer::admin(),
        TEST_SESSKEY,
    )
    .unwrap();

    for row in &table.rows {
        assert_eq!(row.edit_link, "/enrol/instances?sesskey=abc123&id=1");
    }
}

#[test]
fn test_plugin_actions_require_config_rights() {
    let mut source: FakeSource = create_test_catalog();
    let registry: PluginRegistry = create_test_registry();
    let physics: Course = course(&source, 1);

    let reviewer: ReportTable = aggregate_course(
        &mut source,
        &physics,
        &registry,
        &TestViewer::reviewer_of(&[1]),
        TEST_SESSKEY,
    )
    .unwrap();
    assert_eq!(reviewer.rows[0].actions, vec![HIDE_ICON]);

    let configurer: ReportTable = aggregate_course(
        &mut source,
        &physics,
        &registry,
        &TestViewer::with_grants(&[(1, Capability::EnrolReview), (1, Capability::EnrolConfig)]),
        TEST_SESSKEY,
    )
    .unwrap();
    assert_eq!(
        configurer.rows[0].actions,
        vec![
            HIDE_ICON,
            ActionFragment::Link {
                href: String::from("/enrol/manual/manage?enrolid=10"),
                pix: "t/enrolusers",
                label: "action.enrolusers",
            },
        ]
    );
}

#[test]
fn test_inactive_plugin_gets_no_controls_even_for_admin() {
    let mut source: FakeSource = create_test_catalog();
    let mut registry: PluginRegistry = PluginRegistry::with_builtin_plugins().unwrap();
    registry.set_enabled(["self"]).unwrap();
    let physics: Course = course(&source, 1);

    let table: ReportTable = aggregate_course(
        &mut source,
        &physics,
        &registry,
        &TestViewer::admin(),
        TEST_SESSKEY,
    )
    .unwrap();

    // manual is installed but not enabled
    assert!(table.rows[0].actions.is_empty());
    assert_eq!(table.rows[0].users, 12);
    // self is enabled and disabled on this course
    assert_eq!(table.rows[1].actions[0], SHOW_ICON);
    assert!(table.rows[1].dimmed);
}

#[test]
fn test_unknown_plugin_type_fails() {
    let mut source: FakeSource = FakeSource::new();
    let course_id: CourseId = source.add_course(1, "Legacy", 2);
    source.add_instance(77, course_id, "ldap", InstanceStatus::Enabled, 1);
    let registry: PluginRegistry = create_test_registry();
    let legacy: Course = course(&source, 1);

    let result: Result<ReportTable, CoreError> = aggregate_course(
        &mut source,
        &legacy,
        &registry,
        &TestViewer::admin(),
        TEST_SESSKEY,
    );

    assert_eq!(
        result,
        Err(CoreError::UnknownPlugin {
            enrol_type: String::from("ldap"),
            instance: Some(InstanceId::new(77)),
        })
    );
}

#[test]
fn test_custom_instance_name_is_used() {
    let mut source: FakeSource = FakeSource::new();
    let course_id: CourseId = source.add_course(1, "Art", 2);
    source.add_instance_record(
        EnrolmentInstance::new(InstanceId::new(5), course_id, "self", InstanceStatus::Enabled)
            .with_name("Studio key"),
    );
    let registry: PluginRegistry = create_test_registry();
    let art: Course = course(&source, 1);

    let table: ReportTable = aggregate_course(
        &mut source,
        &art,
        &registry,
        &TestViewer::admin(),
        TEST_SESSKEY,
    )
    .unwrap();

    assert_eq!(table.rows[0].name, InstanceName::Custom(String::from("Studio key")));
    assert_eq!(table.rows[0].users, 0);
}

#[test]
fn test_course_without_instances_has_empty_table() {
    let mut source: FakeSource = FakeSource::new();
    source.add_course(1, "Empty", 2);
    let registry: PluginRegistry = create_test_registry();
    let empty: Course = course(&source, 1);

    let table: ReportTable = aggregate_course(
        &mut source,
        &empty,
        &registry,
        &TestViewer::admin(),
        TEST_SESSKEY,
    )
    .unwrap();

    assert!(table.rows.is_empty());
    assert_eq!(table.columns()[0].align, Align::Left);
    assert!(table.columns()[1..].iter().all(|col| col.align == Align::Center));
}

#[test]
fn test_grouping_keeps_course_order_per_category() {
    let mut source: FakeSource = create_test_catalog();
    let registry: PluginRegistry = create_test_registry();
    let courses: Vec<Course> = source.courses.clone();

    let grouped: GroupedReport = group_courses(
        &mut source,
        &courses,
        &registry,
        &TestViewer::admin(),
        TEST_SESSKEY,
    )
    .unwrap();

    let categories: Vec<i64> = grouped.categories().map(CategoryId::value).collect();
    assert_eq!(categories, vec![5, 7, 0]);
    let sciences: Vec<&str> = grouped
        .courses_in(CategoryId::new(5))
        .map(|(name, _)| name)
        .collect();
    assert_eq!(sciences, vec!["Physics", "Chemistry", "Biology"]);
}

#[test]
fn test_duplicate_course_name_overwrites_in_place() {
    let mut source: FakeSource = FakeSource::new();
    let first: CourseId = source.add_course(1, "Statistics", 3);
    source.add_course(2, "Probability", 3);
    let second: CourseId = source.add_course(3, "Statistics", 3);
    source.add_instance(10, first, "manual", InstanceStatus::Enabled, 1);
    source.add_instance(30, second, "manual", InstanceStatus::Enabled, 9);
    let registry: PluginRegistry = create_test_registry();
    let courses: Vec<Course> = source.courses.clone();

    let grouped: GroupedReport = group_courses(
        &mut source,
        &courses,
        &registry,
        &TestViewer::admin(),
        TEST_SESSKEY,
    )
    .unwrap();

    let entries: Vec<(&str, i64)> = grouped
        .courses_in(CategoryId::new(3))
        .map(|(name, table)| (name, table.course.value()))
        .collect();
    assert_eq!(entries, vec![("Statistics", 3), ("Probability", 2)]);
}

#[test]
fn test_grouping_is_deterministic() {
    let registry: PluginRegistry = create_test_registry();
    let viewer: TestViewer = TestViewer::admin();

    let mut first_source: FakeSource = create_test_catalog();
    let first_courses: Vec<Course> = first_source.courses.clone();
    let first: GroupedReport = group_courses(
        &mut first_source,
        &first_courses,
        &registry,
        &viewer,
        TEST_SESSKEY,
    )
    .unwrap();

    let mut second_source: FakeSource = create_test_catalog();
    let second_courses: Vec<Course> = second_source.courses.clone();
    let second: GroupedReport = group_courses(
        &mut second_source,
        &second_courses,
        &registry,
        &viewer,
        TEST_SESSKEY,
    )
    .unwrap();

    assert_eq!(first, second);
}
