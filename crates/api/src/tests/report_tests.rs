// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use enrolall::{ActionFragment, PluginRegistry, ReportPage, ReportTable};
use enrolall_domain::{CategoryId, Course, CourseId};
use enrolall_persistence::Persistence;

use super::helpers::{
    ADMIN_LOGIN, STAFF_LOGIN, create_test_persistence, create_test_registry, login_viewer,
};
use crate::{
    ApiError, EnrolmentReportRequest, bootstrap_admin, enrolment_report, is_site_course_context,
};

fn request(id: Option<&str>) -> EnrolmentReportRequest {
    EnrolmentReportRequest {
        id: id.map(str::to_string),
        course: None,
    }
}

#[test]
fn test_admin_index_lists_categories() {
    let mut persistence: Persistence = create_test_persistence();
    let registry: PluginRegistry = create_test_registry();
    let (_, viewer) = login_viewer(&mut persistence, ADMIN_LOGIN);

    let page: ReportPage =
        enrolment_report(&mut persistence, &registry, &viewer, &request(None)).unwrap();

    let ReportPage::Index { categories } = page else {
        panic!("expected the category index");
    };
    let ids: Vec<i64> = categories.iter().map(|c| c.id.value()).collect();
    assert_eq!(ids, vec![5, 7]);
}

#[test]
fn test_malformed_id_shows_index() {
    let mut persistence: Persistence = create_test_persistence();
    let registry: PluginRegistry = create_test_registry();
    let (_, viewer) = login_viewer(&mut persistence, ADMIN_LOGIN);

    for raw in ["", "abc", "0", "-5"] {
        let page: ReportPage =
            enrolment_report(&mut persistence, &registry, &viewer, &request(Some(raw))).unwrap();
        assert!(
            matches!(page, ReportPage::Index { .. }),
            "id {raw:?} should show the index"
        );
    }
}

#[test]
fn test_drill_down_embeds_viewer_sesskey() {
    let mut persistence: Persistence = create_test_persistence();
    let registry: PluginRegistry = create_test_registry();
    let (session, viewer) = login_viewer(&mut persistence, ADMIN_LOGIN);

    let page: ReportPage =
        enrolment_report(&mut persistence, &registry, &viewer, &request(Some("5"))).unwrap();

    let ReportPage::DrillDown { category, courses } = page else {
        panic!("expected a drill-down");
    };
    assert_eq!(category.id, CategoryId::new(5));
    let names: Vec<&str> = courses.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["Physics", "Chemistry"]);

    let physics: &ReportTable = &courses[0].1;
    assert_eq!(physics.rows.len(), 2);
    assert_eq!(physics.rows[0].users, 1);
    assert!(
        physics.rows[0]
            .edit_link
            .contains(&format!("sesskey={}", session.sesskey))
    );
}

#[test]
fn test_staff_cannot_see_unfiltered_index() {
    let mut persistence: Persistence = create_test_persistence();
    let registry: PluginRegistry = create_test_registry();
    let (_, viewer) = login_viewer(&mut persistence, STAFF_LOGIN);

    let result: Result<ReportPage, ApiError> =
        enrolment_report(&mut persistence, &registry, &viewer, &request(None));

    assert_eq!(
        result.unwrap_err(),
        ApiError::Unauthorized {
            action: String::from("view enrolment methods of course 2"),
            required_capability: String::from("course:enrolreview"),
        }
    );
}

#[test]
fn test_staff_can_drill_into_reviewable_category() {
    let mut persistence: Persistence = create_test_persistence();
    let registry: PluginRegistry = create_test_registry();
    let (_, viewer) = login_viewer(&mut persistence, STAFF_LOGIN);

    let page: ReportPage =
        enrolment_report(&mut persistence, &registry, &viewer, &request(Some("5"))).unwrap();
    let ReportPage::DrillDown { courses, .. } = page else {
        panic!("expected a drill-down");
    };

    // Staff may configure Physics but not Chemistry.
    let physics_manual: &[ActionFragment] = &courses[0].1.rows[0].actions;
    assert!(
        physics_manual
            .iter()
            .any(|a| matches!(a, ActionFragment::Link { pix: "t/enrolusers", .. }))
    );
    let chemistry_guest: &[ActionFragment] = &courses[1].1.rows[0].actions;
    assert!(
        chemistry_guest
            .iter()
            .all(|a| !matches!(a, ActionFragment::Link { .. }))
    );
}

#[test]
fn test_staff_forbidden_category() {
    let mut persistence: Persistence = create_test_persistence();
    let registry: PluginRegistry = create_test_registry();
    let (_, viewer) = login_viewer(&mut persistence, STAFF_LOGIN);

    assert!(matches!(
        enrolment_report(&mut persistence, &registry, &viewer, &request(Some("7"))),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_missing_category_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();
    let registry: PluginRegistry = create_test_registry();
    let (_, viewer) = login_viewer(&mut persistence, ADMIN_LOGIN);

    let result: Result<ReportPage, ApiError> =
        enrolment_report(&mut persistence, &registry, &viewer, &request(Some("999")));
    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Category"
    ));
}

#[test]
fn test_unregistered_plugin_is_lookup_failure() {
    let mut persistence: Persistence = create_test_persistence();
    let mut registry: PluginRegistry = PluginRegistry::new();
    registry.set_enabled(Vec::<String>::new()).unwrap();
    let (_, viewer) = login_viewer(&mut persistence, ADMIN_LOGIN);

    let result: Result<ReportPage, ApiError> =
        enrolment_report(&mut persistence, &registry, &viewer, &request(None));
    assert!(matches!(
        result,
        Err(ApiError::PluginLookupFailed { ref enrol_type, .. }) if enrol_type == "manual"
    ));
}

#[test]
fn test_site_course_context() {
    let legacy = |course: Option<&str>| EnrolmentReportRequest {
        id: None,
        course: course.map(str::to_string),
    };
    assert!(is_site_course_context(&legacy(Some("1")), 1));
    assert!(is_site_course_context(&legacy(Some(" 1 ")), 1));
    assert!(!is_site_course_context(&legacy(Some("2")), 1));
    assert!(!is_site_course_context(&legacy(Some("x")), 1));
    assert!(!is_site_course_context(&legacy(None), 1));
}

#[test]
fn test_bootstrap_admin_only_on_empty_store() {
    let mut empty: Persistence = Persistence::new_in_memory().unwrap();
    let created: Option<i64> = bootstrap_admin(&mut empty, "root", "pw").unwrap();
    assert!(created.is_some());
    assert_eq!(bootstrap_admin(&mut empty, "other", "pw").unwrap(), None);
    assert_eq!(empty.count_operators().unwrap(), 1);
}

#[test]
fn test_bootstrap_admin_rejects_blank_credentials() {
    let mut empty: Persistence = Persistence::new_in_memory().unwrap();
    assert!(matches!(
        bootstrap_admin(&mut empty, " ", "pw"),
        Err(ApiError::InvalidInput { .. })
    ));
    assert!(matches!(
        bootstrap_admin(&mut empty, "root", ""),
        Err(ApiError::InvalidInput { .. })
    ));
}

#[test]
fn test_report_request_fields_are_optional() {
    let empty: EnrolmentReportRequest = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, EnrolmentReportRequest::default());

    let full: EnrolmentReportRequest =
        serde_json::from_str(r#"{"id":"5","course":"1"}"#).unwrap();
    assert_eq!(full.id.as_deref(), Some("5"));
    assert_eq!(full.course.as_deref(), Some("1"));
}

#[test]
fn test_report_request_from_query() {
    let request: EnrolmentReportRequest =
        EnrolmentReportRequest::from_query(Some("id=5&course=1&sort=name"));
    assert_eq!(request.id.as_deref(), Some("5"));
    assert_eq!(request.course.as_deref(), Some("1"));

    assert_eq!(
        EnrolmentReportRequest::from_query(None),
        EnrolmentReportRequest::default()
    );
    assert_eq!(
        EnrolmentReportRequest::from_query(Some("id=%20%37")).id.as_deref(),
        Some(" 7")
    );
}

#[test]
fn test_repeated_id_parameter_is_treated_as_absent() {
    let mut persistence: Persistence = create_test_persistence();
    let registry: PluginRegistry = create_test_registry();
    let (_, viewer) = login_viewer(&mut persistence, ADMIN_LOGIN);

    for raw in ["id=5&id=7", "id=5&id=5"] {
        let request: EnrolmentReportRequest = EnrolmentReportRequest::from_query(Some(raw));
        assert_eq!(request.id, None);

        let page: ReportPage =
            enrolment_report(&mut persistence, &registry, &viewer, &request).unwrap();
        assert!(matches!(page, ReportPage::Index { .. }), "query {raw:?}");
    }
}

#[test]
fn test_index_keeps_course_in_category_without_record() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .create_course(&Course::new(
            CourseId::new(9),
            "Orphan",
            "ORPH",
            CategoryId::new(12),
        ))
        .unwrap();
    let registry: PluginRegistry = create_test_registry();
    let (_, viewer) = login_viewer(&mut persistence, ADMIN_LOGIN);

    let page: ReportPage =
        enrolment_report(&mut persistence, &registry, &viewer, &request(None)).unwrap();

    let ReportPage::Index { categories } = page else {
        panic!("expected the category index");
    };
    let ids: Vec<i64> = categories.iter().map(|c| c.id.value()).collect();
    assert_eq!(ids, vec![5, 7, 12]);
    assert!(categories[2].name.is_empty());

    assert!(matches!(
        enrolment_report(&mut persistence, &registry, &viewer, &request(Some("12"))),
        Err(ApiError::ResourceNotFound { .. })
    ));
}
