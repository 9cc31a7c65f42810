// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-course report tables and their grouping.

use enrolall_domain::{CategoryId, Course, CourseId, EnrolmentInstance, InstanceId, InstanceStatus};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;
use url::form_urlencoded::Serializer;

use crate::error::CoreError;
use crate::markup::{ActionFragment, InstanceName};
use crate::plugin::{EnrolmentPlugin, PluginRegistry};
use crate::source::{Capability, PermissionChecker, ReportSource};

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
}

impl Align {
    /// The CSS `text-align` value.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
        }
    }
}

/// A column header of a report table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Localisation keys joined with `" / "` to form the header text.
    pub keys: &'static [&'static str],
    /// Alignment of the column's cells.
    pub align: Align,
}

/// Columns of every report table: name, users, enable/disable, edit.
pub const REPORT_COLUMNS: [Column; 4] = [
    Column {
        keys: &["name"],
        align: Align::Left,
    },
    Column {
        keys: &["users"],
        align: Align::Center,
    },
    Column {
        keys: &["enable", "disable"],
        align: Align::Center,
    },
    Column {
        keys: &["edit"],
        align: Align::Center,
    },
];

/// One enrolment instance as shown in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// The instance this row describes.
    pub instance: InstanceId,
    /// The display name.
    pub name: InstanceName,
    /// Whether the name is shown dimmed (disabled instance).
    pub dimmed: bool,
    /// Number of user enrolments through this instance.
    pub users: u64,
    /// Toggle and plugin controls, in display order.
    pub actions: Vec<ActionFragment>,
    /// Link to the instance management page of the course.
    pub edit_link: String,
}

/// The enrolment methods of one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    /// The course the table describes.
    pub course: CourseId,
    /// One row per enrolment instance, in instance order.
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    /// The column headers of the table.
    #[must_use]
    pub const fn columns(&self) -> &'static [Column; 4] {
        &REPORT_COLUMNS
    }
}

/// Report tables keyed by category, then by course name.
///
/// Both levels keep first-insertion order. Inserting a course name that is
/// already present in a category replaces the earlier table in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedReport {
    categories: IndexMap<CategoryId, IndexMap<String, ReportTable>>,
}

impl GroupedReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files a course table under its category and course name.
    pub fn insert(&mut self, category: CategoryId, course_name: &str, table: ReportTable) {
        self.categories
            .entry(category)
            .or_default()
            .insert(course_name.to_string(), table);
    }

    /// Categories present in the report, in first-seen order.
    pub fn categories(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.categories.keys().copied()
    }

    /// The course tables of one category, in first-seen order.
    pub fn courses_in(
        &self,
        category: CategoryId,
    ) -> impl Iterator<Item = (&str, &ReportTable)> + '_ {
        self.categories
            .get(&category)
            .into_iter()
            .flat_map(|courses| courses.iter().map(|(name, table)| (name.as_str(), table)))
    }

    /// Removes and returns the course tables of one category.
    pub fn take_category(&mut self, category: CategoryId) -> Vec<(String, ReportTable)> {
        self.categories
            .shift_remove(&category)
            .map(|courses| courses.into_iter().collect())
            .unwrap_or_default()
    }

    /// Number of categories present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns whether no course was filed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Decides the toggle control of an instance.
///
/// | plugin active | can hide/show | status   | control            | dimmed |
/// |---------------|---------------|----------|--------------------|--------|
/// | yes           | yes           | enabled  | `t/hide` icon      | no     |
/// | yes           | yes           | disabled | `t/show` icon      | yes    |
/// | yes           | yes           | other    | bare `t/show` image| no     |
/// | otherwise     |               |          | none               | no     |
///
/// Plugin-specific states get an image without toggle semantics so they
/// cannot be altered from here.
#[must_use]
pub fn toggle_control(
    plugin_active: bool,
    can_hide_show: bool,
    status: InstanceStatus,
) -> (Option<ActionFragment>, bool) {
    if !(plugin_active && can_hide_show) {
        return (None, false);
    }
    match status {
        InstanceStatus::Enabled => (
            Some(ActionFragment::Icon {
                pix: "t/hide",
                label: "disable",
            }),
            false,
        ),
        InstanceStatus::Disabled => (
            Some(ActionFragment::Icon {
                pix: "t/show",
                label: "enable",
            }),
            true,
        ),
        InstanceStatus::Other(_) => (Some(ActionFragment::Image { pix: "t/show" }), false),
    }
}

/// Link to the enrolment instance management page of a course.
///
/// Carries the anti-forgery key of the viewer's session.
#[must_use]
pub fn instance_management_url(course: CourseId, sesskey: &str) -> String {
    let query: String = Serializer::new(String::new())
        .append_pair("sesskey", sesskey)
        .append_pair("id", &course.to_string())
        .finish();
    format!("/enrol/instances?{query}")
}

/// Builds the report row of one instance.
fn build_row<S, P>(
    source: &mut S,
    course: &Course,
    instance: &EnrolmentInstance,
    registry: &PluginRegistry,
    viewer: &P,
    edit_link: &str,
) -> Result<ReportRow, CoreError>
where
    S: ReportSource + ?Sized,
    P: PermissionChecker + ?Sized,
{
    let plugin: &dyn EnrolmentPlugin =
        registry
            .plugin(&instance.enrol_type)
            .ok_or_else(|| CoreError::UnknownPlugin {
                enrol_type: instance.enrol_type.clone(),
                instance: Some(instance.id),
            })?;

    let name: InstanceName = plugin.instance_name(instance);
    let users: u64 = source.count_user_enrolments(instance.id)?;
    let active: bool = registry.is_enabled(&instance.enrol_type);

    let (toggle, dimmed) = toggle_control(
        active,
        plugin.can_hide_show_instance(instance),
        instance.status,
    );
    let mut actions: Vec<ActionFragment> = toggle.into_iter().collect();

    if active && viewer.has_capability(course.id, Capability::EnrolConfig) {
        actions.extend(plugin.action_icons(instance));
    }

    Ok(ReportRow {
        instance: instance.id,
        name,
        dimmed,
        users,
        actions,
        edit_link: edit_link.to_string(),
    })
}

/// Builds the report table of one authorized course.
///
/// # Arguments
///
/// * `source` - Storage for instances and enrolment counts
/// * `course` - A course that passed the access filter
/// * `registry` - Plugins by type tag, with the site-wide enabled set
/// * `viewer` - Capability checks for the current viewer
/// * `sesskey` - The viewer's anti-forgery key, embedded in edit links
///
/// # Errors
///
/// Returns an error if an instance references an unregistered plugin type
/// or if the source fails.
pub fn aggregate_course<S, P>(
    source: &mut S,
    course: &Course,
    registry: &PluginRegistry,
    viewer: &P,
    sesskey: &str,
) -> Result<ReportTable, CoreError>
where
    S: ReportSource + ?Sized,
    P: PermissionChecker + ?Sized,
{
    let instances: Vec<EnrolmentInstance> = source.enrolment_instances(course.id)?;
    let edit_link: String = instance_management_url(course.id, sesskey);

    let rows: Vec<ReportRow> = instances
        .iter()
        .map(|instance| build_row(source, course, instance, registry, viewer, &edit_link))
        .collect::<Result<_, _>>()?;

    debug!(course_id = %course.id, rows = rows.len(), "Aggregated course");

    Ok(ReportTable {
        course: course.id,
        rows,
    })
}

/// Aggregates every authorized course and groups the tables.
///
/// # Errors
///
/// Returns the first error raised while aggregating a course.
pub fn group_courses<S, P>(
    source: &mut S,
    courses: &[Course],
    registry: &PluginRegistry,
    viewer: &P,
    sesskey: &str,
) -> Result<GroupedReport, CoreError>
where
    S: ReportSource + ?Sized,
    P: PermissionChecker + ?Sized,
{
    let mut grouped: GroupedReport = GroupedReport::new();
    for course in courses {
        let table: ReportTable = aggregate_course(source, course, registry, viewer, sesskey)?;
        grouped.insert(course.category, &course.fullname, table);
    }
    Ok(grouped)
}
