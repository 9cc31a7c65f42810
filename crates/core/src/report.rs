// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report pipeline entry point and view selection.

use enrolall_domain::{Category, CategoryId, Course};
use tracing::{debug, info, warn};

use crate::access::filter_courses;
use crate::aggregate::{GroupedReport, ReportTable, group_courses};
use crate::error::CoreError;
use crate::plugin::PluginRegistry;
use crate::source::{PermissionChecker, ReportSource};

/// What the renderer shows for one request.
///
/// The view is selected only by the request's category parameter:
/// `Index` without one, `DrillDown` with one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportPage {
    /// One entry per non-root category that holds a reviewable course.
    Index {
        /// Categories in first-seen course order.
        categories: Vec<Category>,
    },
    /// Every course table of the selected category.
    DrillDown {
        /// The selected category.
        category: Category,
        /// Course name and table, in course order.
        courses: Vec<(String, ReportTable)>,
    },
}

impl ReportPage {
    /// The selected category, if this is a drill-down.
    #[must_use]
    pub const fn selected_category(&self) -> Option<&Category> {
        match self {
            Self::Index { .. } => None,
            Self::DrillDown { category, .. } => Some(category),
        }
    }
}

/// Looks up a category that must exist.
fn require_category<S>(source: &mut S, id: CategoryId) -> Result<Category, CoreError>
where
    S: ReportSource + ?Sized,
{
    source.category(id)?.ok_or(CoreError::CategoryNotFound(id))
}

/// Turns grouped tables into the page for the active filter.
///
/// Without a filter the root category is left out of the index, and a
/// category with no record is listed without a name. With a filter the
/// category record must exist even when none of its courses were found.
///
/// # Errors
///
/// Returns `CoreError::CategoryNotFound` if the selected category has no
/// record.
pub fn resolve_page<S>(
    source: &mut S,
    mut grouped: GroupedReport,
    filter: Option<CategoryId>,
) -> Result<ReportPage, CoreError>
where
    S: ReportSource + ?Sized,
{
    match filter {
        None => {
            let ids: Vec<CategoryId> = grouped
                .categories()
                .filter(|id| !id.is_root())
                .collect();
            let mut categories: Vec<Category> = Vec::with_capacity(ids.len());
            for id in ids {
                let category: Category = source.category(id)?.unwrap_or_else(|| {
                    warn!(category_id = id.value(), "Indexed category has no record");
                    Category::new(id, "")
                });
                categories.push(category);
            }
            Ok(ReportPage::Index { categories })
        }
        Some(id) => {
            let category: Category = require_category(source, id)?;
            let courses: Vec<(String, ReportTable)> = grouped.take_category(id);
            Ok(ReportPage::DrillDown { category, courses })
        }
    }
}

/// Runs the whole report for one request.
///
/// # Arguments
///
/// * `source` - Storage for courses, categories and enrolments
/// * `viewer` - Capability checks for the current viewer
/// * `registry` - Plugins by type tag, with the site-wide enabled set
/// * `filter` - The selected category, if any
/// * `sesskey` - The viewer's anti-forgery key, embedded in edit links
///
/// # Errors
///
/// Returns an error if the viewer may not review an in-scope course, if the
/// selected category has no record, if an instance uses an unregistered plugin
/// type, or if the source fails.
pub fn build_report<S, P>(
    source: &mut S,
    viewer: &P,
    registry: &PluginRegistry,
    filter: Option<CategoryId>,
    sesskey: &str,
) -> Result<ReportPage, CoreError>
where
    S: ReportSource + ?Sized,
    P: PermissionChecker + ?Sized,
{
    let courses: Vec<Course> = source.list_courses()?;
    debug!(total_courses = courses.len(), "Loaded course list");

    let authorized: Vec<Course> = filter_courses(courses, filter, viewer)?;
    let grouped: GroupedReport = group_courses(source, &authorized, registry, viewer, sesskey)?;
    let page: ReportPage = resolve_page(source, grouped, filter)?;

    info!(
        filter = ?filter.map(CategoryId::value),
        courses = authorized.len(),
        "Built enrolment report"
    );
    Ok(page)
}
