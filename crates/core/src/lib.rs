// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report assembly for the enrolment methods overview.
//!
//! A report request runs three stages, once, in order:
//!
//! 1. the access filter narrows the course list to the selected category and
//!    fails the whole request if the viewer may not review any course left in
//!    scope;
//! 2. the aggregator turns every remaining course into a [`ReportTable`] and
//!    groups the tables by category and course name;
//! 3. the page resolver picks either the category index or the drill-down
//!    view and resolves the category records the renderer needs.
//!
//! Storage and permission checks are reached only through the
//! [`ReportSource`] and [`PermissionChecker`] traits. Nothing here produces
//! HTML: rows carry typed [`ActionFragment`]s and localisation keys that the
//! server crate serialises.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod access;
mod aggregate;
mod error;
mod markup;
mod plugin;
mod plugins;
mod report;
mod source;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use access::filter_courses;
pub use aggregate::{
    Align, Column, GroupedReport, REPORT_COLUMNS, ReportRow, ReportTable, aggregate_course,
    group_courses, instance_management_url, toggle_control,
};
pub use error::CoreError;
pub use markup::{ActionFragment, InstanceName};
pub use plugin::{EnrolmentPlugin, PluginRegistry};
pub use plugins::{CohortPlugin, GuestPlugin, ManualPlugin, MetaPlugin, SelfPlugin};
pub use report::{ReportPage, build_report, resolve_page};
pub use source::{Capability, PermissionChecker, ReportSource};
