// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Presentation-neutral building blocks for report rows.
//!
//! Labels are localisation keys, icons are pix identifiers (`t/hide`,
//! `t/show`, ...). Turning them into markup is the renderer's job.

use serde::Serialize;

/// One control in the action column of a report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionFragment {
    /// An icon with an accessible label.
    Icon {
        /// The pix identifier.
        pix: &'static str,
        /// Localisation key of the label.
        label: &'static str,
    },
    /// An icon linking to another page.
    Link {
        /// The link target.
        href: String,
        /// The pix identifier.
        pix: &'static str,
        /// Localisation key of the label.
        label: &'static str,
    },
    /// A bare image with no label and no behavior.
    Image {
        /// The pix identifier.
        pix: &'static str,
    },
}

/// The display name of an enrolment instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InstanceName {
    /// A name configured on the instance itself, shown verbatim.
    Custom(String),
    /// The plugin's localised name, optionally followed by a detail in
    /// parentheses.
    Plugin {
        /// Localisation key of the plugin name.
        key: &'static str,
        /// Plugin-specific detail (linked cohort, linked course, ...).
        detail: Option<String>,
    },
}
