// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Identifier of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseId(i64);

impl CourseId {
    /// Wraps a raw course identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a course category.
///
/// Category `0` is the root of the category tree. It has no stored record
/// and is never offered as a navigable entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryId(i64);

impl CategoryId {
    /// The root category.
    pub const ROOT: Self = Self(0);

    /// Wraps a raw category identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Returns whether this is the root category.
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == Self::ROOT.0
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an enrolment instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(i64);

impl InstanceId {
    /// Wraps a raw instance identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A course as seen by the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// The course identifier.
    pub id: CourseId,
    /// The display name of the course.
    pub fullname: String,
    /// The short name of the course.
    pub shortname: String,
    /// The category the course belongs to.
    pub category: CategoryId,
}

impl Course {
    /// Creates a new course.
    #[must_use]
    pub fn new(id: CourseId, fullname: &str, shortname: &str, category: CategoryId) -> Self {
        Self {
            id,
            fullname: fullname.trim().to_string(),
            shortname: shortname.trim().to_string(),
            category,
        }
    }
}

/// A course category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The category identifier.
    pub id: CategoryId,
    /// The category name.
    pub name: String,
}

impl Category {
    /// Creates a new category.
    #[must_use]
    pub fn new(id: CategoryId, name: &str) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
        }
    }
}

/// The status of an enrolment instance.
///
/// Stored as an integer code: `0` enabled, `1` disabled. Any other code is
/// owned by the plugin and carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstanceStatus {
    /// Users may enrol through this instance.
    Enabled,
    /// The instance is switched off.
    Disabled,
    /// A plugin-specific state.
    Other(i32),
}

impl InstanceStatus {
    /// Code for an enabled instance.
    pub const ENABLED_CODE: i32 = 0;
    /// Code for a disabled instance.
    pub const DISABLED_CODE: i32 = 1;

    /// Decodes a stored status code.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            Self::ENABLED_CODE => Self::Enabled,
            Self::DISABLED_CODE => Self::Disabled,
            other => Self::Other(other),
        }
    }

    /// Encodes this status for storage.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Enabled => Self::ENABLED_CODE,
            Self::Disabled => Self::DISABLED_CODE,
            Self::Other(code) => code,
        }
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enabled => write!(f, "enabled"),
            Self::Disabled => write!(f, "disabled"),
            Self::Other(code) => write!(f, "plugin-specific ({code})"),
        }
    }
}

/// A configured enrolment method on a course.
///
/// The `enrol_type` tag selects the plugin that provides behavior for this
/// instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolmentInstance {
    /// The instance identifier.
    pub id: InstanceId,
    /// The course that owns this instance.
    pub course: CourseId,
    /// The plugin type tag (e.g. `manual`, `self`).
    pub enrol_type: String,
    /// The instance status.
    pub status: InstanceStatus,
    /// An optional custom display name.
    pub name: Option<String>,
    /// Plugin-specific text (linked cohort or course name).
    pub custom_text: Option<String>,
}

impl EnrolmentInstance {
    /// Creates a new enrolment instance with no custom name or text.
    #[must_use]
    pub fn new(id: InstanceId, course: CourseId, enrol_type: &str, status: InstanceStatus) -> Self {
        Self {
            id,
            course,
            enrol_type: enrol_type.trim().to_lowercase(),
            status,
            name: None,
            custom_text: None,
        }
    }

    /// Sets the custom display name.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Sets the plugin-specific text.
    #[must_use]
    pub fn with_custom_text(mut self, text: &str) -> Self {
        self.custom_text = Some(text.to_string());
        self
    }

    /// Returns the custom name if it is set and not blank.
    #[must_use]
    pub fn custom_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
