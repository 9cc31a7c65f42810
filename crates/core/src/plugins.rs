// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Built-in enrolment plugins.

use enrolall_domain::EnrolmentInstance;
use url::form_urlencoded::Serializer;

use crate::markup::{ActionFragment, InstanceName};
use crate::plugin::EnrolmentPlugin;

/// Builds an "edit instance" link shared by plugins with a settings form.
fn edit_instance_link(instance: &EnrolmentInstance) -> ActionFragment {
    let query: String = Serializer::new(String::new())
        .append_pair("courseid", &instance.course.to_string())
        .append_pair("id", &instance.id.to_string())
        .append_pair("type", &instance.enrol_type)
        .finish();
    ActionFragment::Link {
        href: format!("/enrol/editinstance?{query}"),
        pix: "t/edit",
        label: "action.edit",
    }
}

/// Name with the plugin-specific text appended, unless a custom name is set.
fn name_with_detail(instance: &EnrolmentInstance, key: &'static str) -> InstanceName {
    if let Some(name) = instance.custom_name() {
        return InstanceName::Custom(name.to_string());
    }
    InstanceName::Plugin {
        key,
        detail: instance
            .custom_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string),
    }
}

/// Teachers add users by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualPlugin;

impl EnrolmentPlugin for ManualPlugin {
    fn enrol_type(&self) -> &'static str {
        "manual"
    }

    fn name_key(&self) -> &'static str {
        "plugin.manual"
    }

    fn action_icons(&self, instance: &EnrolmentInstance) -> Vec<ActionFragment> {
        let query: String = Serializer::new(String::new())
            .append_pair("enrolid", &instance.id.to_string())
            .finish();
        vec![ActionFragment::Link {
            href: format!("/enrol/manual/manage?{query}"),
            pix: "t/enrolusers",
            label: "action.enrolusers",
        }]
    }
}

/// Users enrol themselves, optionally with a key.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfPlugin;

impl EnrolmentPlugin for SelfPlugin {
    fn enrol_type(&self) -> &'static str {
        "self"
    }

    fn name_key(&self) -> &'static str {
        "plugin.self"
    }

    fn instance_name(&self, instance: &EnrolmentInstance) -> InstanceName {
        name_with_detail(instance, self.name_key())
    }

    fn action_icons(&self, instance: &EnrolmentInstance) -> Vec<ActionFragment> {
        vec![edit_instance_link(instance)]
    }
}

/// Guests may view the course without enrolling.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuestPlugin;

impl EnrolmentPlugin for GuestPlugin {
    fn enrol_type(&self) -> &'static str {
        "guest"
    }

    fn name_key(&self) -> &'static str {
        "plugin.guest"
    }

    fn action_icons(&self, instance: &EnrolmentInstance) -> Vec<ActionFragment> {
        vec![edit_instance_link(instance)]
    }
}

/// Members of a cohort are enrolled automatically.
#[derive(Debug, Clone, Copy, Default)]
pub struct CohortPlugin;

impl EnrolmentPlugin for CohortPlugin {
    fn enrol_type(&self) -> &'static str {
        "cohort"
    }

    fn name_key(&self) -> &'static str {
        "plugin.cohort"
    }

    fn instance_name(&self, instance: &EnrolmentInstance) -> InstanceName {
        name_with_detail(instance, self.name_key())
    }

    fn action_icons(&self, instance: &EnrolmentInstance) -> Vec<ActionFragment> {
        vec![edit_instance_link(instance)]
    }
}

/// Mirrors the enrolments of another course.
///
/// The linked course owns the state, so instances cannot be toggled here.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaPlugin;

impl EnrolmentPlugin for MetaPlugin {
    fn enrol_type(&self) -> &'static str {
        "meta"
    }

    fn name_key(&self) -> &'static str {
        "plugin.meta"
    }

    fn instance_name(&self, instance: &EnrolmentInstance) -> InstanceName {
        name_with_detail(instance, self.name_key())
    }

    fn can_hide_show_instance(&self, _instance: &EnrolmentInstance) -> bool {
        false
    }
}
