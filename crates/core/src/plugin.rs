// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Enrolment plugin interface and registry.

use std::collections::{BTreeSet, HashMap};

use enrolall_domain::{EnrolmentInstance, validate_enrol_type};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::markup::{ActionFragment, InstanceName};
use crate::plugins::{CohortPlugin, GuestPlugin, ManualPlugin, MetaPlugin, SelfPlugin};

/// Behavior shared by every instance of one enrolment method type.
///
/// One plugin object serves all courses; it must not hold per-request
/// state.
pub trait EnrolmentPlugin: Send + Sync {
    /// The type tag this plugin handles (`manual`, `self`, ...).
    fn enrol_type(&self) -> &'static str;

    /// Localisation key of the plugin's own name.
    fn name_key(&self) -> &'static str;

    /// Produces the display name of an instance.
    ///
    /// A custom name configured on the instance wins over the plugin name.
    fn instance_name(&self, instance: &EnrolmentInstance) -> InstanceName {
        instance.custom_name().map_or_else(
            || InstanceName::Plugin {
                key: self.name_key(),
                detail: None,
            },
            |name| InstanceName::Custom(name.to_string()),
        )
    }

    /// Reports whether the instance may be switched on and off.
    fn can_hide_show_instance(&self, _instance: &EnrolmentInstance) -> bool {
        true
    }

    /// Extra controls for an instance, shown to viewers who may configure
    /// enrolments.
    fn action_icons(&self, _instance: &EnrolmentInstance) -> Vec<ActionFragment> {
        Vec::new()
    }
}

/// Maps type tags to plugins and records which types are enabled site-wide.
///
/// Built once at start-up and shared read-only by every request.
pub struct PluginRegistry {
    plugins: HashMap<&'static str, Box<dyn EnrolmentPlugin>>,
    enabled: BTreeSet<String>,
}

impl PluginRegistry {
    /// Creates an empty registry with nothing enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
            enabled: BTreeSet::new(),
        }
    }

    /// Creates a registry holding every built-in plugin, none enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if two built-ins claim the same type tag.
    pub fn with_builtin_plugins() -> Result<Self, CoreError> {
        let mut registry: Self = Self::new();
        registry.register(Box::new(ManualPlugin))?;
        registry.register(Box::new(SelfPlugin))?;
        registry.register(Box::new(GuestPlugin))?;
        registry.register(Box::new(CohortPlugin))?;
        registry.register(Box::new(MetaPlugin))?;
        Ok(registry)
    }

    /// Adds a plugin.
    ///
    /// # Errors
    ///
    /// Returns an error if the type tag is malformed or already registered.
    pub fn register(&mut self, plugin: Box<dyn EnrolmentPlugin>) -> Result<(), CoreError> {
        let enrol_type: &'static str = plugin.enrol_type();
        validate_enrol_type(enrol_type)?;
        if self.plugins.contains_key(enrol_type) {
            return Err(CoreError::DuplicatePlugin(enrol_type.to_string()));
        }
        debug!(enrol_type, "Registered enrolment plugin");
        self.plugins.insert(enrol_type, plugin);
        Ok(())
    }

    /// Replaces the set of site-wide enabled plugin types.
    ///
    /// # Errors
    ///
    /// Returns an error if any listed type has no registered plugin. The
    /// previous set is kept in that case.
    pub fn set_enabled<I, S>(&mut self, enrol_types: I) -> Result<(), CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut enabled: BTreeSet<String> = BTreeSet::new();
        for enrol_type in enrol_types {
            let enrol_type: String = enrol_type.as_ref().trim().to_lowercase();
            if enrol_type.is_empty() {
                continue;
            }
            if !self.plugins.contains_key(enrol_type.as_str()) {
                return Err(CoreError::UnknownPlugin {
                    enrol_type,
                    instance: None,
                });
            }
            enabled.insert(enrol_type);
        }
        info!(enabled = ?enabled, "Enabled enrolment plugins");
        self.enabled = enabled;
        Ok(())
    }

    /// Looks up the plugin for a type tag.
    #[must_use]
    pub fn plugin(&self, enrol_type: &str) -> Option<&dyn EnrolmentPlugin> {
        self.plugins.get(enrol_type).map(AsRef::as_ref)
    }

    /// Returns whether a plugin type is enabled site-wide.
    #[must_use]
    pub fn is_enabled(&self, enrol_type: &str) -> bool {
        self.enabled.contains(enrol_type)
    }

    /// The enabled type tags, sorted.
    #[must_use]
    pub fn enabled_types(&self) -> Vec<&str> {
        self.enabled.iter().map(String::as_str).collect()
    }

    /// Every registered type tag, sorted.
    #[must_use]
    pub fn registered_types(&self) -> Vec<&'static str> {
        let mut types: Vec<&'static str> = self.plugins.keys().copied().collect();
        types.sort_unstable();
        types
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.registered_types())
            .field("enabled", &self.enabled)
            .finish()
    }
}
