use crate::{
    ac::Role,
    activity::Fields,
    error::{
        ConfigurationError,
        ValidationError,
    },
};
use super::*;

impl ActivityDef {
    pub fn key(&self) -> &str {
        self.kind.key()
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn role(&self) -> &Role {
        self.kind.role()
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn activity_type(&self) -> ActivityType {
        ActivityType { title: self.kind.title() }
    }

    /// Keys of the activities this activity may transition to.
    pub fn transitions(&self) -> Vec<&str> {
        self.kind.targets()
    }

    pub fn is_terminal(&self) -> bool {
        self.kind.targets().is_empty()
    }

    /// Decode the submitted fields as this activity's data type and
    /// check its constraints, producing the fields to be stored.
    pub fn prepare(&self, fields: &Fields) -> Result<Fields, ValidationError> {
        self.kind.prepare(fields)
            .map_err(ValidationError)
    }
}

impl std::fmt::Debug for ActivityDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityDef")
            .field("key", &self.key())
            .field("name", &self.name())
            .field("role", self.role())
            .field("title", &self.title())
            .field("transitions", &self.transitions())
            .finish()
    }
}

impl Flow {
    pub fn builder(module: impl Into<String>) -> FlowBuilder {
        FlowBuilder::new(module)
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// Key of the activity that initiates requests of this module.
    pub fn initial(&self) -> &str {
        &self.initial
    }

    pub fn initial_title(&self) -> &'static str {
        self.initial_title
    }

    pub fn initial_def(&self) -> Result<&ActivityDef, ConfigurationError> {
        self.activity(&self.initial)
    }

    pub fn activity(&self, key: &str) -> Result<&ActivityDef, ConfigurationError> {
        self.activities.get(key)
            .ok_or_else(|| ConfigurationError::UnknownActivity {
                module: self.module.clone(),
                activity: key.to_string(),
            })
    }

    pub fn activity_by_title(&self, title: &str) -> Result<&ActivityDef, ConfigurationError> {
        self.activities.values()
            .find(|def| def.title() == title)
            .ok_or_else(|| ConfigurationError::UnknownTitle {
                module: self.module.clone(),
                title: title.to_string(),
            })
    }

    pub fn activities(&self) -> impl Iterator<Item = &ActivityDef> {
        self.activities.values()
    }

    pub fn transitions_for(&self, key: &str) -> Result<Vec<&str>, ConfigurationError> {
        Ok(self.activity(key)?.transitions())
    }

    pub fn role_for(&self, key: &str) -> Result<&Role, ConfigurationError> {
        Ok(self.activity(key)?.role())
    }

    pub fn activity_type(&self, key: &str) -> Result<ActivityType, ConfigurationError> {
        Ok(self.activity(key)?.activity_type())
    }

    pub fn is_initial(&self, key: &str) -> bool {
        self.initial == key
    }

    pub fn is_final(&self, key: &str) -> Result<bool, ConfigurationError> {
        Ok(self.activity(key)?.is_terminal())
    }
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn flow(&self, module: &str) -> Result<&Flow, ConfigurationError> {
        self.flows.get(module)
            .ok_or_else(|| ConfigurationError::UnknownModule(module.to_string()))
    }

    /// Names of the registered workflow modules.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.flows.keys().map(String::as_str)
    }

    pub fn transitions_for(
        &self,
        module: &str,
        activity: &str,
    ) -> Result<Vec<&str>, ConfigurationError> {
        self.flow(module)?.transitions_for(activity)
    }

    pub fn role_for(
        &self,
        module: &str,
        activity: &str,
    ) -> Result<&Role, ConfigurationError> {
        self.flow(module)?.role_for(activity)
    }

    pub fn initial_activity(
        &self,
        module: &str,
    ) -> Result<&str, ConfigurationError> {
        Ok(self.flow(module)?.initial())
    }

    pub fn activity_type(
        &self,
        module: &str,
        activity: &str,
    ) -> Result<ActivityType, ConfigurationError> {
        self.flow(module)?.activity_type(activity)
    }
}
