use std::{
    collections::BTreeMap,
    marker::PhantomData,
};
use crate::{
    ac::Role,
    activity::traits::ActivityData,
    error::ConfigurationError,
};
use super::{
    Activity,
    ActivityDef,
    Flow,
    Predicate,
    Registry,
};

impl<T: ActivityData> Activity<T> {
    /// A terminal activity; add transitions to make it lead onward.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<Role>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            role: role.into(),
            transitions: Vec::new(),
            _data: PhantomData,
        }
    }

    pub fn transition(
        mut self,
        target: impl Into<String>,
        predicate: Predicate<T>,
    ) -> Self {
        self.transitions.push((target.into(), predicate));
        self
    }
}

/// Assembles a [`Flow`] for a single workflow module.
pub struct FlowBuilder {
    module: String,
    initial: Option<String>,
    activities: Vec<ActivityDef>,
}

impl FlowBuilder {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            initial: None,
            activities: Vec::new(),
        }
    }

    pub fn activity<T: ActivityData>(mut self, activity: Activity<T>) -> Self {
        self.activities.push(ActivityDef { kind: Box::new(activity) });
        self
    }

    pub fn initial(mut self, key: impl Into<String>) -> Self {
        self.initial = Some(key.into());
        self
    }

    pub fn build(self) -> Result<Flow, ConfigurationError> {
        let module = self.module;
        log::trace!("building flow for workflow module {module}");
        let mut activities = BTreeMap::new();
        let mut titles = BTreeMap::new();
        for def in self.activities.into_iter() {
            let key = def.kind.key().to_string();
            if def.kind.role().is_empty() {
                return Err(ConfigurationError::EmptyRole {
                    module,
                    activity: key,
                });
            }
            if let Some(other) = titles.insert(def.kind.title(), key.clone()) {
                log::warn!("activity type {} is used by both {other} and {key}", def.kind.title());
                return Err(ConfigurationError::DuplicateTitle {
                    module,
                    title: def.kind.title().to_string(),
                });
            }
            if activities.insert(key.clone(), def).is_some() {
                return Err(ConfigurationError::DuplicateActivity {
                    module,
                    activity: key,
                });
            }
        }

        for def in activities.values() {
            if let Some(target) = def.kind.targets()
                .into_iter()
                .find(|target| !activities.contains_key(*target))
            {
                return Err(ConfigurationError::UnknownTarget {
                    module,
                    activity: def.kind.key().to_string(),
                    target: target.to_string(),
                });
            }
        }

        let initial = self.initial
            .ok_or_else(|| ConfigurationError::MissingInitial(module.clone()))?;
        let initial_title = activities.get(&initial)
            .map(|def| def.kind.title())
            .ok_or_else(|| ConfigurationError::UnknownActivity {
                module: module.clone(),
                activity: initial.clone(),
            })?;

        Ok(Flow {
            module,
            initial,
            initial_title,
            activities,
        })
    }
}

/// Collects the flows of every workflow module into a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    flows: Vec<FlowBuilder>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flow(mut self, flow: FlowBuilder) -> Self {
        self.flows.push(flow);
        self
    }

    pub fn build(self) -> Result<Registry, ConfigurationError> {
        let mut flows = BTreeMap::new();
        for builder in self.flows.into_iter() {
            let flow = builder.build()?;
            let module = flow.module.clone();
            if flows.insert(module.clone(), flow).is_some() {
                return Err(ConfigurationError::DuplicateModule(module));
            }
        }
        log::debug!("registry built with workflow modules: {:?}", flows.keys().collect::<Vec<_>>());
        Ok(Registry { flows })
    }
}
