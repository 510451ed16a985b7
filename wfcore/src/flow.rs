//! The flow registry.
//!
//! A workflow module is described by a [`Flow`]: a set of activities,
//! each bound to an activity data type, the role required to work on it
//! and the transitions to the activities that may follow it.  Each
//! transition is guarded by a predicate over the typed activity data.
//! An activity without transitions is terminal.
//!
//! Flows are assembled with [`FlowBuilder`] and collected into an
//! immutable [`Registry`], which validates every flow when built.

use std::{
    collections::BTreeMap,
    marker::PhantomData,
};
use crate::{
    ac::Role,
    activity::traits::ActivityData,
};

mod builder;
mod evaluate;
mod impls;
mod kind;

pub use builder::{
    FlowBuilder,
    RegistryBuilder,
};
pub use evaluate::{
    Candidates,
    Transition,
};
use kind::ActivityKind;

/// Guard for a transition, evaluated against the current activity data.
pub type Predicate<T> = fn(&T) -> bool;

/// Typed definition of an activity, for use with [`FlowBuilder`].
pub struct Activity<T: ActivityData> {
    key: String,
    name: String,
    role: Role,
    transitions: Vec<(String, Predicate<T>)>,
    _data: PhantomData<fn() -> T>,
}

/// An activity of a flow with its data type erased.
pub struct ActivityDef {
    kind: Box<dyn ActivityKind>,
}

/// Describes the data type bound to an activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivityType {
    pub title: &'static str,
}

pub struct Flow {
    module: String,
    initial: String,
    initial_title: &'static str,
    activities: BTreeMap<String, ActivityDef>,
}

/// All registered workflow modules, keyed by module name.
pub struct Registry {
    flows: BTreeMap<String, Flow>,
}
