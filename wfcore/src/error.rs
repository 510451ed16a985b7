use std::collections::BTreeMap;
use thiserror::Error;

use crate::ac::Operation;

pub mod task;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    #[cfg(feature = "sqlx")]
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    /// Denotes custom application invariant; generally informative.
    #[error("application invariant violated: {0}")]
    AppInvariantViolation(String),
    #[error("unknown error")]
    Unknown,
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ValueError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("uninitialized value")]
    Uninitialized,
    #[error("unsupported value: {0}")]
    Unsupported(String),
}

/// Errors in the definition of the workflow modules.
///
/// These are programming errors; the registry is validated once when it
/// is built so these should surface at startup and never while serving.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("unknown workflow module: {0}")]
    UnknownModule(String),
    #[error("workflow module {0} is registered more than once")]
    DuplicateModule(String),
    #[error("unknown activity {activity} in workflow module {module}")]
    UnknownActivity {
        module: String,
        activity: String,
    },
    #[error("activity {activity} is defined more than once in workflow module {module}")]
    DuplicateActivity {
        module: String,
        activity: String,
    },
    #[error("activity type {title} is bound to more than one activity in workflow module {module}")]
    DuplicateTitle {
        module: String,
        title: String,
    },
    #[error("unknown activity type {title} in workflow module {module}")]
    UnknownTitle {
        module: String,
        title: String,
    },
    #[error("workflow module {0} has no initial activity")]
    MissingInitial(String),
    #[error("activity {activity} in workflow module {module} transitions to unknown activity {target}")]
    UnknownTarget {
        module: String,
        activity: String,
        target: String,
    },
    #[error("activity {activity} in workflow module {module} has no role")]
    EmptyRole {
        module: String,
        activity: String,
    },
}

/// Field-keyed validation messages for a submitted activity record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

#[derive(Clone, Debug, Error, PartialEq)]
#[error("validation failed: {0}")]
pub struct ValidationError(pub FieldErrors);

#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TransitionDenied {
    #[error("activity {activity} has no transition to {target}")]
    NotRegistered {
        activity: String,
        target: String,
    },
    #[error("transition from {activity} to {target} is not permitted by the current record")]
    PredicateFalse {
        activity: String,
        target: String,
    },
    #[error("activity {0} requires a next activity to submit to")]
    NoTarget(String),
    #[error("task {0} is not the active task of its request")]
    NotActive(i64),
    #[error("task {0} has no activity record")]
    NotEngaged(i64),
    #[error("task {0} already has an activity record")]
    AlreadyEngaged(i64),
    #[error("request {0} is no longer open")]
    RequestClosed(i64),
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("principal {principal} may not {operation}")]
pub struct AccessDenied {
    pub operation: Operation,
    pub principal: String,
}

#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RollbackNotPermitted {
    #[error("task {0} is for the initial activity")]
    InitialActivity(i64),
    #[error("task {0} is not the active task of its request")]
    NotActive(i64),
    #[error("task {0} has no completed predecessor to restore")]
    NoPredecessor(i64),
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    TransitionDenied(#[from] TransitionDenied),
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    RollbackNotPermitted(#[from] RollbackNotPermitted),
    #[error(transparent)]
    Value(#[from] ValueError),
}

mod impls;
