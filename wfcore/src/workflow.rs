use serde::{Deserialize, Serialize};
use crate::{
    activity::ActivityRecord,
    request::Request,
    task::Task,
};

mod impls;
pub mod traits;

/// The route identifier that denotes the creation of a new request.
pub const REQUEST_IDENTIFIER: &str = "Initial";

/// The instance segment of a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Identifier {
    Initial,
    Id(i64),
}

/// Records produced by initiating a request.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Initiated {
    pub request: Request,
    pub task: Task,
    pub record: ActivityRecord,
}

/// Records produced by engaging or saving the activity of a task.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Engaged {
    pub task: Task,
    pub record: ActivityRecord,
}

/// Records produced by submitting or finishing a task.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Advanced {
    pub request: Request,
    /// The task that was submitted, now completed.
    pub task: Task,
    /// The task created for the next activity, if any.
    pub successor: Option<Task>,
}

/// Records produced by a rollback.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RolledBack {
    /// The completed predecessor, now rolled back.
    pub previous: Task,
    /// The task that was active, now rolled back.
    pub current: Task,
    /// The new task restoring the predecessor's activity.
    pub task: Task,
    /// The copy of the predecessor's record bound to the new task.
    pub record: ActivityRecord,
}
