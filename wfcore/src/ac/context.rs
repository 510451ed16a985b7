use serde::{Deserialize, Serialize};
use crate::{
    ac::role::Role,
    request::Request,
    task::Task,
};

/// The facts about the target of an operation that access control
/// decisions are made against.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Context {
    /// The role required to create the activity being engaged.
    pub required_role: Option<Role>,
    /// The role the task is assigned to.
    pub assignee: Option<Role>,
    /// The principal that initiated the owning request.
    pub requester_id: Option<i64>,
    /// Whether the task is the most recent task of its request.
    pub is_active: bool,
    /// Whether the task is for a non-initial activity with a completed
    /// predecessor to restore.
    pub rollback_possible: bool,
}

impl Context {
    /// Context for initiating a new request with the initial activity
    /// requiring the given role.
    pub fn initiate(required_role: Role) -> Self {
        Self {
            required_role: Some(required_role),
            .. Default::default()
        }
    }

    /// Context for operations against an existing task.
    pub fn task(request: &Request, task: &Task) -> Self {
        Self {
            required_role: Some(task.assignee.clone()),
            assignee: Some(task.assignee.clone()),
            requester_id: Some(request.requester_id),
            .. Default::default()
        }
    }

    pub fn is_active(mut self, val: bool) -> Self {
        self.is_active = val;
        self
    }

    pub fn rollback_possible(mut self, val: bool) -> Self {
        self.rollback_possible = val;
        self
    }
}
