use async_trait::async_trait;
use crate::{
    ac::Role,
    activity::{
        ActivityRecord,
        Fields,
    },
    error::task::TaskError,
    flow::Transition,
    workflow::{
        Advanced,
        Engaged,
        Initiated,
        RolledBack,
    },
};

/// The mutations of the workflow state machine.
///
/// Every method must apply all of its writes in a single transaction,
/// serialized against every other method touching the same request,
/// and must verify under that serialization that the task is still the
/// latest task of an initiated request.
#[async_trait]
pub trait WorkflowBackend {
    /// Create the request with its first task in progress for the
    /// activity and bind the record to that task.
    async fn initiate_request(
        &self,
        requester_id: i64,
        module: &str,
        activity: &str,
        assignee: &Role,
        record: ActivityRecord,
    ) -> Result<Initiated, TaskError>;
    /// Bind a new record to a task without one, moving it in progress.
    async fn engage_task(
        &self,
        task_id: i64,
        updated_by: i64,
        record: ActivityRecord,
    ) -> Result<Engaged, TaskError>;
    /// Replace the fields of the record bound to the task, moving the
    /// task in progress.
    async fn save_activity(
        &self,
        task_id: i64,
        updated_by: i64,
        fields: Fields,
    ) -> Result<Engaged, TaskError>;
    /// Complete the task and apply the transition: create the successor
    /// task, or complete the request.
    async fn advance_task(
        &self,
        task_id: i64,
        updated_by: i64,
        transition: &Transition,
    ) -> Result<Advanced, TaskError>;
    /// Complete the task and the request.
    async fn finish_task(
        &self,
        task_id: i64,
        updated_by: i64,
    ) -> Result<Advanced, TaskError>;
    /// Roll back the task and its completed predecessor, restoring the
    /// predecessor as a new task with a copy of its record.
    async fn rollback_task(
        &self,
        task_id: i64,
        updated_by: i64,
    ) -> Result<RolledBack, TaskError>;
}
