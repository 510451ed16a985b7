use parking_lot::Mutex;
use serde::Serialize;
use std::{
    collections::HashMap,
    sync::Arc,
};
use wfcore::{
    ac::{
        Operations,
        traits::Enforcer,
    },
    activity::ActivityRecord,
    flow::Registry,
    platform::WFPlatform,
    request::Request,
    task::Task,
};

pub struct Platform {
    pub(crate) registry: Registry,
    pub(crate) enforcer: Box<dyn Enforcer>,
    pub(crate) backend: Arc<dyn WFPlatform>,
    // one async lock per request id; mutations of a request hold it
    // across their reads, checks and writes.
    pub(crate) request_locks: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
}

/// What the principal may see of a task and do with it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskView {
    pub request: Request,
    pub task: Task,
    /// Display name of the activity of the task.
    pub name: String,
    pub title: &'static str,
    pub record: Option<ActivityRecord>,
    /// Keys of the activities the task may currently be submitted to;
    /// `None` when the activity is terminal or cannot be evaluated yet.
    pub candidates: Option<Vec<String>>,
    pub is_final: bool,
    pub permitted: Operations,
}
