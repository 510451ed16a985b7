use serde::{Deserialize, Serialize};
use crate::ac::Role;

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    RolledBack,
    Completed,
}

/// A single execution of an activity within a request.
///
/// The `activity` is the key of the activity within the flow of the
/// module of the owning request; the task does not know the type of
/// the activity record bound to it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Task {
    pub id: i64,
    pub request_id: i64,
    pub assignee: Role,
    pub updated_by: i64,
    pub activity: String,
    pub status: TaskStatus,
    pub created_ts: i64,
    pub updated_ts: i64,
}

/// Tasks of a request, ordered by id.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Tasks(Vec<Task>);

mod impls;
mod refs;
pub mod traits;

pub use refs::TaskRef;
