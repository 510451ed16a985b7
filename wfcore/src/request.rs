use serde::{Deserialize, Serialize};
use crate::task::Tasks;

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum RequestStatus {
    #[default]
    Initiated,
    Withdrawn,
    Completed,
}

/// One running instance of a workflow module.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Request {
    pub id: i64,
    pub requester_id: i64,
    pub module: String,
    pub status: RequestStatus,
    pub created_ts: i64,
    pub updated_ts: i64,
    pub tasks: Option<Tasks>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Requests(Vec<Request>);

mod impls;
mod refs;
pub mod traits;

pub use refs::RequestRef;
