use serde::{Deserialize, Serialize};

pub type Fields = serde_json::Map<String, serde_json::Value>;

/// The data entered for a single task, stored as the fields of the
/// registered activity type identified by `title`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ActivityRecord {
    pub id: i64,
    pub task_id: Option<i64>,
    pub title: String,
    pub fields: Fields,
    pub created_ts: i64,
    pub updated_ts: i64,
}

pub(crate) mod impls;
pub mod traits;

pub use impls::RECORD_FIELD;
