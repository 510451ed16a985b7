use async_trait::async_trait;
use serde::{
    de::DeserializeOwned,
    Serialize,
};
use crate::{
    activity::ActivityRecord,
    error::{
        BackendError,
        FieldErrors,
    },
};

/// The typed payload of an activity.
///
/// Workflow modules define one type per activity kind; the registry
/// binds these to activity keys and the transition predicates are
/// written against the typed value.
pub trait ActivityData: Clone
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// The name of the activity type; used in routes and to identify
    /// the type of a stored record.
    const TITLE: &'static str;

    /// Constraints on the field values.
    fn validate(&self) -> Result<(), FieldErrors> {
        Ok(())
    }
}

#[async_trait]
pub trait ActivityBackend {
    async fn get_activity_record(
        &self,
        id: i64,
    ) -> Result<Option<ActivityRecord>, BackendError>;
    async fn get_activity_record_for_task(
        &self,
        task_id: i64,
    ) -> Result<Option<ActivityRecord>, BackendError>;
}
