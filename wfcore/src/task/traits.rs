use async_trait::async_trait;
use crate::{
    error::BackendError,
    task::{
        Task,
        Tasks,
    },
};

#[async_trait]
pub trait TaskBackend {
    async fn get_task(
        &self,
        id: i64,
    ) -> Result<Option<Task>, BackendError>;
    /// All tasks of the request, ordered by id.
    async fn list_tasks_for_request(
        &self,
        request_id: i64,
    ) -> Result<Tasks, BackendError>;
}
