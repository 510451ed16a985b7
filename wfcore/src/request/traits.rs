use async_trait::async_trait;
use crate::{
    error::{
        BackendError,
        task::TaskError,
    },
    request::{
        Request,
        Requests,
    },
};

#[async_trait]
pub trait RequestBackend {
    async fn get_request(
        &self,
        id: i64,
    ) -> Result<Option<Request>, BackendError>;
    /// All requests of a workflow module, ordered by id.
    async fn list_requests_for_module(
        &self,
        module: &str,
    ) -> Result<Requests, BackendError>;
    async fn list_requests_for_requester(
        &self,
        requester_id: i64,
    ) -> Result<Requests, BackendError>;
    /// Moves an initiated request to withdrawn.
    async fn withdraw_request(
        &self,
        id: i64,
    ) -> Result<Request, TaskError>;
}
