use async_trait::async_trait;
use std::error::Error;
use crate::{
    ac::traits::PrincipalBackend,
    activity::traits::ActivityBackend,
    error::BackendError,
    request::{
        RequestRef,
        traits::RequestBackend,
    },
    task::{
        TaskRef,
        traits::TaskBackend,
    },
    workflow::traits::WorkflowBackend,
};

mod connector;
pub use connector::ConnectorOption;

pub trait PlatformUrl {
    fn url(&self) -> &str;
}

/// WFPlatform - Workflow Platform
///
/// This platform persists the requests, tasks and activity records of
/// every workflow module, along with the principal directory.
///
/// This trait is applicable to everything that correctly implements the
/// relevant backends that compose this trait.
#[async_trait]
pub trait WFPlatform: RequestBackend
    + TaskBackend
    + ActivityBackend
    + WorkflowBackend
    + PrincipalBackend

    + PlatformUrl

    + Send
    + Sync
{
    fn as_dyn(&self) -> &dyn WFPlatform;
}

pub trait DefaultWFPlatform: WFPlatform {}

impl<P: RequestBackend
    + TaskBackend
    + ActivityBackend
    + WorkflowBackend
    + PrincipalBackend

    + PlatformUrl

    + DefaultWFPlatform

    + Send
    + Sync
> WFPlatform for P {
    fn as_dyn(&self) -> &dyn WFPlatform {
        self
    }
}

/// Connects a backend and brings its storage up to date.
#[async_trait]
pub trait PlatformConnector: WFPlatform + Sized {
    async fn wf(opts: ConnectorOption) -> Result<Self, Box<dyn Error + Send + Sync + 'static>>;
}

#[async_trait]
pub trait PlatformRefs {
    async fn get_request_ref<'a>(
        &'a self,
        id: i64,
    ) -> Result<Option<RequestRef<'a>>, BackendError>;
    async fn get_task_ref<'a>(
        &'a self,
        id: i64,
    ) -> Result<Option<TaskRef<'a>>, BackendError>;
}

#[async_trait]
impl<P: WFPlatform + ?Sized> PlatformRefs for P {
    async fn get_request_ref<'a>(
        &'a self,
        id: i64,
    ) -> Result<Option<RequestRef<'a>>, BackendError> {
        Ok(self.get_request(id)
            .await?
            .map(|request| request.bind(self.as_dyn())))
    }

    async fn get_task_ref<'a>(
        &'a self,
        id: i64,
    ) -> Result<Option<TaskRef<'a>>, BackendError> {
        Ok(self.get_task(id)
            .await?
            .map(|task| task.bind(self.as_dyn())))
    }
}
