use crate::{
    error::BackendError,
    platform::WFPlatform,
    request::Request,
    task::Tasks,
};

pub struct RequestRef<'a> {
    pub(super) inner: Request,
    pub(super) platform: &'a dyn WFPlatform,
}

impl Request {
    pub fn bind<'a>(
        self,
        platform: &'a dyn WFPlatform,
    ) -> RequestRef<'a> {
        RequestRef {
            inner: self,
            platform,
        }
    }
}

impl<'a> RequestRef<'a> {
    pub fn id(&self) -> i64 {
        self.inner.id
    }

    pub fn inner(&self) -> &Request {
        &self.inner
    }

    pub fn into_inner(self) -> Request {
        self.inner
    }

    pub async fn tasks(&self) -> Result<Tasks, BackendError> {
        self.platform.list_tasks_for_request(self.inner.id).await
    }

    /// The request with its tasks attached.
    pub async fn with_tasks(mut self) -> Result<Request, BackendError> {
        self.inner.tasks = Some(self.tasks().await?);
        Ok(self.inner)
    }
}
