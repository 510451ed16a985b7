use crate::{
    activity::ActivityRecord,
    error::{
        BackendError,
        ConfigurationError,
    },
    flow::Flow,
    platform::WFPlatform,
    request::RequestRef,
    task::{
        Task,
        Tasks,
    },
};

pub struct TaskRef<'a> {
    pub(super) inner: Task,
    pub(super) platform: &'a dyn WFPlatform,
}

impl Task {
    pub fn bind<'a>(
        self,
        platform: &'a dyn WFPlatform,
    ) -> TaskRef<'a> {
        TaskRef {
            inner: self,
            platform,
        }
    }
}

impl<'a> TaskRef<'a> {
    pub fn id(&self) -> i64 {
        self.inner.id
    }

    pub fn inner(&self) -> &Task {
        &self.inner
    }

    pub fn into_inner(self) -> Task {
        self.inner
    }

    pub async fn request(&self) -> Result<RequestRef<'a>, BackendError> {
        self.platform.get_request(self.inner.request_id)
            .await?
            .map(|request| request.bind(self.platform))
            .ok_or_else(|| BackendError::AppInvariantViolation(format!(
                "task {} references missing request {}",
                self.inner.id,
                self.inner.request_id,
            )))
    }

    /// All tasks of the owning request, this one included.
    pub async fn siblings(&self) -> Result<Tasks, BackendError> {
        self.platform.list_tasks_for_request(self.inner.request_id).await
    }

    pub async fn activity_record(&self) -> Result<Option<ActivityRecord>, BackendError> {
        self.platform.get_activity_record_for_task(self.inner.id).await
    }

    /// Whether this is the most recent task of its request.
    pub async fn is_active(&self) -> Result<bool, BackendError> {
        Ok(self.siblings().await?.is_latest(self.inner.id))
    }

    pub async fn previous(&self) -> Result<Option<TaskRef<'a>>, BackendError> {
        Ok(self.siblings()
            .await?
            .previous(self.inner.id)
            .cloned()
            .map(|task| task.bind(self.platform)))
    }

    pub fn is_final(&self, flow: &Flow) -> Result<bool, ConfigurationError> {
        flow.is_final(&self.inner.activity)
    }

    pub async fn can_view_activity(&self) -> Result<bool, BackendError> {
        Ok(self.activity_record().await?.is_some())
    }

    pub async fn can_initiate_activity(&self) -> Result<bool, BackendError> {
        Ok(self.activity_record().await?.is_none())
    }

    pub async fn can_revise_activity(&self) -> Result<bool, BackendError> {
        Ok(self.inner.status.is_open()
            && self.is_active().await?
            && self.activity_record().await?.is_some())
    }
}
