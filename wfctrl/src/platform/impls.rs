use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use wfcore::{
    ac::{
        Context,
        Operation,
        Principal,
        traits::Enforcer,
    },
    error::{
        RollbackNotPermitted,
        TransitionDenied,
    },
    flow::{
        Flow,
        Registry,
    },
    platform::WFPlatform,
    request::Request,
    task::{
        Task,
        Tasks,
    },
};

use crate::{
    error::{
        CtrlError,
        PlatformError,
    },
    platform::Platform,
};

mod access;
mod request;
mod task;

/// A task loaded together with everything its access and transition
/// decisions are made against.
pub(crate) struct Target<'p> {
    pub(crate) flow: &'p Flow,
    pub(crate) request: Request,
    pub(crate) task: Task,
    pub(crate) tasks: Tasks,
}

impl Target<'_> {
    /// Whether the task is the open, latest task of an open request.
    pub(crate) fn is_active(&self) -> bool {
        self.request.is_open()
            && self.task.status.is_open()
            && self.tasks.is_latest(self.task.id)
    }

    pub(crate) fn rollback_possible(&self) -> bool {
        self.is_active()
            && !self.flow.is_initial(&self.task.activity)
            && self.tasks.predecessor(self.task.id).is_some()
    }

    pub(crate) fn context(&self) -> Context {
        Context::task(&self.request, &self.task)
            .is_active(self.is_active())
            .rollback_possible(self.rollback_possible())
    }

    /// Rejects mutations of a task that is not the active task.
    pub(crate) fn ensure_mutable(&self) -> Result<(), PlatformError> {
        if !self.request.is_open() {
            Err(TransitionDenied::RequestClosed(self.request.id))?
        }
        if !self.is_active() {
            Err(TransitionDenied::NotActive(self.task.id))?
        }
        Ok(())
    }

    pub(crate) fn ensure_rollback(&self) -> Result<(), PlatformError> {
        if self.flow.is_initial(&self.task.activity) {
            Err(RollbackNotPermitted::InitialActivity(self.task.id))?
        }
        if !self.is_active() {
            Err(RollbackNotPermitted::NotActive(self.task.id))?
        }
        if self.tasks.predecessor(self.task.id).is_none() {
            Err(RollbackNotPermitted::NoPredecessor(self.task.id))?
        }
        Ok(())
    }
}

impl Platform {
    pub fn new(
        registry: Registry,
        enforcer: Box<dyn Enforcer>,
        backend: Arc<dyn WFPlatform>,
    ) -> Self {
        Self {
            registry,
            enforcer,
            backend,
            request_locks: Default::default(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn backend(&self) -> &dyn WFPlatform {
        self.backend.as_ref()
    }

    /// Names of the registered workflow modules.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.registry.modules()
    }

    /// Serializes mutations of the request within this process.
    pub(crate) async fn lock_request(&self, request_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.request_locks.lock();
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(request_id)
                .or_default()
                .clone()
        };
        lock.lock_owned().await
    }

    pub async fn principal(&self, name: &str) -> Result<Principal, PlatformError> {
        Ok(self.backend.get_principal_by_name(name)
            .await?
            .ok_or_else(|| CtrlError::UnknownPrincipal(name.to_string()))?)
    }

    pub(crate) async fn get_request(&self, id: i64) -> Result<Request, PlatformError> {
        Ok(self.backend.get_request(id)
            .await?
            .ok_or(CtrlError::UnknownRequest(id))?)
    }

    pub(crate) async fn get_task(&self, id: i64) -> Result<Task, PlatformError> {
        Ok(self.backend.get_task(id)
            .await?
            .ok_or(CtrlError::UnknownTask(id))?)
    }

    pub(crate) async fn target(&self, task: Task) -> Result<Target<'_>, PlatformError> {
        let request = self.get_request(task.request_id).await?;
        let flow = self.registry.flow(&request.module)?;
        let tasks = self.backend.list_tasks_for_request(request.id).await?;
        Ok(Target { flow, request, task, tasks })
    }

    pub(crate) fn authorize(
        &self,
        principal: &Principal,
        operation: Operation,
        context: &Context,
    ) -> Result<(), PlatformError> {
        Ok(self.enforcer.authorize(principal, operation, context)?)
    }
}
