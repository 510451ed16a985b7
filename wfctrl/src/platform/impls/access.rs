use wfcore::ac::{
    Context,
    Operation,
    Principal,
};

use crate::{
    error::PlatformError,
    platform::Platform,
};

impl Platform {
    pub fn access_check(
        &self,
        operation: Operation,
        principal: &Principal,
        context: &Context,
    ) -> bool {
        self.enforcer.enforce(principal, operation, context)
    }

    /// The context access decisions about the task are made against.
    pub async fn task_context(&self, task_id: i64) -> Result<Context, PlatformError> {
        Ok(self.target(self.get_task(task_id).await?).await?.context())
    }

    /// The context for starting a new request of the module.
    pub fn initiate_context(&self, module: &str) -> Result<Context, PlatformError> {
        let flow = self.registry.flow(module)?;
        Ok(Context::initiate(flow.initial_def()?.role().clone()))
    }
}
