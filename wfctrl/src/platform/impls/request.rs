use wfcore::{
    ac::{
        Context,
        Operation,
        Principal,
    },
    activity::{
        ActivityRecord,
        Fields,
    },
    error::{
        AccessDenied,
        TransitionDenied,
    },
    request::{
        Request,
        Requests,
    },
    workflow::{
        Engaged,
        Identifier,
        Initiated,
    },
};

use crate::{
    error::{
        CtrlError,
        PlatformError,
    },
    platform::Platform,
};

impl Platform {
    /// Start a new request of the module with the record of its
    /// initial activity.
    ///
    /// Nothing is written unless the principal holds the role of the
    /// initial activity and the fields are valid.
    pub async fn initiate_request(
        &self,
        module: &str,
        principal: &Principal,
        fields: &Fields,
    ) -> Result<Initiated, PlatformError> {
        let flow = self.registry.flow(module)?;
        let def = flow.initial_def()?;
        self.authorize(
            principal,
            Operation::Create,
            &Context::initiate(def.role().clone()),
        )?;
        let record = ActivityRecord {
            title: def.title().to_string(),
            fields: def.prepare(fields)?,
            .. Default::default()
        };
        let initiated = self.backend.initiate_request(
            principal.id,
            module,
            def.key(),
            def.role(),
            record,
        ).await?;
        log::info!(
            "{module}: principal {} initiated request {}",
            principal.name,
            initiated.request.id,
        );
        Ok(initiated)
    }

    /// Create the record of an activity as addressed by a route: the
    /// `Initial` identifier starts a new request, an id engages the task
    /// with that id.  The title must be the type of the addressed
    /// activity.
    pub async fn create_activity(
        &self,
        module: &str,
        title: &str,
        identifier: Identifier,
        principal: &Principal,
        fields: &Fields,
    ) -> Result<Engaged, PlatformError> {
        let flow = self.registry.flow(module)?;
        match identifier {
            Identifier::Initial => {
                if flow.initial_title() != title {
                    Err(CtrlError::TitleMismatch {
                        expected: flow.initial_title().to_string(),
                        found: title.to_string(),
                    })?
                }
                let Initiated { task, record, .. } = self
                    .initiate_request(module, principal, fields)
                    .await?;
                Ok(Engaged { task, record })
            }
            Identifier::Id(task_id) => {
                let task = self.get_task(task_id).await?;
                let request = self.get_request(task.request_id).await?;
                if request.module != module {
                    Err(CtrlError::ModuleMismatch {
                        expected: request.module,
                        found: module.to_string(),
                    })?
                }
                let expected = flow.activity(&task.activity)?.title();
                if expected != title {
                    Err(CtrlError::TitleMismatch {
                        expected: expected.to_string(),
                        found: title.to_string(),
                    })?
                }
                self.assign_and_initiate(task_id, principal, fields).await
            }
        }
    }

    /// Withdraw an initiated request; only its requester or an elevated
    /// principal may do so.
    pub async fn withdraw(
        &self,
        request_id: i64,
        principal: &Principal,
    ) -> Result<Request, PlatformError> {
        let _guard = self.lock_request(request_id).await;
        let request = self.get_request(request_id).await?;
        if !request.is_open() {
            Err(TransitionDenied::RequestClosed(request_id))?
        }
        if !principal.elevated && principal.id != request.requester_id {
            Err(AccessDenied {
                operation: Operation::Update,
                principal: principal.name.clone(),
            })?
        }
        let request = self.backend.withdraw_request(request_id).await?;
        log::info!("principal {} withdrew request {request_id}", principal.name);
        Ok(request)
    }

    /// All requests of the module, ordered by id.
    pub async fn list_requests(
        &self,
        module: &str,
    ) -> Result<Requests, PlatformError> {
        self.registry.flow(module)?;
        Ok(self.backend.list_requests_for_module(module).await?)
    }

    /// The request with all of its tasks, for principals that may view
    /// at least one of them.
    pub async fn request_history(
        &self,
        request_id: i64,
        principal: &Principal,
    ) -> Result<Request, PlatformError> {
        let request = self.get_request(request_id)
            .await?
            .bind(self.backend.as_dyn())
            .with_tasks()
            .await?;
        let visible = request.tasks.iter().flat_map(|tasks| tasks.iter()).any(|task| self.enforcer.enforce(
            principal,
            Operation::View,
            &Context::task(&request, task),
        ));
        if !visible {
            Err(AccessDenied {
                operation: Operation::View,
                principal: principal.name.clone(),
            })?
        }
        Ok(request)
    }
}
