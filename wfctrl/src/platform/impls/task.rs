use wfcore::{
    ac::{
        Operation,
        Principal,
    },
    activity::{
        ActivityRecord,
        Fields,
    },
    error::TransitionDenied,
    flow::Candidates,
    workflow::{
        Advanced,
        Engaged,
        RolledBack,
    },
};

use crate::{
    error::PlatformError,
    platform::{
        Platform,
        TaskView,
        impls::Target,
    },
};

impl Platform {
    async fn record_for(&self, target: &Target<'_>) -> Result<ActivityRecord, PlatformError> {
        Ok(self.backend.get_activity_record_for_task(target.task.id)
            .await?
            .ok_or(TransitionDenied::NotEngaged(target.task.id))?)
    }

    /// Create the activity record of a task that has none yet, putting
    /// the task in progress.
    pub async fn assign_and_initiate(
        &self,
        task_id: i64,
        principal: &Principal,
        fields: &Fields,
    ) -> Result<Engaged, PlatformError> {
        let task = self.get_task(task_id).await?;
        let _guard = self.lock_request(task.request_id).await;
        let target = self.target(self.get_task(task_id).await?).await?;
        target.ensure_mutable()?;
        self.authorize(principal, Operation::Create, &target.context())?;
        let def = target.flow.activity(&target.task.activity)?;
        let record = ActivityRecord {
            title: def.title().to_string(),
            fields: def.prepare(fields)?,
            .. Default::default()
        };
        let engaged = self.backend.engage_task(task_id, principal.id, record).await?;
        log::info!(
            "principal {} engaged task {task_id} ({})",
            principal.name,
            target.task.activity,
        );
        Ok(engaged)
    }

    /// Replace the fields of the record of the active task without
    /// moving the request on.
    pub async fn save(
        &self,
        task_id: i64,
        principal: &Principal,
        fields: &Fields,
    ) -> Result<Engaged, PlatformError> {
        let task = self.get_task(task_id).await?;
        let _guard = self.lock_request(task.request_id).await;
        let target = self.target(self.get_task(task_id).await?).await?;
        target.ensure_mutable()?;
        self.authorize(principal, Operation::Update, &target.context())?;
        let fields = target.flow
            .activity(&target.task.activity)?
            .prepare(fields)?;
        Ok(self.backend.save_activity(task_id, principal.id, fields).await?)
    }

    /// Complete the active task, moving the request to the `next`
    /// activity, which must be `None` for a terminal activity.
    pub async fn submit(
        &self,
        task_id: i64,
        principal: &Principal,
        next: Option<&str>,
    ) -> Result<Advanced, PlatformError> {
        let task = self.get_task(task_id).await?;
        let _guard = self.lock_request(task.request_id).await;
        let target = self.target(self.get_task(task_id).await?).await?;
        target.ensure_mutable()?;
        self.authorize(principal, Operation::Update, &target.context())?;
        let record = self.record_for(&target).await?;
        let transition = target.flow.check_transition(
            &target.task.activity,
            next,
            &record.fields,
        )?;
        let advanced = self.backend.advance_task(task_id, principal.id, &transition).await?;
        match &advanced.successor {
            Some(successor) => log::info!(
                "principal {} submitted task {task_id}; task {} created for {}",
                principal.name,
                successor.id,
                successor.activity,
            ),
            None => log::info!(
                "principal {} submitted task {task_id}; request {} completed",
                principal.name,
                advanced.request.id,
            ),
        }
        Ok(advanced)
    }

    /// Complete the active task and its request regardless of the
    /// transitions of the activity.
    pub async fn finish(
        &self,
        task_id: i64,
        principal: &Principal,
    ) -> Result<Advanced, PlatformError> {
        let task = self.get_task(task_id).await?;
        let _guard = self.lock_request(task.request_id).await;
        let target = self.target(self.get_task(task_id).await?).await?;
        target.ensure_mutable()?;
        self.authorize(principal, Operation::Update, &target.context())?;
        self.record_for(&target).await?;
        let advanced = self.backend.finish_task(task_id, principal.id).await?;
        log::info!(
            "principal {} finished task {task_id}; request {} completed",
            principal.name,
            advanced.request.id,
        );
        Ok(advanced)
    }

    /// Move the request one step back: the active task and its completed
    /// predecessor are rolled back and the predecessor is restored as a
    /// new task with a copy of its record.
    pub async fn rollback(
        &self,
        task_id: i64,
        principal: &Principal,
    ) -> Result<RolledBack, PlatformError> {
        let task = self.get_task(task_id).await?;
        let _guard = self.lock_request(task.request_id).await;
        let target = self.target(self.get_task(task_id).await?).await?;
        target.ensure_rollback()?;
        self.authorize(principal, Operation::Rollback, &target.context())?;
        let rolled_back = self.backend.rollback_task(task_id, principal.id).await?;
        log::info!(
            "principal {} rolled back task {task_id}; task {} restores {}",
            principal.name,
            rolled_back.task.id,
            rolled_back.task.activity,
        );
        Ok(rolled_back)
    }

    /// The activities the task may currently be submitted to.
    pub async fn candidates(
        &self,
        task_id: i64,
        principal: &Principal,
    ) -> Result<Candidates, PlatformError> {
        let target = self.target(self.get_task(task_id).await?).await?;
        self.authorize(principal, Operation::View, &target.context())?;
        let record = self.record_for(&target).await?;
        Ok(target.flow.candidates(&target.task.activity, &record.fields)?)
    }

    pub async fn view_task(
        &self,
        task_id: i64,
        principal: &Principal,
    ) -> Result<TaskView, PlatformError> {
        let target = self.target(self.get_task(task_id).await?).await?;
        let context = target.context();
        self.authorize(principal, Operation::View, &context)?;
        let def = target.flow.activity(&target.task.activity)?;
        let record = self.backend.get_activity_record_for_task(task_id).await?;

        let mut permitted = self.enforcer.permitted(principal, &context);
        if record.is_some() || !target.is_active() {
            permitted.remove(Operation::Create);
        }
        if record.is_none() {
            permitted.remove(Operation::Update);
        }
        let candidates = match &record {
            Some(record) => match target.flow.candidates(def.key(), &record.fields) {
                Ok(Candidates::Eligible(targets)) => Some(targets.into_iter().collect()),
                Ok(Candidates::Terminal) => None,
                Err(e) => {
                    log::warn!("cannot evaluate transitions of task {task_id}: {e}");
                    None
                }
            },
            None => None,
        };

        Ok(TaskView {
            name: def.name().to_string(),
            title: def.title(),
            is_final: def.is_terminal(),
            request: target.request,
            task: target.task,
            record,
            candidates,
            permitted,
        })
    }
}
