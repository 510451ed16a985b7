use async_trait::async_trait;
use sqlx::SqliteConnection;
use wfcore::{
    ac::Role,
    activity::{
        ActivityRecord,
        Fields,
    },
    error::{
        BackendError,
        task::TaskError,
    },
    flow::Transition,
    request::{
        Request,
        RequestStatus,
    },
    task::{
        Task,
        TaskStatus,
    },
    workflow::{
        Advanced,
        Engaged,
        Initiated,
        RolledBack,
        traits::WorkflowBackend,
    },
};

use crate::{
    SqliteBackend,
    chrono::Utc,
};
use super::{
    activity::{
        gets_activity_record_for_task_sqlite,
        inserts_activity_record_sqlite,
        updates_activity_fields_sqlite,
    },
    request::{
        inserts_request_sqlite,
        locks_request_for_task_sqlite,
        sets_request_status_sqlite,
    },
    task::{
        gets_task_sqlite,
        inserts_task_sqlite,
        lists_tasks_sqlite,
        sets_task_status_sqlite,
    },
};

// Every mutation against an existing task goes through here first: the
// owning request is locked for the remainder of the transaction by a
// write, then the task is re-read and must still be the open, latest task
// of the request.
async fn guards_task_sqlite(
    conn: &mut SqliteConnection,
    task_id: i64,
    ts: i64,
) -> Result<(Request, Task), TaskError> {
    let request = locks_request_for_task_sqlite(conn, task_id, ts).await?;
    let request_id = request.id;
    let latest = sqlx::query_scalar::<_, Option<i64>>(r#"
SELECT
    MAX(id)
FROM
    task
WHERE
    request_id = ?1
        "#)
        .bind(request_id)
        .fetch_one(&mut *conn)
        .await?;
    let task = gets_task_sqlite(conn, task_id)
        .await?
        .ok_or_else(|| BackendError::AppInvariantViolation(format!(
            "task {task_id} vanished"
        )))?;
    if latest != Some(task_id) || !task.status.is_open() {
        log::warn!("task {task_id} ({}) is not the active task of request {request_id}", task.status);
        return Err(TaskError::NotActive(task_id));
    }
    Ok((request, task))
}

async fn engaged_record(
    conn: &mut SqliteConnection,
    task_id: i64,
) -> Result<ActivityRecord, TaskError> {
    gets_activity_record_for_task_sqlite(conn, task_id)
        .await?
        .ok_or(TaskError::NotEngaged(task_id))
}

async fn initiate_request_sqlite(
    backend: &SqliteBackend,
    requester_id: i64,
    module: &str,
    activity: &str,
    assignee: &Role,
    record: ActivityRecord,
) -> Result<Initiated, TaskError> {
    let mut tx = backend.pool.begin().await?;
    let ts = Utc::now().timestamp();
    let request = inserts_request_sqlite(&mut tx, requester_id, module, ts).await?;
    let task = inserts_task_sqlite(
        &mut tx,
        request.id,
        assignee,
        requester_id,
        activity,
        TaskStatus::InProgress,
        ts,
    ).await?;
    let record = inserts_activity_record_sqlite(&mut tx, task.id, record, ts).await?;
    tx.commit().await?;
    log::info!("{module}: request {} initiated by principal {requester_id}", request.id);
    Ok(Initiated { request, task, record })
}

async fn engage_task_sqlite(
    backend: &SqliteBackend,
    task_id: i64,
    updated_by: i64,
    record: ActivityRecord,
) -> Result<Engaged, TaskError> {
    let mut tx = backend.pool.begin().await?;
    let ts = Utc::now().timestamp();
    guards_task_sqlite(&mut tx, task_id, ts).await?;
    if gets_activity_record_for_task_sqlite(&mut tx, task_id).await?.is_some() {
        return Err(TaskError::AlreadyEngaged(task_id));
    }
    let record = inserts_activity_record_sqlite(&mut tx, task_id, record, ts).await?;
    let task = sets_task_status_sqlite(
        &mut tx,
        task_id,
        TaskStatus::InProgress,
        updated_by,
        ts,
    ).await?;
    tx.commit().await?;
    Ok(Engaged { task, record })
}

async fn save_activity_sqlite(
    backend: &SqliteBackend,
    task_id: i64,
    updated_by: i64,
    fields: Fields,
) -> Result<Engaged, TaskError> {
    let mut tx = backend.pool.begin().await?;
    let ts = Utc::now().timestamp();
    guards_task_sqlite(&mut tx, task_id, ts).await?;
    let record = engaged_record(&mut tx, task_id).await?;
    let record = updates_activity_fields_sqlite(&mut tx, record.id, &fields, ts).await?;
    let task = sets_task_status_sqlite(
        &mut tx,
        task_id,
        TaskStatus::InProgress,
        updated_by,
        ts,
    ).await?;
    tx.commit().await?;
    log::info!("task {task_id}: saved {} record {}", record.title, record.id);
    Ok(Engaged { task, record })
}

async fn advance_task_sqlite(
    backend: &SqliteBackend,
    task_id: i64,
    updated_by: i64,
    transition: &Transition,
) -> Result<Advanced, TaskError> {
    let mut tx = backend.pool.begin().await?;
    let ts = Utc::now().timestamp();
    let (request, _) = guards_task_sqlite(&mut tx, task_id, ts).await?;
    engaged_record(&mut tx, task_id).await?;
    let task = sets_task_status_sqlite(
        &mut tx,
        task_id,
        TaskStatus::Completed,
        updated_by,
        ts,
    ).await?;
    let (request, successor) = match transition {
        Transition::Successor { activity, role } => {
            let successor = inserts_task_sqlite(
                &mut tx,
                request.id,
                role,
                updated_by,
                activity,
                TaskStatus::NotStarted,
                ts,
            ).await?;
            (request, Some(successor))
        }
        Transition::Complete => (
            sets_request_status_sqlite(
                &mut tx,
                request.id,
                RequestStatus::Completed,
                ts,
            ).await?,
            None,
        ),
    };
    tx.commit().await?;
    Ok(Advanced { request, task, successor })
}

async fn finish_task_sqlite(
    backend: &SqliteBackend,
    task_id: i64,
    updated_by: i64,
) -> Result<Advanced, TaskError> {
    advance_task_sqlite(backend, task_id, updated_by, &Transition::Complete).await
}

async fn rollback_task_sqlite(
    backend: &SqliteBackend,
    task_id: i64,
    updated_by: i64,
) -> Result<RolledBack, TaskError> {
    let mut tx = backend.pool.begin().await?;
    let ts = Utc::now().timestamp();
    let (request, _) = guards_task_sqlite(&mut tx, task_id, ts).await?;
    let predecessor = lists_tasks_sqlite(&mut tx, request.id)
        .await?
        .predecessor(task_id)
        .cloned()
        .ok_or(TaskError::NoPredecessor(task_id))?;
    let record = gets_activity_record_for_task_sqlite(&mut tx, predecessor.id)
        .await?
        .ok_or_else(|| BackendError::AppInvariantViolation(format!(
            "completed task {} has no activity record",
            predecessor.id,
        )))?;

    let previous = sets_task_status_sqlite(
        &mut tx,
        predecessor.id,
        TaskStatus::RolledBack,
        updated_by,
        ts,
    ).await?;
    let current = sets_task_status_sqlite(
        &mut tx,
        task_id,
        TaskStatus::RolledBack,
        updated_by,
        ts,
    ).await?;
    let task = inserts_task_sqlite(
        &mut tx,
        request.id,
        &predecessor.assignee,
        updated_by,
        &predecessor.activity,
        TaskStatus::NotStarted,
        ts,
    ).await?;
    let record = inserts_activity_record_sqlite(
        &mut tx,
        task.id,
        record.clone_for_task(task.id),
        ts,
    ).await?;
    tx.commit().await?;
    log::info!(
        "request {}: rolled back tasks {} and {}; restored as task {}",
        request.id,
        previous.id,
        current.id,
        task.id,
    );
    Ok(RolledBack { previous, current, task, record })
}

#[async_trait]
impl WorkflowBackend for SqliteBackend {
    async fn initiate_request(
        &self,
        requester_id: i64,
        module: &str,
        activity: &str,
        assignee: &Role,
        record: ActivityRecord,
    ) -> Result<Initiated, TaskError> {
        initiate_request_sqlite(&self, requester_id, module, activity, assignee, record).await
    }

    async fn engage_task(
        &self,
        task_id: i64,
        updated_by: i64,
        record: ActivityRecord,
    ) -> Result<Engaged, TaskError> {
        engage_task_sqlite(&self, task_id, updated_by, record).await
    }

    async fn save_activity(
        &self,
        task_id: i64,
        updated_by: i64,
        fields: Fields,
    ) -> Result<Engaged, TaskError> {
        save_activity_sqlite(&self, task_id, updated_by, fields).await
    }

    async fn advance_task(
        &self,
        task_id: i64,
        updated_by: i64,
        transition: &Transition,
    ) -> Result<Advanced, TaskError> {
        advance_task_sqlite(&self, task_id, updated_by, transition).await
    }

    async fn finish_task(
        &self,
        task_id: i64,
        updated_by: i64,
    ) -> Result<Advanced, TaskError> {
        finish_task_sqlite(&self, task_id, updated_by).await
    }

    async fn rollback_task(
        &self,
        task_id: i64,
        updated_by: i64,
    ) -> Result<RolledBack, TaskError> {
        rollback_task_sqlite(&self, task_id, updated_by).await
    }
}
