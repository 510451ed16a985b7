use async_trait::async_trait;
use sqlx::SqliteConnection;
use wfcore::{
    ac::Role,
    error::BackendError,
    task::{
        Task,
        TaskStatus,
        Tasks,
        traits::TaskBackend,
    },
};

use crate::SqliteBackend;

pub(super) async fn inserts_task_sqlite(
    conn: &mut SqliteConnection,
    request_id: i64,
    assignee: &Role,
    updated_by: i64,
    activity: &str,
    status: TaskStatus,
    ts: i64,
) -> Result<Task, BackendError> {
    let id = sqlx::query(r#"
INSERT INTO task (
    request_id,
    assignee,
    updated_by,
    activity,
    status,
    created_ts,
    updated_ts
)
VALUES ( ?1, ?2, ?3, ?4, ?5, ?6, ?6 )
        "#)
        .bind(request_id)
        .bind(assignee.as_str())
        .bind(updated_by)
        .bind(activity)
        .bind(<&'static str>::from(status))
        .bind(ts)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
    log::info!("request {request_id}: task {id} for {activity} assigned to {assignee}");
    Ok(Task {
        id,
        request_id,
        assignee: assignee.clone(),
        updated_by,
        activity: activity.to_string(),
        status,
        created_ts: ts,
        updated_ts: ts,
    })
}

pub(super) async fn sets_task_status_sqlite(
    conn: &mut SqliteConnection,
    id: i64,
    status: TaskStatus,
    updated_by: i64,
    ts: i64,
) -> Result<Task, BackendError> {
    let task = sqlx::query_as::<_, Task>(r#"
UPDATE
    task
SET
    status = ?2,
    updated_by = ?3,
    updated_ts = ?4
WHERE
    id = ?1
RETURNING
    id,
    request_id,
    assignee,
    updated_by,
    activity,
    status,
    created_ts,
    updated_ts
        "#)
        .bind(id)
        .bind(<&'static str>::from(status))
        .bind(updated_by)
        .bind(ts)
        .fetch_one(&mut *conn)
        .await?;
    log::info!("task {id} is now {status}");
    Ok(task)
}

pub(super) async fn gets_task_sqlite(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Task>, BackendError> {
    Ok(sqlx::query_as::<_, Task>(r#"
SELECT
    id,
    request_id,
    assignee,
    updated_by,
    activity,
    status,
    created_ts,
    updated_ts
FROM
    task
WHERE
    id = ?1
        "#)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?)
}

pub(super) async fn lists_tasks_sqlite(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<Tasks, BackendError> {
    Ok(sqlx::query_as::<_, Task>(r#"
SELECT
    id,
    request_id,
    assignee,
    updated_by,
    activity,
    status,
    created_ts,
    updated_ts
FROM
    task
WHERE
    request_id = ?1
ORDER BY
    id
        "#)
        .bind(request_id)
        .fetch_all(&mut *conn)
        .await?
        .into())
}

#[async_trait]
impl TaskBackend for SqliteBackend {
    async fn get_task(
        &self,
        id: i64,
    ) -> Result<Option<Task>, BackendError> {
        let mut conn = self.pool.acquire().await?;
        gets_task_sqlite(&mut conn, id).await
    }

    async fn list_tasks_for_request(
        &self,
        request_id: i64,
    ) -> Result<Tasks, BackendError> {
        let mut conn = self.pool.acquire().await?;
        lists_tasks_sqlite(&mut conn, request_id).await
    }
}
