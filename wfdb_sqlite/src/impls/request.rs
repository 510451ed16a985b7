use async_trait::async_trait;
use sqlx::SqliteConnection;
use wfcore::{
    error::{
        BackendError,
        task::TaskError,
    },
    request::{
        Request,
        RequestStatus,
        Requests,
        traits::RequestBackend,
    },
};

use crate::{
    SqliteBackend,
    chrono::Utc,
};

pub(super) async fn inserts_request_sqlite(
    conn: &mut SqliteConnection,
    requester_id: i64,
    module: &str,
    ts: i64,
) -> Result<Request, BackendError> {
    let status = RequestStatus::Initiated;
    let id = sqlx::query(r#"
INSERT INTO request (
    requester_id,
    module,
    status,
    created_ts,
    updated_ts
)
VALUES ( ?1, ?2, ?3, ?4, ?4 )
        "#)
        .bind(requester_id)
        .bind(module)
        .bind(<&'static str>::from(status))
        .bind(ts)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
    Ok(Request {
        id,
        requester_id,
        module: module.to_string(),
        status,
        created_ts: ts,
        updated_ts: ts,
        tasks: None,
    })
}

/// Writes the request row so that the enclosing transaction holds the
/// write lock for it, then verifies the request is still open.
fn ensures_open(request: Request) -> Result<Request, TaskError> {
    if !request.is_open() {
        log::warn!("request {} is {}; rejecting mutation", request.id, request.status);
        return Err(TaskError::RequestClosed(request.id));
    }
    Ok(request)
}

pub(super) async fn locks_request_sqlite(
    conn: &mut SqliteConnection,
    id: i64,
    ts: i64,
) -> Result<Request, TaskError> {
    let request = sqlx::query_as::<_, Request>(r#"
UPDATE
    request
SET
    updated_ts = ?2
WHERE
    id = ?1
RETURNING
    id,
    requester_id,
    module,
    status,
    created_ts,
    updated_ts
        "#)
        .bind(id)
        .bind(ts)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| BackendError::AppInvariantViolation(format!(
            "request {id} does not exist"
        )))?;
    ensures_open(request)
}

// Locks the request owning the task.  Being a write, this is the first
// statement of its transaction so the database lock is taken up front.
pub(super) async fn locks_request_for_task_sqlite(
    conn: &mut SqliteConnection,
    task_id: i64,
    ts: i64,
) -> Result<Request, TaskError> {
    let request = sqlx::query_as::<_, Request>(r#"
UPDATE
    request
SET
    updated_ts = ?2
WHERE
    id = (SELECT request_id FROM task WHERE id = ?1)
RETURNING
    id,
    requester_id,
    module,
    status,
    created_ts,
    updated_ts
        "#)
        .bind(task_id)
        .bind(ts)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| BackendError::AppInvariantViolation(format!(
            "task {task_id} does not exist"
        )))?;
    ensures_open(request)
}

pub(super) async fn sets_request_status_sqlite(
    conn: &mut SqliteConnection,
    id: i64,
    status: RequestStatus,
    ts: i64,
) -> Result<Request, BackendError> {
    let request = sqlx::query_as::<_, Request>(r#"
UPDATE
    request
SET
    status = ?2,
    updated_ts = ?3
WHERE
    id = ?1
RETURNING
    id,
    requester_id,
    module,
    status,
    created_ts,
    updated_ts
        "#)
        .bind(id)
        .bind(<&'static str>::from(status))
        .bind(ts)
        .fetch_one(&mut *conn)
        .await?;
    log::info!("request {id} is now {status}");
    Ok(request)
}

async fn get_request_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<Request>, BackendError> {
    Ok(sqlx::query_as::<_, Request>(r#"
SELECT
    id,
    requester_id,
    module,
    status,
    created_ts,
    updated_ts
FROM
    request
WHERE
    id = ?1
        "#)
        .bind(id)
        .fetch_optional(&*backend.pool)
        .await?)
}

async fn list_requests_for_module_sqlite(
    backend: &SqliteBackend,
    module: &str,
) -> Result<Requests, BackendError> {
    Ok(sqlx::query_as::<_, Request>(r#"
SELECT
    id,
    requester_id,
    module,
    status,
    created_ts,
    updated_ts
FROM
    request
WHERE
    module = ?1
ORDER BY
    id
        "#)
        .bind(module)
        .fetch_all(&*backend.pool)
        .await?
        .into())
}

async fn list_requests_for_requester_sqlite(
    backend: &SqliteBackend,
    requester_id: i64,
) -> Result<Requests, BackendError> {
    Ok(sqlx::query_as::<_, Request>(r#"
SELECT
    id,
    requester_id,
    module,
    status,
    created_ts,
    updated_ts
FROM
    request
WHERE
    requester_id = ?1
ORDER BY
    id
        "#)
        .bind(requester_id)
        .fetch_all(&*backend.pool)
        .await?
        .into())
}

async fn withdraw_request_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Request, TaskError> {
    let mut tx = backend.pool.begin().await?;
    let ts = Utc::now().timestamp();
    locks_request_sqlite(&mut tx, id, ts).await?;
    let request = sets_request_status_sqlite(
        &mut tx,
        id,
        RequestStatus::Withdrawn,
        ts,
    ).await?;
    tx.commit().await?;
    Ok(request)
}

#[async_trait]
impl RequestBackend for SqliteBackend {
    async fn get_request(
        &self,
        id: i64,
    ) -> Result<Option<Request>, BackendError> {
        get_request_sqlite(&self, id).await
    }

    async fn list_requests_for_module(
        &self,
        module: &str,
    ) -> Result<Requests, BackendError> {
        list_requests_for_module_sqlite(&self, module).await
    }

    async fn list_requests_for_requester(
        &self,
        requester_id: i64,
    ) -> Result<Requests, BackendError> {
        list_requests_for_requester_sqlite(&self, requester_id).await
    }

    async fn withdraw_request(
        &self,
        id: i64,
    ) -> Result<Request, TaskError> {
        withdraw_request_sqlite(&self, id).await
    }
}

#[cfg(test)]
mod tests {
    use wfcore::{
        error::task::TaskError,
        request::{
            Request,
            RequestStatus,
            traits::RequestBackend,
        },
    };
    use test_wf::chrono::set_timestamp;
    use crate::SqliteBackend;
    use super::inserts_request_sqlite;

    #[async_std::test]
    async fn test_request_listing() -> anyhow::Result<()> {
        let backend = SqliteBackend::connect("sqlite::memory:".into())
            .await?
            .migrate()
            .await?;
        let mut conn = backend.pool.acquire().await?;
        inserts_request_sqlite(&mut conn, 1, "tests", 1234567890).await?;
        inserts_request_sqlite(&mut conn, 2, "tests", 1234567890).await?;
        inserts_request_sqlite(&mut conn, 1, "other", 1234567890).await?;
        drop(conn);

        let request = RequestBackend::get_request(&backend, 1).await?
            .expect("request is missing?");
        assert_eq!(request, Request {
            id: 1,
            requester_id: 1,
            module: "tests".into(),
            status: RequestStatus::Initiated,
            created_ts: 1234567890,
            updated_ts: 1234567890,
            tasks: None,
        });
        assert!(RequestBackend::get_request(&backend, 4).await?.is_none());

        let tests = RequestBackend::list_requests_for_module(&backend, "tests").await?;
        assert_eq!(tests.iter().map(|r| r.id).collect::<Vec<_>>(), [1, 2]);
        let mine = RequestBackend::list_requests_for_requester(&backend, 1).await?;
        assert_eq!(mine.iter().map(|r| r.id).collect::<Vec<_>>(), [1, 3]);
        assert_eq!(
            RequestBackend::list_requests_for_module(&backend, "nothing").await?.len(),
            0,
        );
        Ok(())
    }

    #[async_std::test]
    async fn test_withdraw() -> anyhow::Result<()> {
        let backend = SqliteBackend::connect("sqlite::memory:".into())
            .await?
            .migrate()
            .await?;
        let mut conn = backend.pool.acquire().await?;
        inserts_request_sqlite(&mut conn, 1, "tests", 1234567890).await?;
        drop(conn);

        set_timestamp(1234567899);
        let request = RequestBackend::withdraw_request(&backend, 1).await?;
        assert_eq!(request.status, RequestStatus::Withdrawn);
        assert_eq!(request.updated_ts, 1234567899);

        assert!(matches!(
            RequestBackend::withdraw_request(&backend, 1).await,
            Err(TaskError::RequestClosed(1)),
        ));
        assert!(matches!(
            RequestBackend::withdraw_request(&backend, 2).await,
            Err(TaskError::Backend(_)),
        ));
        Ok(())
    }
}
