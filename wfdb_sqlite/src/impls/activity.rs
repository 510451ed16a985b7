use async_trait::async_trait;
use sqlx::SqliteConnection;
use wfcore::{
    activity::{
        ActivityRecord,
        Fields,
        traits::ActivityBackend,
    },
    error::BackendError,
};

use crate::SqliteBackend;

fn fields_json(fields: &Fields) -> String {
    serde_json::Value::Object(fields.clone()).to_string()
}

pub(super) async fn inserts_activity_record_sqlite(
    conn: &mut SqliteConnection,
    task_id: i64,
    record: ActivityRecord,
    ts: i64,
) -> Result<ActivityRecord, BackendError> {
    if record.id > 0 {
        log::warn!("got an existing id for activity record: {}", record.id);
    }
    let id = sqlx::query(r#"
INSERT INTO activity_record (
    task_id,
    title,
    fields,
    created_ts,
    updated_ts
)
VALUES ( ?1, ?2, ?3, ?4, ?4 )
        "#)
        .bind(task_id)
        .bind(record.title.as_str())
        .bind(fields_json(&record.fields))
        .bind(ts)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
    log::info!("task {task_id}: bound {} record {id}", record.title);
    Ok(ActivityRecord {
        id,
        task_id: Some(task_id),
        title: record.title,
        fields: record.fields,
        created_ts: ts,
        updated_ts: ts,
    })
}

pub(super) async fn updates_activity_fields_sqlite(
    conn: &mut SqliteConnection,
    id: i64,
    fields: &Fields,
    ts: i64,
) -> Result<ActivityRecord, BackendError> {
    Ok(sqlx::query_as::<_, ActivityRecord>(r#"
UPDATE
    activity_record
SET
    fields = ?2,
    updated_ts = ?3
WHERE
    id = ?1
RETURNING
    id,
    task_id,
    title,
    fields,
    created_ts,
    updated_ts
        "#)
        .bind(id)
        .bind(fields_json(fields))
        .bind(ts)
        .fetch_one(&mut *conn)
        .await?)
}

pub(super) async fn gets_activity_record_for_task_sqlite(
    conn: &mut SqliteConnection,
    task_id: i64,
) -> Result<Option<ActivityRecord>, BackendError> {
    Ok(sqlx::query_as::<_, ActivityRecord>(r#"
SELECT
    id,
    task_id,
    title,
    fields,
    created_ts,
    updated_ts
FROM
    activity_record
WHERE
    task_id = ?1
        "#)
        .bind(task_id)
        .fetch_optional(&mut *conn)
        .await?)
}

async fn get_activity_record_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<ActivityRecord>, BackendError> {
    Ok(sqlx::query_as::<_, ActivityRecord>(r#"
SELECT
    id,
    task_id,
    title,
    fields,
    created_ts,
    updated_ts
FROM
    activity_record
WHERE
    id = ?1
        "#)
        .bind(id)
        .fetch_optional(&*backend.pool)
        .await?)
}

#[async_trait]
impl ActivityBackend for SqliteBackend {
    async fn get_activity_record(
        &self,
        id: i64,
    ) -> Result<Option<ActivityRecord>, BackendError> {
        get_activity_record_sqlite(&self, id).await
    }

    async fn get_activity_record_for_task(
        &self,
        task_id: i64,
    ) -> Result<Option<ActivityRecord>, BackendError> {
        let mut conn = self.pool.acquire().await?;
        gets_activity_record_for_task_sqlite(&mut conn, task_id).await
    }
}
