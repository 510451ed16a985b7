use async_trait::async_trait;
use wfcore::{
    ac::{
        Principal,
        Role,
        Roles,
        traits::PrincipalBackend,
    },
    error::BackendError,
};

use crate::{
    SqliteBackend,
    chrono::Utc,
};

async fn add_principal_sqlite(
    backend: &SqliteBackend,
    name: &str,
    elevated: bool,
) -> Result<i64, BackendError> {
    let ts = Utc::now().timestamp();
    let id = sqlx::query(r#"
INSERT INTO principal (
    name,
    elevated,
    created_ts
)
VALUES ( ?1, ?2, ?3 )
        "#)
        .bind(name)
        .bind(elevated)
        .bind(ts)
        .execute(&*backend.pool)
        .await?
        .last_insert_rowid();
    log::info!("added principal {name} as id {id}");
    Ok(id)
}

async fn get_roles_sqlite(
    backend: &SqliteBackend,
    principal_id: i64,
) -> Result<Roles, BackendError> {
    let roles = sqlx::query_scalar::<_, String>(r#"
SELECT
    role
FROM
    principal_role
WHERE
    principal_id = ?1
        "#)
        .bind(principal_id)
        .fetch_all(&*backend.pool)
        .await?;
    Ok(roles.into_iter()
        .map(Role::from)
        .collect())
}

async fn with_roles(
    backend: &SqliteBackend,
    principal: Option<Principal>,
) -> Result<Option<Principal>, BackendError> {
    match principal {
        Some(mut principal) => {
            principal.roles = get_roles_sqlite(backend, principal.id).await?;
            Ok(Some(principal))
        }
        None => Ok(None),
    }
}

async fn get_principal_by_id_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<Principal>, BackendError> {
    let principal = sqlx::query_as::<_, Principal>(r#"
SELECT
    id,
    name,
    elevated,
    created_ts
FROM
    principal
WHERE
    id = ?1
        "#)
        .bind(id)
        .fetch_optional(&*backend.pool)
        .await?;
    with_roles(backend, principal).await
}

async fn get_principal_by_name_sqlite(
    backend: &SqliteBackend,
    name: &str,
) -> Result<Option<Principal>, BackendError> {
    let principal = sqlx::query_as::<_, Principal>(r#"
SELECT
    id,
    name,
    elevated,
    created_ts
FROM
    principal
WHERE
    name = ?1
        "#)
        .bind(name)
        .fetch_optional(&*backend.pool)
        .await?;
    with_roles(backend, principal).await
}

async fn grant_role_to_principal_sqlite(
    backend: &SqliteBackend,
    id: i64,
    role: &Role,
) -> Result<bool, BackendError> {
    let ts = Utc::now().timestamp();
    let rows_affected = sqlx::query(r#"
INSERT OR IGNORE INTO principal_role (
    principal_id,
    role,
    created_ts
)
VALUES ( ?1, ?2, ?3 )
        "#)
        .bind(id)
        .bind(role.as_str())
        .bind(ts)
        .execute(&*backend.pool)
        .await?
        .rows_affected();
    if rows_affected > 0 {
        log::info!("granted role {role} to principal {id}");
    }
    Ok(rows_affected > 0)
}

async fn revoke_role_from_principal_sqlite(
    backend: &SqliteBackend,
    id: i64,
    role: &Role,
) -> Result<bool, BackendError> {
    let rows_affected = sqlx::query(r#"
DELETE FROM
    principal_role
WHERE
    principal_id = ?1 AND
    role = ?2
        "#)
        .bind(id)
        .bind(role.as_str())
        .execute(&*backend.pool)
        .await?
        .rows_affected();
    if rows_affected > 0 {
        log::info!("revoked role {role} from principal {id}");
    }
    Ok(rows_affected > 0)
}

#[async_trait]
impl PrincipalBackend for SqliteBackend {
    async fn add_principal(
        &self,
        name: &str,
        elevated: bool,
    ) -> Result<i64, BackendError> {
        add_principal_sqlite(&self, name, elevated).await
    }

    async fn get_principal_by_id(
        &self,
        id: i64,
    ) -> Result<Option<Principal>, BackendError> {
        get_principal_by_id_sqlite(&self, id).await
    }

    async fn get_principal_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Principal>, BackendError> {
        get_principal_by_name_sqlite(&self, name).await
    }

    async fn grant_role_to_principal(
        &self,
        id: i64,
        role: &Role,
    ) -> Result<bool, BackendError> {
        grant_role_to_principal_sqlite(&self, id, role).await
    }

    async fn revoke_role_from_principal(
        &self,
        id: i64,
        role: &Role,
    ) -> Result<bool, BackendError> {
        revoke_role_from_principal_sqlite(&self, id, role).await
    }
}
