use std::sync::Arc;
use tempfile::TempDir;
use wfcore::{
    ac::{
        Principal,
        traits::PrincipalBackend,
    },
    platform::{
        ConnectorOption,
        PlatformConnector,
    },
};
use wfctrl::platform::Platform;
use wfdb_sqlite::SqliteBackend;

/// The principals created for the sqlite platform fixture.
pub struct Principals {
    pub submitter: Principal,
    pub reviewer: Principal,
    /// Holds both roles of the sample module.
    pub clerk: Principal,
    pub admin: Principal,
    pub outsider: Principal,
}

async fn principal(
    backend: &dyn PrincipalBackend,
    name: &str,
    elevated: bool,
    roles: &[&str],
) -> anyhow::Result<Principal> {
    let id = backend.add_principal(name, elevated).await?;
    for role in roles {
        backend.grant_role_to_principal(id, &(*role).into()).await?;
    }
    Ok(backend.get_principal_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("principal {name} not created"))?)
}

async fn principals(backend: &dyn PrincipalBackend) -> anyhow::Result<Principals> {
    Ok(Principals {
        submitter: principal(backend, "submitter", false, &["Submitter"]).await?,
        reviewer: principal(backend, "reviewer", false, &["Reviewer"]).await?,
        clerk: principal(backend, "clerk", false, &["Submitter", "Reviewer"]).await?,
        admin: principal(backend, "admin", true, &[]).await?,
        outsider: principal(backend, "outsider", false, &[]).await?,
    })
}

fn platform(backend: SqliteBackend) -> anyhow::Result<Platform> {
    Ok(Platform::new(
        wfsample::registry()?,
        Box::new(wfrbac::Builder::new().build()),
        Arc::new(backend),
    ))
}

/// A controller platform for the sample workflow module over an in
/// memory sqlite database, with a principal for each of its roles.
pub async fn create_sqlite_platform() -> anyhow::Result<(Platform, Principals)> {
    let backend = SqliteBackend::wf("sqlite::memory:".into())
        .await
        .map_err(anyhow::Error::from_boxed)?;
    let principals = principals(&backend).await?;
    Ok((platform(backend)?, principals))
}

/// Two independent controller platforms sharing one sqlite database file,
/// standing in for two processes serving the same storage.
pub async fn create_sqlite_file_platforms() -> anyhow::Result<(
    TempDir,
    Platform,
    Platform,
    Principals,
)> {
    let tempdir = TempDir::new()?;
    let url = format!("sqlite://{}/wf.sqlite", tempdir.path().display());
    let first = SqliteBackend::wf(ConnectorOption::from(&url).auto_create_db(true))
        .await
        .map_err(anyhow::Error::from_boxed)?;
    let second = SqliteBackend::wf(url.into())
        .await
        .map_err(anyhow::Error::from_boxed)?;
    let principals = principals(&first).await?;
    Ok((tempdir, platform(first)?, platform(second)?, principals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[async_std::test]
    async fn smoke_test_create_platform() -> anyhow::Result<()> {
        let (platform, principals) = create_sqlite_platform().await?;
        assert_eq!(platform.modules().collect::<Vec<_>>(), ["sample"]);
        assert!(principals.admin.elevated);
        assert!(principals.clerk.has_role(&"Reviewer".into()));
        Ok(())
    }

    #[async_std::test]
    async fn smoke_test_create_file_platforms() -> anyhow::Result<()> {
        let (tempdir, first, second, principals) = create_sqlite_file_platforms().await?;
        assert!(tempdir.path().join("wf.sqlite").exists());
        let found = second.backend()
            .get_principal_by_name("clerk")
            .await?
            .expect("clerk visible from the second platform");
        assert_eq!(found.id, principals.clerk.id);
        assert_eq!(first.backend().url(), second.backend().url());
        Ok(())
    }
}
