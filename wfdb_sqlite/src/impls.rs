use async_trait::async_trait;
use wfcore::platform::{
    ConnectorOption,
    PlatformConnector,
    PlatformUrl,
};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

use crate::SqliteBackend;

impl PlatformUrl for SqliteBackend {
    fn url(&self) -> &str {
        self.url.as_ref()
    }
}

impl SqliteBackend {
    pub async fn connect(opts: ConnectorOption) -> Result<SqliteBackend, sqlx::Error> {
        if opts.auto_create_db && !Sqlite::database_exists(&opts.url).await.unwrap_or(false) {
            log::warn!("sqlite database {} does not exist; creating...", &opts.url);
            Sqlite::create_database(&opts.url).await?
        }

        let pool = SqlitePool::connect(&opts.url).await?;
        Ok(SqliteBackend {
            pool: Arc::new(pool),
            url: opts.url,
        })
    }

    pub async fn migrate(self) -> Result<Self, sqlx::Error> {
        sqlx::migrate!("./migrations").run(&*self.pool).await?;
        Ok(self)
    }
}

#[async_trait]
impl PlatformConnector for SqliteBackend {
    async fn wf(opts: ConnectorOption) -> Result<Self, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let backend = SqliteBackend::connect(opts).await
            .map_err(Box::new)?
            .migrate()
            .await
            .map_err(Box::new)?;
        Ok(backend)
    }
}

mod activity;
mod principal;
mod request;
mod task;
mod workflow;

mod default_impl {
    use wfcore::platform::DefaultWFPlatform;
    use crate::SqliteBackend;

    impl DefaultWFPlatform for SqliteBackend {}
}

// For testing unified usage/traits
#[cfg(test)]
pub(crate) mod tests {
    use wfcore::platform::{
        PlatformConnector,
        PlatformRefs,
        PlatformUrl,
    };
    use crate::SqliteBackend;

    #[async_std::test]
    async fn connect() -> anyhow::Result<()> {
        let backend = SqliteBackend::wf("sqlite::memory:".into())
            .await
            .map_err(anyhow::Error::from_boxed)?;
        assert_eq!(backend.url(), "sqlite::memory:");
        assert!(backend.get_request_ref(1).await?.is_none());
        assert!(backend.get_task_ref(1).await?.is_none());
        Ok(())
    }
}
