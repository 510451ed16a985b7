pub use wfcore::platform::ConnectorOption;
use wfcore::platform::WFPlatform;
#[cfg(feature = "sqlite")]
use wfcore::platform::PlatformConnector;
#[cfg(feature = "sqlite")]
use wfdb_sqlite::SqliteBackend;
use std::sync::Arc;

pub struct Backend;

#[derive(Clone, Debug, PartialEq)]
pub struct Error(String);

#[derive(Debug)]
enum BackendKind {
    Sqlite,
}

mod display {
    use super::{BackendKind, Error};
    use std::fmt::{Display, Formatter, Result};

    impl Display for BackendKind {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            match self {
                Self::Sqlite => "sqlite".fmt(f),
            }
        }
    }

    impl Display for Error {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            self.0.fmt(f)
        }
    }

    impl std::error::Error for Error {}
}

impl TryFrom<&str> for BackendKind {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.split(':').next() {
            Some("sqlite") => Ok(BackendKind::Sqlite),
            _ => Err(Error(format!("The connection string {s:?} is unsupported.")))
        }
    }
}

impl Backend {
    /// Connect to the workflow platform at the url of the option,
    /// running any outstanding migrations.
    pub async fn platform(
        opts: impl Into<ConnectorOption> + Send,
    ) -> Result<Arc<dyn WFPlatform>, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let opts = opts.into();
        match BackendKind::try_from(opts.url.as_str()) {
            #[cfg(feature = "sqlite")]
            Ok(BackendKind::Sqlite) => Ok(Arc::new(SqliteBackend::wf(opts).await?)),
            #[cfg(not(feature = "sqlite"))]
            Ok(s) => Err(Box::new(Error(format!(
                "The feature {s:?} must be enabled for wfdb in order to connect to {:?}",
                opts.url,
            )))),
            Err(e) => Err(Box::new(e)),
        }
    }
}

#[cfg(test)]
mod testing {
    use crate::Backend;

    #[async_std::test]
    async fn smoke() {
        assert!(Backend::platform("unsupported").await.is_err());
        assert!(Backend::platform("postgres://localhost/wf").await.is_err());
    }

    #[cfg(feature = "sqlite")]
    #[async_std::test]
    async fn smoke_sqlite() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let platform = Backend::platform("sqlite::memory:").await?;
        let id = platform.add_principal("alice", false).await?;
        assert_eq!(
            platform.get_principal_by_id(id).await?.map(|p| p.name),
            Some("alice".to_string()),
        );
        assert_eq!(platform.url(), "sqlite::memory:");
        Ok(())
    }
}
