use thiserror::Error;

/// Conditions detected by a backend while holding the request lock.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task {0} is not the latest task of its request")]
    NotActive(i64),
    #[error("task {0} has no activity record")]
    NotEngaged(i64),
    #[error("task {0} already has an activity record")]
    AlreadyEngaged(i64),
    #[error("request {0} is not open")]
    RequestClosed(i64),
    #[error("task {0} has no completed predecessor")]
    NoPredecessor(i64),
    #[error(transparent)]
    Backend(#[from] crate::error::BackendError),
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for TaskError {
    fn from(error: sqlx::Error) -> Self {
        TaskError::Backend(error.into())
    }
}
