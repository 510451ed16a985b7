use wfcore::error::{
    AccessDenied,
    BackendError,
    ConfigurationError,
    Error,
    RollbackNotPermitted,
    TransitionDenied,
    ValidationError,
    ValueError,
    task::TaskError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error(transparent)]
    CoreError(#[from] Error),
    #[error(transparent)]
    CtrlError(#[from] CtrlError),
}

#[derive(Debug, PartialEq, Error)]
pub enum CtrlError {
    #[error("unknown request: {0}")]
    UnknownRequest(i64),
    #[error("unknown task: {0}")]
    UnknownTask(i64),
    #[error("unknown principal: {0}")]
    UnknownPrincipal(String),
    /// The route names a module other than the one of the request.
    #[error("expected workflow module {expected}, got {found}")]
    ModuleMismatch {
        expected: String,
        found: String,
    },
    /// The route names an activity type other than the one of the task.
    #[error("expected activity type {expected}, got {found}")]
    TitleMismatch {
        expected: String,
        found: String,
    },
}

macro_rules! via_core_error {
    ($($err:ty),* $(,)?) => {$(
        impl From<$err> for PlatformError {
            fn from(e: $err) -> Self {
                Self::CoreError(e.into())
            }
        }
    )*};
}

via_core_error!(
    AccessDenied,
    BackendError,
    ConfigurationError,
    RollbackNotPermitted,
    TaskError,
    TransitionDenied,
    ValidationError,
    ValueError,
);

impl PlatformError {
    /// Whether the error is to be rendered to the principal rather than
    /// treated as a failure.
    pub fn is_user_visible(&self) -> bool {
        match self {
            Self::CoreError(e) => e.is_user_visible(),
            Self::CtrlError(_) => true,
        }
    }

    pub fn core(&self) -> Option<&Error> {
        match self {
            Self::CoreError(e) => Some(e),
            Self::CtrlError(_) => None,
        }
    }
}
