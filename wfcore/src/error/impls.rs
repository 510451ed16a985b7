use std::{
    collections::BTreeMap,
    fmt,
    ops::Deref,
};
use super::*;

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.0.entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn with(
        mut self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.add(field, message);
        self
    }

    /// Messages for the named field, if any.
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Produce `Ok(())` when no messages were collected.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(self))
        }
    }
}

impl Deref for FieldErrors {
    type Target = BTreeMap<String, Vec<String>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.0.iter() {
            for message in messages.iter() {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Error::Validation(ValidationError(errors))
    }
}

impl From<task::TaskError> for Error {
    fn from(error: task::TaskError) -> Self {
        use task::TaskError;
        match error {
            TaskError::NotActive(id) => TransitionDenied::NotActive(id).into(),
            TaskError::NotEngaged(id) => TransitionDenied::NotEngaged(id).into(),
            TaskError::AlreadyEngaged(id) => TransitionDenied::AlreadyEngaged(id).into(),
            TaskError::RequestClosed(id) => TransitionDenied::RequestClosed(id).into(),
            TaskError::NoPredecessor(id) => RollbackNotPermitted::NoPredecessor(id).into(),
            TaskError::Backend(e) => e.into(),
        }
    }
}

impl Error {
    /// Whether this error is an outcome to be rendered to the principal
    /// (denial or field errors), as opposed to a failure of the
    /// configuration or of the infrastructure.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Error::TransitionDenied(_)
                | Error::AccessDenied(_)
                | Error::Validation(_)
                | Error::RollbackNotPermitted(_)
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn field_errors() {
        assert_eq!(FieldErrors::new().into_result(), Ok(()));

        let errors = FieldErrors::new()
            .with("bar", "First character should be capital")
            .with("bar", "Too long")
            .with("baz", "Unknown choice");
        assert_eq!(errors.field("bar").map(<[String]>::len), Some(2));
        assert_eq!(errors.field("qux"), None);
        assert_eq!(
            errors.to_string(),
            "bar: First character should be capital; bar: Too long; baz: Unknown choice",
        );
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn user_visible() {
        let err: Error = TransitionDenied::NotActive(1).into();
        assert!(err.is_user_visible());
        let err: Error = task::TaskError::NoPredecessor(2).into();
        assert!(matches!(
            err,
            Error::RollbackNotPermitted(RollbackNotPermitted::NoPredecessor(2)),
        ));
        assert!(err.is_user_visible());
        let err: Error = ConfigurationError::UnknownModule("nope".into()).into();
        assert!(!err.is_user_visible());
        let err: Error = BackendError::Unknown.into();
        assert!(!err.is_user_visible());
    }
}
