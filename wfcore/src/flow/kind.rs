use crate::{
    ac::Role,
    activity::{
        Fields,
        RECORD_FIELD,
        impls::{
            decode,
            encode,
        },
        traits::ActivityData,
    },
    error::FieldErrors,
};
use super::Activity;

/// Object safe view of an [`Activity`] so that activities of different
/// data types may be held by the same flow.
pub(crate) trait ActivityKind: Send + Sync {
    fn key(&self) -> &str;
    fn name(&self) -> &str;
    fn role(&self) -> &Role;
    fn title(&self) -> &'static str;
    fn targets(&self) -> Vec<&str>;
    /// Decode and validate the fields, producing the canonical fields.
    fn prepare(&self, fields: &Fields) -> Result<Fields, FieldErrors>;
    /// `None` if there is no transition to the target.
    fn evaluate(&self, target: &str, fields: &Fields) -> Result<Option<bool>, FieldErrors>;
    /// Targets whose predicates hold.
    fn eligible(&self, fields: &Fields) -> Result<Vec<&str>, FieldErrors>;
}

impl<T: ActivityData> Activity<T> {
    fn data(&self, fields: &Fields) -> Result<T, FieldErrors> {
        decode::<T>(fields)
    }
}

impl<T: ActivityData> ActivityKind for Activity<T> {
    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> &Role {
        &self.role
    }

    fn title(&self) -> &'static str {
        T::TITLE
    }

    fn targets(&self) -> Vec<&str> {
        self.transitions.iter()
            .map(|(target, _)| target.as_str())
            .collect()
    }

    fn prepare(&self, fields: &Fields) -> Result<Fields, FieldErrors> {
        let data = self.data(fields)?;
        data.validate()?;
        encode(&data)
            .map_err(|e| FieldErrors::new().with(
                RECORD_FIELD,
                e.to_string(),
            ))
    }

    fn evaluate(&self, target: &str, fields: &Fields) -> Result<Option<bool>, FieldErrors> {
        match self.transitions.iter().find(|(key, _)| key == target) {
            Some((_, predicate)) => Ok(Some(predicate(&self.data(fields)?))),
            None => Ok(None),
        }
    }

    fn eligible(&self, fields: &Fields) -> Result<Vec<&str>, FieldErrors> {
        if self.transitions.is_empty() {
            return Ok(Vec::new());
        }
        let data = self.data(fields)?;
        Ok(self.transitions.iter()
            .filter(|(_, predicate)| predicate(&data))
            .map(|(target, _)| target.as_str())
            .collect())
    }
}
