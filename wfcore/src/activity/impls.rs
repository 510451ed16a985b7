use serde::{
    de::DeserializeOwned,
    Serialize,
};
use crate::{
    error::{
        FieldErrors,
        ValueError,
    },
    flow::Flow,
};
use super::*;

/// Key used for messages that cannot be attributed to a single field.
pub const RECORD_FIELD: &str = "__record__";

impl ActivityRecord {
    /// Encode typed activity data as an unsaved record.
    pub fn new<T: Serialize>(title: &str, data: &T) -> Result<Self, ValueError> {
        Ok(Self {
            title: title.to_string(),
            fields: encode(data)?,
            .. Default::default()
        })
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, FieldErrors> {
        decode(&self.fields)
    }

    /// A copy of this record carrying only the field values, linked to
    /// the given task.
    pub fn clone_for_task(&self, task_id: i64) -> Self {
        Self {
            id: 0,
            task_id: Some(task_id),
            title: self.title.clone(),
            fields: self.fields.clone(),
            created_ts: 0,
            updated_ts: 0,
        }
    }

    /// Whether this record is of the type of the initial activity of
    /// the flow.
    pub fn is_initial(&self, flow: &Flow) -> bool {
        flow.initial_title() == self.title
    }

    pub fn code(&self, module: &str) -> String {
        format!("{module}-{}-{}", self.title, self.id)
    }
}

pub(crate) fn encode<T: Serialize>(data: &T) -> Result<Fields, ValueError> {
    match serde_json::to_value(data)? {
        serde_json::Value::Object(fields) => Ok(fields),
        _ => Err(ValueError::Unsupported(
            "activity data must serialize to an object".to_string()
        )),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(fields: &Fields) -> Result<T, FieldErrors> {
    serde_json::from_value(serde_json::Value::Object(fields.clone()))
        .map_err(|e| {
            let message = e.to_string();
            // serde_json reports a missing field as "missing field `name`"
            let field = message.strip_prefix("missing field `")
                .and_then(|s| s.split('`').next())
                .unwrap_or(RECORD_FIELD)
                .to_string();
            FieldErrors::new().with(field, message)
        })
}

#[cfg(feature = "sqlx")]
mod sqlx_impls {
    use sqlx::{
        sqlite::SqliteRow,
        FromRow,
        Row,
    };
    use super::*;

    impl<'c> FromRow<'c, SqliteRow> for ActivityRecord {
        fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
            let fields: String = row.try_get("fields")?;
            Ok(ActivityRecord {
                id: row.try_get("id")?,
                task_id: row.try_get("task_id")?,
                title: row.try_get("title")?,
                fields: serde_json::from_str(&fields)
                    .map_err(|e| sqlx::Error::Decode(e.into()))?,
                created_ts: row.try_get("created_ts")?,
                updated_ts: row.try_get("updated_ts")?,
            })
        }
    }
}
