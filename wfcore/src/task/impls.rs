use std::{
    fmt,
    ops::Deref,
    str::FromStr,
};
use crate::error::ValueError;
use super::*;

impl From<TaskStatus> for &'static str {
    fn from(status: TaskStatus) -> &'static str {
        match status {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::RolledBack => "Rolled Back",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(<&'static str>::from(*self))
    }
}

impl FromStr for TaskStatus {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Not Started" => Ok(TaskStatus::NotStarted),
            "In Progress" => Ok(TaskStatus::InProgress),
            "Rolled Back" => Ok(TaskStatus::RolledBack),
            "Completed" => Ok(TaskStatus::Completed),
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

impl TaskStatus {
    /// Statuses from which a task may still be worked on.
    pub fn is_open(&self) -> bool {
        matches!(self, TaskStatus::NotStarted | TaskStatus::InProgress)
    }
}

impl From<Vec<Task>> for Tasks {
    fn from(mut args: Vec<Task>) -> Self {
        args.sort_by_key(|task| task.id);
        Self(args)
    }
}

impl<const N: usize> From<[Task; N]> for Tasks {
    fn from(args: [Task; N]) -> Self {
        Vec::from(args).into()
    }
}

impl Deref for Tasks {
    type Target = Vec<Task>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for Tasks {
    type Item = Task;
    type IntoIter = std::vec::IntoIter<Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Tasks {
    /// The most recent task.
    pub fn latest(&self) -> Option<&Task> {
        self.0.last()
    }

    /// The task currently being worked on, which is the most recent
    /// task provided it is neither rolled back nor completed.
    pub fn active(&self) -> Option<&Task> {
        self.latest()
            .filter(|task| task.status.is_open())
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.0.iter().find(|task| task.id == id)
    }

    pub fn is_latest(&self, id: i64) -> bool {
        self.latest()
            .map(|task| task.id == id)
            .unwrap_or(false)
    }

    /// The task immediately before the given task id.
    pub fn previous(&self, id: i64) -> Option<&Task> {
        self.0.iter()
            .rev()
            .find(|task| task.id < id)
    }

    /// The completed task a rollback of the given task id would restore.
    pub fn predecessor(&self, id: i64) -> Option<&Task> {
        self.0.iter()
            .rev()
            .filter(|task| task.id < id)
            .find(|task| task.status == TaskStatus::Completed)
    }
}

#[cfg(feature = "sqlx")]
mod sqlx_impls {
    use sqlx::{
        sqlite::SqliteRow,
        FromRow,
        Row,
    };
    use super::*;

    impl<'c> FromRow<'c, SqliteRow> for Task {
        fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
            let assignee: String = row.try_get("assignee")?;
            let status: String = row.try_get("status")?;
            Ok(Task {
                id: row.try_get("id")?,
                request_id: row.try_get("request_id")?,
                assignee: assignee.into(),
                updated_by: row.try_get("updated_by")?,
                activity: row.try_get("activity")?,
                status: status.parse()
                    .map_err(|e: ValueError| sqlx::Error::Decode(e.into()))?,
                created_ts: row.try_get("created_ts")?,
                updated_ts: row.try_get("updated_ts")?,
            })
        }
    }
}
