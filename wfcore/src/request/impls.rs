use std::{
    fmt,
    ops::Deref,
    str::FromStr,
};
use crate::error::ValueError;
use super::*;

impl From<RequestStatus> for &'static str {
    fn from(status: RequestStatus) -> &'static str {
        match status {
            RequestStatus::Initiated => "Initiated",
            RequestStatus::Withdrawn => "Withdrawn",
            RequestStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(<&'static str>::from(*self))
    }
}

impl FromStr for RequestStatus {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Initiated" => Ok(RequestStatus::Initiated),
            "Withdrawn" => Ok(RequestStatus::Withdrawn),
            "Completed" => Ok(RequestStatus::Completed),
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

impl Request {
    /// Only an initiated request accepts further mutations.
    pub fn is_open(&self) -> bool {
        self.status == RequestStatus::Initiated
    }
}

impl From<Vec<Request>> for Requests {
    fn from(args: Vec<Request>) -> Self {
        Self(args)
    }
}

impl<const N: usize> From<[Request; N]> for Requests {
    fn from(args: [Request; N]) -> Self {
        Self(args.into())
    }
}

impl Deref for Requests {
    type Target = Vec<Request>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for Requests {
    type Item = Request;
    type IntoIter = std::vec::IntoIter<Request>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
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

    impl<'c> FromRow<'c, SqliteRow> for Request {
        fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
            let status: String = row.try_get("status")?;
            Ok(Request {
                id: row.try_get("id")?,
                requester_id: row.try_get("requester_id")?,
                module: row.try_get("module")?,
                status: status.parse()
                    .map_err(|e: ValueError| sqlx::Error::Decode(e.into()))?,
                created_ts: row.try_get("created_ts")?,
                updated_ts: row.try_get("updated_ts")?,
                tasks: None,
            })
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;
    use super::*;

    #[test]
    fn status() -> anyhow::Result<()> {
        assert_eq!(RequestStatus::Withdrawn.to_string(), "Withdrawn");
        assert_eq!(RequestStatus::from_str("Completed")?, RequestStatus::Completed);
        assert!(RequestStatus::from_str("completed").is_err());
        assert_eq!(
            RequestStatus::from_str("Draft").unwrap_or_default(),
            RequestStatus::Initiated,
        );
        Ok(())
    }

    #[test]
    fn is_open() {
        let mut request = Request::default();
        assert!(request.is_open());
        request.status = RequestStatus::Withdrawn;
        assert!(!request.is_open());
        request.status = RequestStatus::Completed;
        assert!(!request.is_open());
    }
}
