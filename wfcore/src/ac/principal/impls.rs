use crate::ac::role::Role;
use super::Principal;

impl Principal {
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}

#[cfg(feature = "sqlx")]
mod sqlx_impls {
    use sqlx::{
        sqlite::SqliteRow,
        FromRow,
        Row,
    };
    use crate::ac::role::Roles;
    use super::Principal;

    // roles are stored separately and are attached by the backend.
    impl<'c> FromRow<'c, SqliteRow> for Principal {
        fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
            Ok(Principal {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                elevated: row.try_get("elevated")?,
                created_ts: row.try_get("created_ts")?,
                roles: Roles::new(),
            })
        }
    }
}
