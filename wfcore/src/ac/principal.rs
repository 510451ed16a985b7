use serde::{Deserialize, Serialize};
use super::role::Roles;

/// The acting principal as resolved by the principal directory.
///
/// An elevated principal passes every access check.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Principal {
    pub id: i64,
    pub name: String,
    pub elevated: bool,
    pub created_ts: i64,
    pub roles: Roles,
}

mod impls;
