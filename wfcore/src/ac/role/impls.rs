use std::{
    collections::BTreeSet,
    fmt,
    ops::Deref,
    str::FromStr,
};
use crate::error::ValueError;
use super::{Role, Roles};

impl Role {
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> String {
        role.0
    }
}

impl FromStr for Role {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(ValueError::Unsupported(s.to_string())),
            s => Ok(Role(s.to_string())),
        }
    }
}

impl Roles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: impl Into<Role>) -> bool {
        self.0.insert(role.into())
    }

    pub fn remove(&mut self, role: &Role) -> bool {
        self.0.remove(role)
    }

    pub fn intersects(&self, other: &Roles) -> bool {
        !self.0.is_disjoint(&other.0)
    }
}

impl Deref for Roles {
    type Target = BTreeSet<Role>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Role> for Roles {
    fn from_iter<I: IntoIterator<Item=Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[&str; N]> for Roles {
    fn from(roles: [&str; N]) -> Self {
        roles.into_iter()
            .map(Role::from)
            .collect()
    }
}

impl IntoIterator for Roles {
    type Item = Role;
    type IntoIter = std::collections::btree_set::IntoIter<Role>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Roles {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut iter = self.0.iter();
        if let Some(role) = iter.next() {
            write!(f, "{role}")?;
        }
        for role in iter {
            write!(f, ", {role}")?;
        }
        Ok(())
    }
}
