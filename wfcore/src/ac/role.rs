use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A role as named by the operator, e.g. "Submitter" or "Reviewer".
///
/// Roles are plain names; membership is provided by the principal
/// directory and the flow registry names the role required by each
/// activity.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Role(String);

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Roles(BTreeSet<Role>);

mod impls;
