use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};

/// The operations gated by access control.
#[derive(Debug, EnumSetType, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Initiate a new request, or engage the activity of a new task.
    Create,
    /// Display an activity and its task.
    View,
    /// Save, submit or finish the activity of the active task.
    Update,
    /// Roll the active task back to its predecessor.
    Rollback,
}

pub type Operations = EnumSet<Operation>;

mod impls;
