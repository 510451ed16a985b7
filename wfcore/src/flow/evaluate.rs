use std::collections::BTreeSet;
use crate::{
    ac::Role,
    activity::Fields,
    error::{
        Error,
        TransitionDenied,
        ValidationError,
    },
};
use super::Flow;

/// The legal next steps from an activity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Candidates {
    /// The activity has no transitions; submitting completes the request.
    Terminal,
    /// The targets whose predicates currently hold; may be empty if
    /// none of them hold yet.
    Eligible(BTreeSet<String>),
}

/// The outcome of a permitted submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// A new task is to be created for the activity, assigned to role.
    Successor {
        activity: String,
        role: Role,
    },
    /// The activity is terminal; the request is to be completed.
    Complete,
}

impl Candidates {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Candidates::Terminal)
    }

    pub fn contains(&self, key: &str) -> bool {
        match self {
            Candidates::Terminal => false,
            Candidates::Eligible(targets) => targets.contains(key),
        }
    }
}

impl Flow {
    /// Evaluate every transition of the activity against the fields.
    pub fn candidates(
        &self,
        activity: &str,
        fields: &Fields,
    ) -> Result<Candidates, Error> {
        let def = self.activity(activity)?;
        if def.is_terminal() {
            return Ok(Candidates::Terminal);
        }
        Ok(Candidates::Eligible(
            def.kind.eligible(fields)
                .map_err(ValidationError)?
                .into_iter()
                .map(str::to_string)
                .collect()
        ))
    }

    /// Check that the activity may be submitted to the target, which
    /// must be `None` exactly when the activity is terminal.
    pub fn check_transition(
        &self,
        activity: &str,
        target: Option<&str>,
        fields: &Fields,
    ) -> Result<Transition, Error> {
        let def = self.activity(activity)?;
        let target = match (def.is_terminal(), target) {
            (true, None) => return Ok(Transition::Complete),
            (true, Some(target)) => return Err(TransitionDenied::NotRegistered {
                activity: activity.to_string(),
                target: target.to_string(),
            }.into()),
            (false, None) => return Err(TransitionDenied::NoTarget(
                activity.to_string()
            ).into()),
            (false, Some(target)) => target,
        };
        match def.kind.evaluate(target, fields).map_err(ValidationError)? {
            None => Err(TransitionDenied::NotRegistered {
                activity: activity.to_string(),
                target: target.to_string(),
            }.into()),
            Some(false) => Err(TransitionDenied::PredicateFalse {
                activity: activity.to_string(),
                target: target.to_string(),
            }.into()),
            Some(true) => Ok(Transition::Successor {
                activity: target.to_string(),
                role: self.role_for(target)?.clone(),
            }),
        }
    }
}
