use wfcore::ac::{
    Context,
    Operation,
    Principal,
    traits::Enforcer,
};

pub struct Gate {
    pub(crate) elevated_bypass: bool,
    pub(crate) requester_view: bool,
}

impl Gate {
    fn is_assignee(principal: &Principal, context: &Context) -> bool {
        context.assignee
            .as_ref()
            .map(|role| principal.has_role(role))
            .unwrap_or(false)
    }

    fn is_requester(principal: &Principal, context: &Context) -> bool {
        context.requester_id == Some(principal.id)
    }
}

impl Enforcer for Gate {
    fn enforce(
        &self,
        principal: &Principal,
        operation: Operation,
        context: &Context,
    ) -> bool {
        if self.elevated_bypass && principal.elevated {
            return true;
        }
        let result = match operation {
            Operation::View => Self::is_assignee(principal, context)
                || (self.requester_view && Self::is_requester(principal, context)),
            Operation::Create => context.required_role
                .as_ref()
                .map(|role| principal.has_role(role))
                .unwrap_or(false),
            // historical tasks are never updatable
            Operation::Update => context.is_active
                && Self::is_assignee(principal, context),
            Operation::Rollback => context.is_active
                && context.rollback_possible
                && Self::is_assignee(principal, context),
        };
        log::trace!("{operation} for principal {}: {result}", principal.name);
        result
    }
}
