use async_trait::async_trait;
use crate::{
    ac::{
        context::Context,
        operation::{
            Operation,
            Operations,
        },
        principal::Principal,
        role::Role,
    },
    error::{
        AccessDenied,
        BackendError,
    },
};

/// The decision point for access control.
pub trait Enforcer: Send + Sync {
    /// Whether the principal may perform the operation given the
    /// context.
    fn enforce(
        &self,
        principal: &Principal,
        operation: Operation,
        context: &Context,
    ) -> bool;

    /// As `enforce`, but producing the denial to be reported.
    fn authorize(
        &self,
        principal: &Principal,
        operation: Operation,
        context: &Context,
    ) -> Result<(), AccessDenied> {
        if self.enforce(principal, operation, context) {
            Ok(())
        } else {
            log::debug!("principal {} denied {operation} with {context:?}", principal.name);
            Err(AccessDenied {
                operation,
                principal: principal.name.clone(),
            })
        }
    }

    /// All operations the principal may perform given the context.
    fn permitted(
        &self,
        principal: &Principal,
        context: &Context,
    ) -> Operations {
        Operations::all()
            .iter()
            .filter(|operation| self.enforce(principal, *operation, context))
            .collect()
    }
}

/// The principal directory; provides role memberships.
#[async_trait]
pub trait PrincipalBackend {
    async fn add_principal(
        &self,
        name: &str,
        elevated: bool,
    ) -> Result<i64, BackendError>;
    async fn get_principal_by_id(
        &self,
        id: i64,
    ) -> Result<Option<Principal>, BackendError>;
    async fn get_principal_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Principal>, BackendError>;
    async fn grant_role_to_principal(
        &self,
        id: i64,
        role: &Role,
    ) -> Result<bool, BackendError>;
    async fn revoke_role_from_principal(
        &self,
        id: i64,
        role: &Role,
    ) -> Result<bool, BackendError>;
}
