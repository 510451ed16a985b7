//! Role-based access control for workflow tasks.
//!
//! The [`Gate`] decides whether a principal may perform an
//! [`Operation`](wfcore::ac::Operation) given the
//! [`Context`](wfcore::ac::Context) of the target request and task.

mod builder;
mod gate;

pub use builder::Builder;
pub use gate::Gate;
