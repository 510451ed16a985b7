pub mod context;
pub mod operation;
pub mod principal;
pub mod role;
pub mod traits;

pub use self::context::Context;
pub use self::operation::{Operation, Operations};
pub use self::principal::Principal;
pub use self::role::{Role, Roles};
