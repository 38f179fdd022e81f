//! Service layer - user use cases over the repository layer.

mod scoped;
mod user_service;

pub use scoped::{ScopedUserService, TransactionContext};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
