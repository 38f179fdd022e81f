//! Application state shared by all handlers.

use std::sync::Arc;

use crate::config::UserServiceConfig;
use crate::service::UserService;

#[derive(Clone)]
pub struct AppState {
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Settings reported by the system endpoints
    pub config: Arc<UserServiceConfig>,
}

impl AppState {
    pub fn new(user_service: Arc<dyn UserService>, config: UserServiceConfig) -> Self {
        Self {
            user_service,
            config: Arc::new(config),
        }
    }
}
