//! HTTP request handlers.

pub mod system_handler;
pub mod user_handler;

pub use system_handler::system_routes;
pub use user_handler::user_routes;
