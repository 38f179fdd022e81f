//! Domain layer - Core business entities and payloads.
//!
//! This crate contains pure domain types with no infrastructure dependencies.
//! Persistence mapping lives in the user service's repository layer.

pub mod constants;
pub mod user;

pub use constants::*;
pub use user::{CreateUser, UpdateUser, User, UserId};
