//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::{system_handler, user_handler};
use domain::{CreateUser, UpdateUser, User};

/// OpenAPI documentation for the user service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Service",
        description = "Users CRUD microservice backed by SeaORM"
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        // System endpoints
        system_handler::health_check,
        system_handler::get_config,
        // User endpoints
        user_handler::list_users,
        user_handler::create_user,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
    ),
    components(
        schemas(
            User,
            CreateUser,
            UpdateUser,
            system_handler::HealthResponse,
            system_handler::ConfigResponse,
            system_handler::ConfigSettings,
        )
    ),
    tags(
        (name = "System", description = "Health and configuration"),
        (name = "Users", description = "User management operations")
    )
)]
pub struct ApiDoc;
