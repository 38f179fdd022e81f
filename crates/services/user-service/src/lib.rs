//! User Service Library
//!
//! Users CRUD over HTTP: a generic SeaORM repository, the user repository
//! with email uniqueness, and a user service that scopes a transaction to
//! every call.

pub mod api;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::UserServiceConfig;
use crate::infra::Database;
use crate::service::ScopedUserService;

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &UserServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Build the HTTP application over an open database.
pub fn build_app(db: &Database, config: UserServiceConfig) -> axum::Router {
    let user_service = Arc::new(ScopedUserService::new(db.get_connection()));
    create_router(AppState::new(user_service, config))
}

/// Run the HTTP server with the given configuration.
pub async fn run_server(config: UserServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;

    let addr = config.service.addr();
    let app = build_app(&db, config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("User service listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
