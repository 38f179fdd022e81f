//! System handlers: health and effective configuration.

use std::collections::BTreeMap;
use std::path::Path;

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "0.2.0")]
    pub version: String,
}

/// Settings currently in effect.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigSettings {
    pub version: String,
    pub project_name: String,
    pub database_url: String,
}

/// Configuration report.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigResponse {
    pub env_file_exists: bool,
    /// Key/value pairs parsed from the env file, empty when it is absent
    pub env_file_contents: BTreeMap<String, String>,
    pub current_settings: ConfigSettings,
}

/// Create system routes.
pub fn system_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/config", get(get_config))
}

/// Liveness check with the running version
#[utoipa::path(
    get,
    path = "/system/health",
    tag = "System",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: state.config.version.clone(),
    })
}

/// Report the env file and the active settings
#[utoipa::path(
    get,
    path = "/system/config",
    tag = "System",
    responses(
        (status = 200, description = "Current configuration", body = ConfigResponse)
    )
)]
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let config = &state.config;

    Json(ConfigResponse {
        env_file_exists: config.env_file.exists(),
        env_file_contents: read_env_file(&config.env_file),
        current_settings: ConfigSettings {
            version: config.version.clone(),
            project_name: config.project_name.clone(),
            database_url: config.database.url.clone(),
        },
    })
}

/// Parse `path` as a dotenv file; unreadable lines are skipped.
fn read_env_file(path: &Path) -> BTreeMap<String, String> {
    let Ok(entries) = dotenvy::from_path_iter(path) else {
        return BTreeMap::new();
    };

    entries
        .filter_map(|entry| match entry {
            Ok(pair) => Some(pair),
            Err(e) => {
                tracing::warn!(path = %path.display(), "skipping env file line: {}", e);
                None
            }
        })
        .collect()
}
