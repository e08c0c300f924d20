//! Health and status handlers

use crate::api::rest::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
    })
}

/// Daemon status response
#[derive(Debug, Serialize, Deserialize)]
pub struct DaemonStatusResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub toolchain: ToolchainStatus,
}

/// Resolved toolchain locations
#[derive(Debug, Serialize, Deserialize)]
pub struct ToolchainStatus {
    pub qat_path: String,
    pub profile_dir: String,
    pub staging_dir: String,
}

/// Daemon status endpoint
pub async fn daemon_status(State(state): State<AppState>) -> Json<DaemonStatusResponse> {
    let toolchain = state.compiler.toolchain();

    Json(DaemonStatusResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
        started_at: state.started_at,
        toolchain: ToolchainStatus {
            qat_path: toolchain.qat_path().display().to_string(),
            profile_dir: toolchain.profile_dir().display().to_string(),
            staging_dir: state.compiler.staging_dir().display().to_string(),
        },
    })
}
