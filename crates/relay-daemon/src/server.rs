//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::{DaemonConfig, ToolchainConfig};
use crate::error::{DaemonError, DaemonResult};
use qir_relay_core::{Compiler, Toolchain};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Relay daemon server
pub struct Server {
    config: DaemonConfig,
    compiler: Arc<Compiler>,
}

impl Server {
    /// Create a new server with the given configuration.
    ///
    /// The toolchain is resolved once, here; request handlers receive it as
    /// an immutable value.
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let toolchain = resolve_toolchain(&config.toolchain);
        tracing::info!(
            qat = %toolchain.qat_path().display(),
            profiles = %toolchain.profile_dir().display(),
            "toolchain resolved"
        );

        let staging_dir = config
            .toolchain
            .staging_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let compiler = Arc::new(Compiler::new(toolchain, staging_dir));

        Ok(Self { config, compiler })
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.proxy.upstream_timeout_secs))
            .no_proxy()
            .build()
            .map_err(|err| DaemonError::Server(err.to_string()))?;

        let state = AppState::new(self.compiler.clone(), http);
        let app = create_router(state, &self.config.server);

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("relay daemon listening on {}", addr);

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|err| DaemonError::Server(err.to_string()))?;

        tracing::info!("relay daemon shutting down");
        Ok(())
    }
}

/// Resolve the toolchain from configuration, falling back to platform
/// discovery next to the deployed binary.
fn resolve_toolchain(config: &ToolchainConfig) -> Toolchain {
    let bundle_dir = config.bundle_dir.clone().unwrap_or_else(default_bundle_dir);
    let discovered = Toolchain::discover(&bundle_dir);

    let qat_path = config
        .qat_path
        .clone()
        .unwrap_or_else(|| discovered.qat_path().to_path_buf());
    let profile_dir = config
        .profile_dir
        .clone()
        .unwrap_or_else(|| discovered.profile_dir().to_path_buf());

    Toolchain::new(qat_path, profile_dir)
}

/// Directory the daemon binary was deployed into; the platform bundle sits
/// next to it.
fn default_bundle_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_override_discovery() {
        let config = ToolchainConfig {
            qat_path: Some(PathBuf::from("/opt/tools/qat")),
            profile_dir: Some(PathBuf::from("/opt/profiles")),
            ..Default::default()
        };
        let toolchain = resolve_toolchain(&config);
        assert_eq!(toolchain.qat_path(), Path::new("/opt/tools/qat"));
        assert_eq!(toolchain.profile_dir(), Path::new("/opt/profiles"));
    }

    #[test]
    fn bundle_dir_drives_platform_discovery() {
        let config = ToolchainConfig {
            bundle_dir: Some(PathBuf::from("/srv/bundle")),
            ..Default::default()
        };
        let toolchain = resolve_toolchain(&config);
        let expected = Path::new("/srv/bundle")
            .join(std::env::consts::OS)
            .join(std::env::consts::ARCH);
        assert_eq!(toolchain.qat_path(), expected.join("qat"));
        assert_eq!(toolchain.profile_dir(), expected);
    }
}
