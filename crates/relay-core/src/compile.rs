//! The compile transaction: stage, invoke, collect, clean up.

use crate::error::CompileError;
use crate::target::HardwareTarget;
use crate::temp::TempPath;
use crate::toolchain::Toolchain;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;

/// Attribute name `qat` uses to locate the program entry point.
const ENTRY_POINT_ATTR: &str = "entry_point";

/// Stateless compile orchestrator.
///
/// One instance is shared across all requests; it holds only immutable
/// configuration. Per-request state lives entirely on the stack of
/// [`Compiler::compile`], so concurrent calls never interfere beyond the
/// filesystem namespace, where entropy-unique staging names are the sole
/// discipline needed.
#[derive(Debug)]
pub struct Compiler {
    toolchain: Toolchain,
    staging_dir: PathBuf,
}

impl Compiler {
    pub fn new(toolchain: Toolchain, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            toolchain,
            staging_dir: staging_dir.into(),
        }
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Run the external optimizer against `source` for `target`.
    ///
    /// On success the returned bytes are the tool's output file, unmodified.
    /// Both staging files are removed on every exit path; a failed removal is
    /// logged and never masks the result determined here.
    pub async fn compile(
        &self,
        source: &[u8],
        target: HardwareTarget,
    ) -> Result<Vec<u8>, CompileError> {
        if source.is_empty() {
            // Caller error; no staging file may exist for an empty body.
            return Err(CompileError::EmptySource);
        }

        let profile = self.toolchain.profile_path(target);
        tracing::info!(%target, profile = %profile.display(), "hardware target resolved");

        // Guards are allocated before any downstream step so that every exit
        // path, including this future being dropped by the host, releases
        // both files.
        let input = TempPath::input(&self.staging_dir);
        let output = TempPath::output(&self.staging_dir);

        tokio::fs::write(input.as_path(), source)
            .await
            .map_err(CompileError::StageInput)?;

        let staged = tokio::fs::metadata(input.as_path())
            .await
            .map_err(CompileError::StageInput)?;
        tracing::debug!(path = %input.as_path().display(), size = staged.len(), "input staged");

        let profile_meta =
            tokio::fs::metadata(&profile)
                .await
                .map_err(|err| CompileError::ProfileUnavailable {
                    path: profile.display().to_string(),
                    source: err,
                })?;
        tracing::debug!(path = %profile.display(), size = profile_meta.len(), "profile present");

        let run = Command::new(self.toolchain.qat_path())
            .arg("--apply")
            .arg("--always-inline")
            .arg("--no-disable-record-output-support")
            .arg("--entry-point-attr")
            .arg(ENTRY_POINT_ATTR)
            .arg("--output")
            .arg(output.as_path())
            .arg(input.as_path())
            .arg(&profile)
            .output()
            .await;

        let tool_output = match run {
            Ok(out) => out,
            Err(err) => {
                return Err(CompileError::ToolFailed {
                    diagnostics: format!(
                        "failed to launch {}: {}",
                        self.toolchain.qat_path().display(),
                        err
                    ),
                });
            }
        };

        if !tool_output.status.success() {
            // The output file is never read on failure.
            return Err(CompileError::ToolFailed {
                diagnostics: diagnostics_text(&tool_output),
            });
        }

        if !tool_output.stderr.is_empty() {
            tracing::warn!(
                stderr = %String::from_utf8_lossy(&tool_output.stderr),
                "qat wrote to stderr on success"
            );
        }
        if !tool_output.stdout.is_empty() {
            tracing::debug!(stdout = %String::from_utf8_lossy(&tool_output.stdout), "qat stdout");
        }

        // A reported success with an unreadable output file is a fault, not
        // an empty artifact.
        let artifact = tokio::fs::read(output.as_path())
            .await
            .map_err(CompileError::ArtifactUnreadable)?;
        tracing::info!(size = artifact.len(), "artifact read");

        Ok(artifact)
    }
}

/// Human-readable failure text assembled from the tool's exit status and
/// captured streams.
fn diagnostics_text(output: &Output) -> String {
    let mut text = format!("qat exited with {}", output.status);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        text.push('\n');
        text.push_str(stderr.trim());
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        text.push('\n');
        text.push_str(stdout.trim());
    }
    text
}
