//! Error taxonomy for the compile orchestrator.

use thiserror::Error;

/// Failure classes of a compile transaction.
///
/// All variants are terminal for the request; the orchestrator never retries
/// the external tool. Cleanup failures are logged at the point of cleanup and
/// deliberately have no variant here, since they must never override a result
/// that was already determined.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The caller supplied no source program. Client error.
    #[error("No source code provided")]
    EmptySource,

    /// The decomposition profile for the resolved target is missing or
    /// unreadable at the configured location.
    #[error("decomposition profile {path} is unavailable: {source}")]
    ProfileUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing the source program to its staging file failed.
    #[error("failed to stage input program: {0}")]
    StageInput(std::io::Error),

    /// The external tool could not be launched or exited non-zero. Carries
    /// the tool's captured diagnostic output.
    #[error("QAT failed with: {diagnostics}")]
    ToolFailed { diagnostics: String },

    /// The tool reported success but its output file could not be read.
    #[error("compiled artifact is unreadable: {0}")]
    ArtifactUnreadable(std::io::Error),
}

impl CompileError {
    /// Whether the failure is attributable to the caller's request rather
    /// than the tool or environment.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CompileError::EmptySource)
    }
}
