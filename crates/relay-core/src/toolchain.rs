//! Location of the external `qat` binary and its decomposition profiles.

use crate::target::HardwareTarget;
use std::path::{Path, PathBuf};

/// Immutable description of the deployed tool.
///
/// Resolved once at process startup and passed into the [`Compiler`]
/// explicitly; never mutated afterwards. That the binary is actually
/// invocable at this path is a deployment precondition, not something the
/// orchestrator ensures.
///
/// [`Compiler`]: crate::Compiler
#[derive(Debug, Clone)]
pub struct Toolchain {
    qat_path: PathBuf,
    profile_dir: PathBuf,
}

impl Toolchain {
    pub fn new(qat_path: impl Into<PathBuf>, profile_dir: impl Into<PathBuf>) -> Self {
        Self {
            qat_path: qat_path.into(),
            profile_dir: profile_dir.into(),
        }
    }

    /// Locate the bundled tool under `<bundle>/<os>/<arch>/`.
    ///
    /// The deployment bundle ships one platform directory per supported
    /// host, with the decomposition profiles sitting next to the binary.
    pub fn discover(bundle_dir: &Path) -> Self {
        let bin_dir = bundle_dir
            .join(std::env::consts::OS)
            .join(std::env::consts::ARCH);
        Self {
            qat_path: bin_dir.join("qat"),
            profile_dir: bin_dir,
        }
    }

    pub fn qat_path(&self) -> &Path {
        &self.qat_path
    }

    pub fn profile_dir(&self) -> &Path {
        &self.profile_dir
    }

    /// Profile file for `target`. Total over both supported targets; there
    /// is no "no profile" state.
    pub fn profile_path(&self, target: HardwareTarget) -> PathBuf {
        self.profile_dir.join(target.profile_file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_uses_platform_directory() {
        let tc = Toolchain::discover(Path::new("/opt/relay"));
        let expected = Path::new("/opt/relay")
            .join(std::env::consts::OS)
            .join(std::env::consts::ARCH);
        assert_eq!(tc.qat_path(), expected.join("qat"));
        assert_eq!(tc.profile_dir(), expected);
    }

    #[test]
    fn profile_path_maps_each_target_to_its_own_file() {
        let tc = Toolchain::new("/opt/relay/qat", "/opt/relay/profiles");
        let rigetti = tc.profile_path(HardwareTarget::Rigetti);
        let quantinuum = tc.profile_path(HardwareTarget::Quantinuum);
        assert_eq!(rigetti, Path::new("/opt/relay/profiles/decomp_b340.ll"));
        assert_eq!(quantinuum, Path::new("/opt/relay/profiles/decomp_7ee0.ll"));
        assert_ne!(rigetti, quantinuum);
    }

    #[test]
    fn default_target_resolves_to_default_profile() {
        let tc = Toolchain::new("/opt/relay/qat", "/opt/relay/profiles");
        assert_eq!(
            tc.profile_path(HardwareTarget::from_header(Some("ionq"))),
            tc.profile_path(HardwareTarget::Rigetti)
        );
    }
}
