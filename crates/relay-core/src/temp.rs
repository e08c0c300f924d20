//! Uniquely named staging files with drop-time cleanup.

use std::path::{Path, PathBuf};

/// A staging file path owned by exactly one in-flight request.
///
/// Names carry 128 bits of entropy, so concurrent requests never alias each
/// other's files and names are not guessable by other local users. The file
/// is removed when the guard drops; the guard is allocated before any
/// downstream step runs, so every exit path releases the resource, including
/// the request future being dropped by the host on timeout.
#[derive(Debug)]
pub struct TempPath {
    path: PathBuf,
}

impl TempPath {
    /// Staging location for the source program.
    pub fn input(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("qsc-{:032x}.ll", rand::random::<u128>())),
        }
    }

    /// Location the external tool is instructed to write its artifact to.
    pub fn output(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("qsc-{:032x}.bc", rand::random::<u128>())),
        }
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempPath {
    fn drop(&mut self) {
        // The output file does not exist when the tool failed before writing
        // it; that is not a cleanup failure.
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "failed to clean up staging file"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let dir = std::env::temp_dir();
        let a = TempPath::input(&dir);
        let b = TempPath::input(&dir);
        assert_ne!(a.as_path(), b.as_path());
    }

    #[test]
    fn input_and_output_carry_expected_extensions() {
        let dir = std::env::temp_dir();
        let input = TempPath::input(&dir);
        let output = TempPath::output(&dir);
        assert_eq!(input.as_path().extension().unwrap(), "ll");
        assert_eq!(output.as_path().extension().unwrap(), "bc");
        let stem = input.as_path().file_name().unwrap().to_str().unwrap();
        assert!(stem.starts_with("qsc-"));
        // qsc- prefix, 32 hex chars, .ll suffix
        assert_eq!(stem.len(), "qsc-".len() + 32 + ".ll".len());
    }

    #[test]
    fn drop_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let guard = TempPath::input(dir.path());
        std::fs::write(guard.as_path(), b"content").unwrap();
        let path = guard.as_path().to_path_buf();
        drop(guard);
        assert!(!path.exists());
    }

    #[test]
    fn drop_tolerates_a_file_that_was_never_created() {
        let dir = tempfile::tempdir().unwrap();
        let guard = TempPath::output(dir.path());
        drop(guard);
    }
}
