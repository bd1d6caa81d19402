//! Access to a sysfs tree rooted at a configurable directory.
//!
//! Readers never touch `/sys` directly; they resolve paths through a
//! [`Sysfs`] so they can be pointed at a fixture tree.

use std::path::{Path, PathBuf};

use crate::TelemetryError;

/// Default mount point of sysfs.
pub const DEFAULT_ROOT: &str = "/sys";

/// A sysfs mount point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sysfs {
    root: PathBuf,
}

impl Default for Sysfs {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl Sysfs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins a path relative to the sysfs root (e.g. `class/thermal`).
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }
}

/// Reads a file and trims whitespace.
pub(crate) fn read_trimmed(path: &Path) -> Result<String, TelemetryError> {
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| TelemetryError::io(path, e))
}

/// Reads a file as i64.
pub(crate) fn read_i64(path: &Path) -> Result<i64, TelemetryError> {
    let value = read_trimmed(path)?;
    value.parse().map_err(|_| TelemetryError::Parse {
        path: path.to_path_buf(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_root_is_sys() {
        assert_eq!(Sysfs::default().root(), Path::new("/sys"));
        assert_eq!(
            Sysfs::default().path("class/net"),
            PathBuf::from("/sys/class/net")
        );
    }

    #[test]
    fn read_i64_trims_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temp");
        std::fs::write(&path, "45000\n").unwrap();
        assert_eq!(read_i64(&path).unwrap(), 45000);
    }

    #[test]
    fn read_i64_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temp");
        std::fs::write(&path, "hot\n").unwrap();
        match read_i64(&path) {
            Err(TelemetryError::Parse { value, .. }) => assert_eq!(value, "hot"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn read_trimmed_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_trimmed(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, TelemetryError::Io { .. }));
    }
}
