//! Disk space usage via `statvfs`.

use std::path::{Path, PathBuf};

use hostsense_protocol::DiskUsage;

use crate::TelemetryError;

/// Mount point read when none is configured.
pub const DEFAULT_PATH: &str = "/";

/// Reads space usage of the filesystem holding a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskReader {
    path: PathBuf,
}

impl Default for DiskReader {
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}

impl DiskReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<DiskUsage, TelemetryError> {
        let (total, free, available) = statvfs_bytes(&self.path)?;
        Ok(DiskUsage::new(
            self.path.display().to_string(),
            total,
            free,
            available,
        ))
    }
}

/// Returns (total, free, available) bytes.
#[cfg(unix)]
fn statvfs_bytes(path: &Path) -> Result<(u64, u64, u64), TelemetryError> {
    let stat = nix::sys::statvfs::statvfs(path)
        .map_err(|errno| TelemetryError::io(path, std::io::Error::from(errno)))?;

    // Some filesystems leave f_frsize unset.
    let mut unit = u64::from(stat.fragment_size());
    if unit == 0 {
        unit = u64::from(stat.block_size());
    }

    Ok((
        u64::from(stat.blocks()).saturating_mul(unit),
        u64::from(stat.blocks_free()).saturating_mul(unit),
        u64::from(stat.blocks_available()).saturating_mul(unit),
    ))
}

#[cfg(not(unix))]
fn statvfs_bytes(_path: &Path) -> Result<(u64, u64, u64), TelemetryError> {
    Err(TelemetryError::Unsupported("statvfs"))
}
