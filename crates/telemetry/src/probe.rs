use std::path::PathBuf;

use hostsense_protocol::HostSnapshot;

use crate::disk::{self, DiskReader};
use crate::network::{DEFAULT_EXCLUDED_PREFIXES, NetworkReader};
use crate::sysfs::{self, Sysfs};
use crate::thermal::{ThermalReader, ThermalSource};

/// Settings for building a [`Probe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub sysfs_root: PathBuf,
    /// Fixed thermal zone; `None` selects one automatically.
    pub thermal_zone: Option<u32>,
    pub excluded_interfaces: Vec<String>,
    pub disk_path: PathBuf,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            sysfs_root: PathBuf::from(sysfs::DEFAULT_ROOT),
            thermal_zone: None,
            excluded_interfaces: DEFAULT_EXCLUDED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            disk_path: PathBuf::from(disk::DEFAULT_PATH),
        }
    }
}

/// Reads every host sensor into a [`HostSnapshot`].
#[derive(Debug)]
pub struct Probe {
    thermal: ThermalReader,
    network: NetworkReader,
    disk: DiskReader,
}

impl Default for Probe {
    fn default() -> Self {
        Self::new(ProbeConfig::default())
    }
}

impl Probe {
    pub fn new(config: ProbeConfig) -> Self {
        let sysfs = Sysfs::new(config.sysfs_root);
        Self {
            thermal: ThermalReader::new(sysfs.clone(), ThermalSource::from(config.thermal_zone)),
            network: NetworkReader::new(sysfs).with_excluded_prefixes(config.excluded_interfaces),
            disk: DiskReader::new(config.disk_path),
        }
    }

    pub fn thermal(&self) -> &ThermalReader {
        &self.thermal
    }

    pub fn network(&self) -> &NetworkReader {
        &self.network
    }

    pub fn disk(&self) -> &DiskReader {
        &self.disk
    }

    /// Takes one snapshot. A reader that fails leaves its section empty.
    pub fn snapshot(&self) -> HostSnapshot {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        let cpu = self
            .thermal
            .read()
            .inspect_err(|e| tracing::debug!(error = %e, "CPU temperature unavailable"))
            .ok();

        let network = self
            .network
            .read()
            .inspect_err(|e| tracing::debug!(error = %e, "network address unavailable"))
            .ok();

        let disk = self
            .disk
            .read()
            .inspect_err(|e| tracing::debug!(error = %e, "disk usage unavailable"))
            .ok();

        HostSnapshot {
            timestamp,
            cpu,
            network,
            disk,
        }
    }
}
