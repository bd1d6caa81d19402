//! Host telemetry readers for the hostsense agent.
//!
//! Reads CPU temperature, the primary network interface address and disk
//! space usage from kernel interfaces (sysfs, interface enumeration and
//! `statvfs`), either once through a [`Probe`] or periodically through a
//! [`Collector`].

mod collector;
pub mod disk;
mod error;
pub mod network;
mod probe;
pub mod sysfs;
pub mod thermal;

pub use collector::{Collector, SendFn};
pub use disk::DiskReader;
pub use error::TelemetryError;
pub use network::NetworkReader;
pub use probe::{Probe, ProbeConfig};
pub use sysfs::Sysfs;
pub use thermal::{ThermalReader, ThermalSource};

use hostsense_protocol::{CpuTemperature, DiskUsage, NetworkAddress};

/// Reads the CPU temperature from `/sys`, selecting the zone automatically.
pub fn cpu_temperature() -> Result<CpuTemperature, TelemetryError> {
    ThermalReader::new(Sysfs::default(), ThermalSource::Auto).read()
}

/// Reads the primary IPv4 interface address and its MAC.
pub fn network_address() -> Result<NetworkAddress, TelemetryError> {
    NetworkReader::new(Sysfs::default()).read()
}

/// Reads space usage of the filesystem holding `path`.
pub fn disk_usage(path: impl Into<std::path::PathBuf>) -> Result<DiskUsage, TelemetryError> {
    DiskReader::new(path).read()
}
