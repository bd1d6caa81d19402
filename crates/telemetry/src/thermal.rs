//! CPU temperature from `class/thermal` zones, with an hwmon fallback.
//!
//! The sensor path is resolved once per reader and cached for its lifetime
//! (zone numbering is stable per boot on Linux).

use std::path::PathBuf;
use std::sync::OnceLock;

use hostsense_protocol::CpuTemperature;

use crate::TelemetryError;
use crate::sysfs::{Sysfs, read_i64, read_trimmed};

/// Thermal zone `type` values that identify a CPU package sensor.
const CPU_ZONE_TYPES: &[&str] = &[
    "x86_pkg_temp",
    "cpu-thermal",
    "cpu_thermal",
    "soc_thermal",
    "cpu0-thermal",
    "k10temp",
    "coretemp",
];

/// hwmon driver names for CPU sensors (AMD k10temp, Intel coretemp).
const CPU_HWMON_NAMES: &[&str] = &["k10temp", "coretemp"];

/// Which sensor to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThermalSource {
    /// Exactly `class/thermal/thermal_zone<N>/temp`.
    Zone(u32),
    /// Pick the best CPU sensor available.
    #[default]
    Auto,
}

impl From<Option<u32>> for ThermalSource {
    fn from(zone: Option<u32>) -> Self {
        zone.map_or(ThermalSource::Auto, ThermalSource::Zone)
    }
}

/// Reads CPU temperature in degrees Celsius.
#[derive(Debug)]
pub struct ThermalReader {
    sysfs: Sysfs,
    source: ThermalSource,
    resolved: OnceLock<Option<PathBuf>>,
}

impl ThermalReader {
    pub fn new(sysfs: Sysfs, source: ThermalSource) -> Self {
        Self {
            sysfs,
            source,
            resolved: OnceLock::new(),
        }
    }

    pub fn source(&self) -> ThermalSource {
        self.source
    }

    /// Path of the sensor file, or `None` if no CPU sensor exists.
    pub fn sensor_path(&self) -> Option<&PathBuf> {
        self.resolved
            .get_or_init(|| {
                let path = resolve(&self.sysfs, self.source);
                match &path {
                    Some(p) => tracing::debug!(path = %p.display(), "CPU sensor resolved"),
                    None => tracing::debug!("no CPU temperature sensor found"),
                }
                path
            })
            .as_ref()
    }

    /// Like [`sensor_path`](Self::sensor_path), but only if the file exists.
    ///
    /// A fixed `Zone(n)` always resolves to a path, present or not.
    pub fn available_sensor(&self) -> Option<&PathBuf> {
        self.sensor_path().filter(|p| p.exists())
    }

    pub fn read(&self) -> Result<CpuTemperature, TelemetryError> {
        let path = self
            .sensor_path()
            .ok_or_else(|| TelemetryError::NotFound("CPU temperature sensor".into()))?;
        let millis = read_i64(path)?;
        Ok(CpuTemperature::from_millidegrees(
            millis,
            path.display().to_string(),
        ))
    }
}

fn resolve(sysfs: &Sysfs, source: ThermalSource) -> Option<PathBuf> {
    match source {
        ThermalSource::Zone(n) => Some(
            sysfs
                .path("class/thermal")
                .join(format!("thermal_zone{n}"))
                .join("temp"),
        ),
        ThermalSource::Auto => resolve_zone(sysfs).or_else(|| resolve_hwmon(sysfs)),
    }
}

/// Scans thermal zones in numeric order. A zone with a CPU `type` wins,
/// otherwise the lowest-numbered zone that has a `temp` file.
fn resolve_zone(sysfs: &Sysfs) -> Option<PathBuf> {
    let entries = std::fs::read_dir(sysfs.path("class/thermal")).ok()?;

    let mut zones: Vec<(u32, PathBuf)> = entries
        .flatten()
        .filter_map(|e| {
            let name = e.file_name();
            let index = name.to_str()?.strip_prefix("thermal_zone")?.parse().ok()?;
            Some((index, e.path()))
        })
        .filter(|(_, dir)| dir.join("temp").exists())
        .collect();
    zones.sort_by_key(|(index, _)| *index);

    let cpu_zone = zones.iter().find(|(_, dir)| {
        read_trimmed(&dir.join("type")).is_ok_and(|t| CPU_ZONE_TYPES.contains(&t.as_str()))
    });

    cpu_zone
        .or_else(|| zones.first())
        .map(|(_, dir)| dir.join("temp"))
}

fn resolve_hwmon(sysfs: &Sysfs) -> Option<PathBuf> {
    let entries = std::fs::read_dir(sysfs.path("class/hwmon")).ok()?;

    let mut dirs: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    dirs.sort();

    dirs.into_iter()
        .filter(|dir| {
            read_trimmed(&dir.join("name")).is_ok_and(|n| CPU_HWMON_NAMES.contains(&n.as_str()))
        })
        .map(|dir| dir.join("temp1_input"))
        .find(|p| p.exists())
}
