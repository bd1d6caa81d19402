use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// One reading of every host sensor.
///
/// Sections are `None` when the corresponding reader failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSnapshot {
    /// Unix time in milliseconds.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuTemperature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskUsage>,
}

/// CPU temperature from a thermal zone or hwmon sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuTemperature {
    pub celsius: f64,
    /// Sysfs file the value was read from.
    #[serde(default)]
    pub source: String,
}

impl CpuTemperature {
    /// Builds a reading from the raw millidegree value the kernel reports.
    pub fn from_millidegrees(millis: i64, source: impl Into<String>) -> Self {
        Self {
            celsius: millis as f64 / 1000.0,
            source: source.into(),
        }
    }

    /// Temperature as published to the device: degrees with three decimals.
    pub fn homie_value(&self) -> String {
        format!("{:.3}", self.celsius)
    }
}

/// Address of the primary network interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAddress {
    pub interface: String,
    pub ip: Ipv4Addr,
    /// Lowercase `xx:xx:xx:xx:xx:xx`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
}

/// Space usage of the filesystem holding `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskUsage {
    pub path: String,
    pub total_bytes: u64,
    pub free_bytes: u64,
    /// Space available to unprivileged users (excludes reserved blocks).
    pub available_bytes: u64,
    #[serde(default)]
    pub used_percent: f64,
}

impl DiskUsage {
    /// Builds a usage record, deriving `used_percent` from total and free.
    pub fn new(path: impl Into<String>, total: u64, free: u64, available: u64) -> Self {
        let used_percent = if total > 0 {
            let pct = total.saturating_sub(free) as f64 / total as f64 * 100.0;
            (pct * 10.0).floor() / 10.0 // One decimal place.
        } else {
            0.0
        };

        Self {
            path: path.into(),
            total_bytes: total,
            free_bytes: free,
            available_bytes: available,
            used_percent,
        }
    }

    /// Bytes in use (total minus free).
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.free_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homie_value_three_decimals() {
        let t = CpuTemperature::from_millidegrees(45123, "/sys/class/thermal/thermal_zone2/temp");
        assert_eq!(t.homie_value(), "45.123");

        let t = CpuTemperature::from_millidegrees(38000, "");
        assert_eq!(t.homie_value(), "38.000");
    }

    #[test]
    fn negative_millidegrees() {
        let t = CpuTemperature::from_millidegrees(-5500, "");
        assert_eq!(t.celsius, -5.5);
        assert_eq!(t.homie_value(), "-5.500");
    }

    #[test]
    fn disk_usage_percent_floored() {
        // 2/3 used -> 66.666.. -> 66.6
        let d = DiskUsage::new("/", 3000, 1000, 900);
        assert_eq!(d.used_percent, 66.6);
        assert_eq!(d.used_bytes(), 2000);
    }

    #[test]
    fn disk_usage_empty_filesystem() {
        let d = DiskUsage::new("/proc", 0, 0, 0);
        assert_eq!(d.used_percent, 0.0);
        assert_eq!(d.used_bytes(), 0);
    }

    #[test]
    fn snapshot_omits_missing_sections() {
        let snap = HostSnapshot {
            timestamp: 1700000000000,
            cpu: Some(CpuTemperature::from_millidegrees(50000, "zone0")),
            network: None,
            disk: None,
        };
        let json = serde_json::to_string(&snap).unwrap();
        assert!(!json.contains("network"));
        assert!(!json.contains("disk"));

        let parsed: HostSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap, parsed);
    }

    #[test]
    fn field_names_are_camel_case() {
        let d = DiskUsage::new("/", 100, 50, 40);
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"totalBytes\""));
        assert!(json.contains("\"availableBytes\""));
        assert!(json.contains("\"usedPercent\""));

        let n = NetworkAddress {
            interface: "eth0".into(),
            ip: Ipv4Addr::new(192, 168, 1, 20),
            mac: None,
        };
        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains("\"ip\":\"192.168.1.20\""));
        assert!(!json.contains("mac"));
    }
}
