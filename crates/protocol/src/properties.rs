//! Flattening of a [`HostSnapshot`] into Homie-style device properties.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::telemetry::HostSnapshot;

pub const PROP_CPU_TEMPERATURE: &str = "cpu-temperature";
pub const PROP_IP: &str = "ip";
pub const PROP_MAC: &str = "mac";
pub const PROP_DISK_TOTAL: &str = "disk-total";
pub const PROP_DISK_AVAILABLE: &str = "disk-available";
pub const PROP_DISK_USED_PERCENT: &str = "disk-used-percent";

/// A single `(id, value)` pair published by a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProperty {
    pub id: String,
    pub value: String,
}

impl DeviceProperty {
    fn new(id: &str, value: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            value: value.into(),
        }
    }
}

impl fmt::Display for DeviceProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.value)
    }
}

impl HostSnapshot {
    /// Returns the snapshot as device properties. Missing sections are skipped.
    pub fn properties(&self) -> Vec<DeviceProperty> {
        let mut props = Vec::new();

        if let Some(cpu) = &self.cpu {
            props.push(DeviceProperty::new(PROP_CPU_TEMPERATURE, cpu.homie_value()));
        }

        if let Some(net) = &self.network {
            props.push(DeviceProperty::new(PROP_IP, net.ip.to_string()));
            if let Some(mac) = &net.mac {
                props.push(DeviceProperty::new(PROP_MAC, mac.as_str()));
            }
        }

        if let Some(disk) = &self.disk {
            props.push(DeviceProperty::new(
                PROP_DISK_TOTAL,
                disk.total_bytes.to_string(),
            ));
            props.push(DeviceProperty::new(
                PROP_DISK_AVAILABLE,
                disk.available_bytes.to_string(),
            ));
            props.push(DeviceProperty::new(
                PROP_DISK_USED_PERCENT,
                format!("{:.1}", disk.used_percent),
            ));
        }

        props
    }
}
