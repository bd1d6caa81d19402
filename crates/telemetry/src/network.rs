//! Primary network interface: first IPv4 address outside the excluded
//! interface prefixes, with its MAC from `class/net/<iface>/address`.

use std::net::{IpAddr, Ipv4Addr};

use hostsense_protocol::NetworkAddress;

use crate::TelemetryError;
use crate::sysfs::{Sysfs, read_trimmed};

/// Interface name prefixes skipped by default (loopback, container bridges).
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &["lo", "docker"];

/// Reads the address of the primary network interface.
#[derive(Debug, Clone)]
pub struct NetworkReader {
    sysfs: Sysfs,
    excluded_prefixes: Vec<String>,
}

impl NetworkReader {
    pub fn new(sysfs: Sysfs) -> Self {
        Self {
            sysfs,
            excluded_prefixes: DEFAULT_EXCLUDED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// Replaces the excluded interface name prefixes.
    pub fn with_excluded_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.excluded_prefixes = prefixes;
        self
    }

    pub fn excluded_prefixes(&self) -> &[String] {
        &self.excluded_prefixes
    }

    pub fn read(&self) -> Result<NetworkAddress, TelemetryError> {
        let interfaces = if_addrs::get_if_addrs().map_err(TelemetryError::Interfaces)?;

        let candidates = interfaces.into_iter().filter_map(|iface| match iface.ip() {
            IpAddr::V4(ip) => Some((iface.name, ip)),
            IpAddr::V6(_) => None,
        });

        self.select(candidates)
    }

    /// Picks the primary interface from `(name, address)` pairs in
    /// enumeration order and attaches its MAC.
    pub fn select(
        &self,
        candidates: impl IntoIterator<Item = (String, Ipv4Addr)>,
    ) -> Result<NetworkAddress, TelemetryError> {
        let (interface, ip) = candidates
            .into_iter()
            .find(|(name, ip)| !ip.is_loopback() && !self.is_excluded(name))
            .ok_or_else(|| TelemetryError::NotFound("primary IPv4 interface".into()))?;

        let mac = self.read_mac(&interface);
        if mac.is_none() {
            tracing::debug!(%interface, "no MAC address in sysfs");
        }

        Ok(NetworkAddress { interface, ip, mac })
    }

    /// Reads the MAC of `interface`, `None` if missing or malformed.
    pub fn read_mac(&self, interface: &str) -> Option<String> {
        let path = self.sysfs.path("class/net").join(interface).join("address");
        read_trimmed(&path).ok().and_then(|raw| parse_mac(&raw))
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|p| !p.is_empty() && name.starts_with(p.as_str()))
    }
}

/// Validates `xx:xx:xx:xx:xx:xx` and returns it lowercased.
fn parse_mac(raw: &str) -> Option<String> {
    let mac = raw.trim().to_ascii_lowercase();
    let octets: Vec<&str> = mac.split(':').collect();
    let valid = octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()));
    valid.then_some(mac)
}
