//! Agent configuration management.
//!
//! Configuration is stored as TOML at `~/.config/hostsense/agent.toml`.

use std::path::{Path, PathBuf};

use hostsense_telemetry::ProbeConfig;
use serde::{Deserialize, Serialize};

/// How snapshots are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// One `<name>/<property> <value>` line per device property.
    Properties,
}

/// Agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Device name used as the property prefix (hostname by default).
    #[serde(default = "default_name")]
    pub name: String,

    /// Snapshot interval in seconds.
    #[serde(default = "default_interval")]
    pub interval: u32,

    /// Where sysfs is mounted.
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,

    /// Fixed thermal zone number; unset picks a CPU zone automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal_zone: Option<u32>,

    /// Interface name prefixes never treated as the primary interface.
    #[serde(default = "default_excluded_interfaces")]
    pub excluded_interfaces: Vec<String>,

    /// Mount point whose space usage is reported.
    #[serde(default = "default_disk_path")]
    pub disk_path: PathBuf,

    #[serde(default)]
    pub output: OutputFormat,
}

fn default_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "hostsense".into())
}

fn default_interval() -> u32 {
    5
}

fn default_sysfs_root() -> PathBuf {
    ProbeConfig::default().sysfs_root
}

fn default_excluded_interfaces() -> Vec<String> {
    ProbeConfig::default().excluded_interfaces
}

fn default_disk_path() -> PathBuf {
    ProbeConfig::default().disk_path
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            interval: default_interval(),
            sysfs_root: default_sysfs_root(),
            thermal_zone: None,
            excluded_interfaces: default_excluded_interfaces(),
            disk_path: default_disk_path(),
            output: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // Restrict permissions on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Reader settings for the telemetry probe.
    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            sysfs_root: self.sysfs_root.clone(),
            thermal_zone: self.thermal_zone,
            excluded_interfaces: self.excluded_interfaces.clone(),
            disk_path: self.disk_path.clone(),
        }
    }
}

/// Returns the configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    Ok(PathBuf::from(home)
        .join(".config")
        .join("hostsense")
        .join("agent.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(!config.name.is_empty());
        assert_eq!(config.interval, 5);
        assert_eq!(config.sysfs_root, PathBuf::from("/sys"));
        assert_eq!(config.thermal_zone, None);
        assert_eq!(config.excluded_interfaces, ["lo", "docker"]);
        assert_eq!(config.disk_path, PathBuf::from("/"));
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = Config {
            name: "greenhouse-pi".into(),
            interval: 30,
            sysfs_root: "/sys".into(),
            thermal_zone: Some(2),
            excluded_interfaces: vec!["lo".into(), "docker".into(), "veth".into()],
            disk_path: "/data".into(),
            output: OutputFormat::Properties,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("output = \"properties\""));
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn config_partial_toml() {
        // Only specify name, rest should use defaults.
        let config: Config = toml::from_str(r#"name = "MyDevice""#).unwrap();
        assert_eq!(config.name, "MyDevice");
        assert_eq!(config.interval, 5);
        assert_eq!(config.thermal_zone, None);
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn unset_thermal_zone_is_not_written() {
        let toml_str = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(!toml_str.contains("thermal_zone"));
    }

    #[test]
    fn unknown_output_is_rejected() {
        assert!(toml::from_str::<Config>(r#"output = "xml""#).is_err());
    }

    #[test]
    fn config_path_not_empty() {
        let path = config_path().unwrap();
        assert!(path.to_string_lossy().contains("hostsense"));
    }

    #[test]
    fn load_creates_default_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("agent.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.interval, 5);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn config_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("agent.toml");

        let config = Config {
            name: "SaveTest".into(),
            thermal_zone: Some(0),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.name, "SaveTest");
        assert_eq!(loaded.thermal_zone, Some(0));
    }

    #[test]
    fn probe_config_mirrors_fields() {
        let config = Config {
            thermal_zone: Some(3),
            disk_path: "/boot".into(),
            ..Config::default()
        };
        let probe = config.probe_config();
        assert_eq!(probe.thermal_zone, Some(3));
        assert_eq!(probe.disk_path, PathBuf::from("/boot"));
        assert_eq!(probe.excluded_interfaces, config.excluded_interfaces);
    }
}
