//! Application orchestrator: wires the probe and collector to stdout.

use std::io::Write;
use std::sync::Arc;

use hostsense_protocol::HostSnapshot;
use hostsense_telemetry::{Collector, Probe};

use crate::config::{Config, OutputFormat};

/// Runs the agent until Ctrl-C.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let probe = Arc::new(Probe::new(config.probe_config()));

    let thermal = probe.thermal();
    match (thermal.available_sensor(), thermal.sensor_path()) {
        (Some(path), _) => tracing::info!(path = %path.display(), "CPU temperature sensor"),
        (None, Some(path)) => {
            tracing::warn!(path = %path.display(), "configured CPU temperature sensor is missing")
        }
        (None, None) => tracing::warn!("no CPU temperature sensor found"),
    }

    // Publish once right away, then on every interval.
    let initial = {
        let probe = Arc::clone(&probe);
        tokio::task::spawn_blocking(move || probe.snapshot()).await?
    };
    write_snapshot(&mut std::io::stdout().lock(), &config.name, config.output, &initial)?;

    let name = config.name.clone();
    let output = config.output;
    let collector = Collector::new(
        Arc::clone(&probe),
        Box::new(move |snapshot| {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = write_snapshot(&mut stdout, &name, output, &snapshot) {
                tracing::warn!(error = %e, "failed to write snapshot");
            }
        }),
    );
    collector.start(config.interval).await;

    tokio::signal::ctrl_c().await?;
    tracing::info!("SIGINT received, shutting down");

    collector.stop().await;
    Ok(())
}

/// Writes one snapshot in the configured format.
fn write_snapshot(
    out: &mut impl Write,
    name: &str,
    format: OutputFormat,
    snapshot: &HostSnapshot,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, snapshot)?;
            writeln!(out)?;
        }
        OutputFormat::Properties => {
            for prop in snapshot.properties() {
                writeln!(out, "{name}/{prop}")?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use hostsense_protocol::{CpuTemperature, DiskUsage, NetworkAddress};

    use super::*;

    fn snapshot() -> HostSnapshot {
        HostSnapshot {
            timestamp: 1_700_000_000_000,
            cpu: Some(CpuTemperature::from_millidegrees(44500, "zone2")),
            network: Some(NetworkAddress {
                interface: "eth0".into(),
                ip: Ipv4Addr::new(192, 168, 1, 50),
                mac: Some("b8:27:eb:00:11:22".into()),
            }),
            disk: Some(DiskUsage::new("/", 1000, 250, 200)),
        }
    }

    #[test]
    fn json_output_is_one_line() {
        let mut buf = Vec::new();
        write_snapshot(&mut buf, "dev", OutputFormat::Json, &snapshot()).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.ends_with('\n'));

        let parsed: HostSnapshot = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed, snapshot());
    }

    #[test]
    fn properties_output_prefixed_with_name() {
        let mut buf = Vec::new();
        write_snapshot(&mut buf, "pi", OutputFormat::Properties, &snapshot()).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "pi/cpu-temperature 44.500");
        assert_eq!(lines[1], "pi/ip 192.168.1.50");
        assert_eq!(lines[2], "pi/mac b8:27:eb:00:11:22");
        assert_eq!(lines[5], "pi/disk-used-percent 75.0");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn empty_snapshot_writes_nothing_as_properties() {
        let mut buf = Vec::new();
        let empty = HostSnapshot {
            timestamp: 0,
            cpu: None,
            network: None,
            disk: None,
        };
        write_snapshot(&mut buf, "pi", OutputFormat::Properties, &empty).unwrap();
        assert!(buf.is_empty());
    }
}
