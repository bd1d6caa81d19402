pub mod properties;
pub mod telemetry;

// Re-export primary types for convenience.
pub use properties::DeviceProperty;
pub use telemetry::{CpuTemperature, DiskUsage, HostSnapshot, NetworkAddress};
