use std::path::PathBuf;

/// Errors for telemetry reads.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected content in {}: {value:?}", path.display())]
    Parse { path: PathBuf, value: String },

    #[error("failed to enumerate network interfaces: {0}")]
    Interfaces(#[source] std::io::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
}

impl TelemetryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
