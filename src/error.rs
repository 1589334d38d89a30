use thiserror::Error;

/// Faults that invalidate a whole scan.
///
/// Per-port outcomes never show up here; they are folded into
/// [`PortStatus`](crate::scanner::PortStatus) by the prober.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid port range {start}-{end}: ports must satisfy 1 <= start <= end <= 65535")]
    InvalidRange { start: u32, end: u32 },

    #[error("hostname could not be resolved: {host}")]
    HostUnresolvable { host: String },

    /// A prober reports this for a single port; the scanner only escalates it to
    /// a scan failure when every probed port came back unreachable.
    #[error("couldn't connect to server {host}: {source}")]
    Unreachable {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("scan interrupted by user")]
    Interrupted,

    #[error("scan worker failed: {0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Process exit code the binary uses for this fault.
    pub fn exit_code(&self) -> u8 {
        match self {
            ScanError::Interrupted => 130,
            _ => 1,
        }
    }
}
