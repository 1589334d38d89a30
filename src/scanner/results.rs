use serde::{Serialize, Serializer};
use std::time::Duration;

/// Transport a probe ran over. Only TCP connect probes exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PortStatus {
    Open,
    /// Refused or timed out.
    Closed,
    /// Connect failed for a reason other than refusal or timeout.
    Error,
}

impl std::fmt::Display for PortStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortStatus::Open => write!(f, "Open"),
            PortStatus::Closed => write!(f, "Closed"),
            PortStatus::Error => write!(f, "Error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub port: u16,
    pub protocol: Protocol,
    pub status: PortStatus,
    pub service: Option<String>,
}

impl ProbeResult {
    pub fn open(port: u16, service: Option<String>) -> Self {
        Self {
            port,
            protocol: Protocol::Tcp,
            status: PortStatus::Open,
            service,
        }
    }

    pub fn closed(port: u16) -> Self {
        Self::without_service(port, PortStatus::Closed)
    }

    pub fn error(port: u16) -> Self {
        Self::without_service(port, PortStatus::Error)
    }

    fn without_service(port: u16, status: PortStatus) -> Self {
        Self {
            port,
            protocol: Protocol::Tcp,
            status,
            service: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == PortStatus::Open
    }
}

/// Final, port-ordered outcome of one scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    host: String,
    results: Vec<ProbeResult>,
    closed_count: usize,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    elapsed: Duration,
}

impl ScanReport {
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Every probed port, ascending.
    pub fn results(&self) -> &[ProbeResult] {
        &self.results
    }

    pub fn open_ports(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter().filter(|r| r.is_open())
    }

    pub fn open_count(&self) -> usize {
        self.open_ports().count()
    }

    /// Closed and errored ports together.
    pub fn closed_count(&self) -> usize {
        self.closed_count
    }

    pub fn error_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == PortStatus::Error)
            .count()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

fn serialize_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

/// Package probe results into a report, sorted by port regardless of the order
/// they were collected in.
pub fn aggregate(host: &str, mut results: Vec<ProbeResult>, elapsed: Duration) -> ScanReport {
    results.sort_by_key(|r| r.port);
    let closed_count = results
        .iter()
        .filter(|r| matches!(r.status, PortStatus::Closed | PortStatus::Error))
        .count();

    ScanReport {
        host: host.to_string(),
        results,
        closed_count,
        elapsed,
    }
}
