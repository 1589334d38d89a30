use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use crate::error::ScanError;
use crate::scanner::results::ProbeResult;
use crate::scanner::services::ServiceRegistry;

/// A single-port reachability check.
///
/// `Ok` carries the per-port classification. `Err(ScanError::Unreachable)` marks
/// one port the network could not route to; any other `Err` aborts the whole
/// scan. Implementations must be safe to call concurrently.
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    async fn probe(&self, target: IpAddr, port: u16) -> Result<ProbeResult, ScanError>;
}

/// Full TCP handshake probe.
pub struct TcpProber {
    timeout: Duration,
    registry: Arc<ServiceRegistry>,
}

impl TcpProber {
    pub fn new(timeout: Duration) -> Self {
        Self::with_registry(timeout, ServiceRegistry::system())
    }

    pub fn with_registry(timeout: Duration, registry: Arc<ServiceRegistry>) -> Self {
        Self { timeout, registry }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, target: IpAddr, port: u16) -> Result<ProbeResult, ScanError> {
        let addr = SocketAddr::new(target, port);

        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                // Socket is closed on drop; release it before the lookup.
                drop(stream);
                let service = self.registry.lookup(port).map(str::to_string);
                debug!(%target, port, service = service.as_deref().unwrap_or("unknown"), "port open");
                Ok(ProbeResult::open(port, service))
            }
            Ok(Err(e)) => classify_connect_error(target, port, e),
            Err(_) => {
                debug!(%target, port, "connect timed out");
                Ok(ProbeResult::closed(port))
            }
        }
    }
}

/// Refused, reset and timed out connects all mean "not accepting". Network or
/// host unreachable is handed back to the scanner, which counts the port as
/// closed unless the whole target turns out to be unreachable.
pub(crate) fn classify_connect_error(
    target: IpAddr,
    port: u16,
    error: std::io::Error,
) -> Result<ProbeResult, ScanError> {
    match error.kind() {
        ErrorKind::ConnectionRefused
        | ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::TimedOut => {
            debug!(%target, port, error = %error, "port closed");
            Ok(ProbeResult::closed(port))
        }
        ErrorKind::NetworkUnreachable | ErrorKind::HostUnreachable => Err(ScanError::Unreachable {
            host: target.to_string(),
            port,
            source: error,
        }),
        _ => {
            warn!(%target, port, error = %error, "unexpected socket error");
            Ok(ProbeResult::error(port))
        }
    }
}
