use std::net::IpAddr;

use tokio::net::lookup_host;
use tracing::debug;

use crate::error::ScanError;

/// Resolve a target host to the address every probe connects to.
///
/// IP literals short-circuit; anything else goes through the system resolver and
/// the first address wins, preferring IPv4.
pub async fn resolve_host(host: &str) -> Result<IpAddr, ScanError> {
    let host = host.trim();
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }
    if host.is_empty() {
        return Err(ScanError::HostUnresolvable { host: host.to_string() });
    }

    let addrs: Vec<IpAddr> = lookup_host((host, 0))
        .await
        .map_err(|_| ScanError::HostUnresolvable { host: host.to_string() })?
        .map(|addr| addr.ip())
        .collect();

    let ip = addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| ScanError::HostUnresolvable { host: host.to_string() })?;

    debug!(host, %ip, "resolved target");
    Ok(ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[tokio::test]
    async fn test_resolve_ipv4_literal() {
        let ip = resolve_host("192.168.1.1").await.unwrap();
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)));
    }

    #[tokio::test]
    async fn test_resolve_ipv6_literal() {
        let ip = resolve_host("::1").await.unwrap();
        assert_eq!(ip, IpAddr::V6(Ipv6Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn test_resolve_trims_whitespace() {
        let ip = resolve_host(" 127.0.0.1 ").await.unwrap();
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn test_unresolvable_host() {
        let result = resolve_host("no-such-host.invalid").await;
        assert!(matches!(result, Err(ScanError::HostUnresolvable { .. })));
    }

    #[tokio::test]
    async fn test_empty_host() {
        assert!(matches!(
            resolve_host("").await,
            Err(ScanError::HostUnresolvable { .. })
        ));
    }
}
