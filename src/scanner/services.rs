// Port -> service name lookup backed by the platform services database.
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use lazy_static::lazy_static;
use tracing::{debug, warn};

#[cfg(windows)]
pub const SYSTEM_SERVICES_PATH: &str = r"C:\Windows\System32\drivers\etc\services";
#[cfg(not(windows))]
pub const SYSTEM_SERVICES_PATH: &str = "/etc/services";

lazy_static! {
    static ref SYSTEM_REGISTRY: Arc<ServiceRegistry> =
        Arc::new(ServiceRegistry::load(SYSTEM_SERVICES_PATH));
}

#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    tcp: HashMap<u16, String>,
}

impl ServiceRegistry {
    /// Registry shared by the whole process, loaded on first use.
    pub fn system() -> Arc<ServiceRegistry> {
        Arc::clone(&SYSTEM_REGISTRY)
    }

    /// Load a services file. An unreadable file yields an empty registry.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let registry = Self::parse(&contents);
                debug!(path = %path.display(), entries = registry.len(), "loaded services database");
                registry
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "services database unavailable, service names will be unknown");
                Self::default()
            }
        }
    }

    /// Parse `/etc/services` formatted text, keeping TCP entries only.
    /// The first entry seen for a port wins.
    pub fn parse(contents: &str) -> Self {
        let mut tcp = HashMap::new();

        for line in contents.lines() {
            let line = match line.split_once('#') {
                Some((before, _)) => before,
                None => line,
            };
            let mut fields = line.split_whitespace();
            let (Some(name), Some(port_proto)) = (fields.next(), fields.next()) else {
                continue;
            };
            let Some((port, proto)) = port_proto.split_once('/') else {
                continue;
            };
            if !proto.eq_ignore_ascii_case("tcp") {
                continue;
            }
            if let Ok(port) = port.parse::<u16>() {
                tcp.entry(port).or_insert_with(|| name.to_string());
            }
        }

        Self { tcp }
    }

    pub fn lookup(&self, port: u16) -> Option<&str> {
        self.tcp.get(&port).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tcp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tcp.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
# Network services, Internet style
tcpmux          1/tcp                           # TCP port service multiplexer
ftp             21/tcp
ssh             22/tcp                          # SSH Remote Login Protocol
domain          53/tcp
domain          53/udp
tftp            69/udp
http            80/tcp          www             # WorldWideWeb HTTP
www-alt         80/tcp
ntp             123/udp
https           443/tcp

garbage line without port
bogus           notaport/tcp
toolarge        70000/tcp
";

    #[test]
    fn test_parse_tcp_entries() {
        let registry = ServiceRegistry::parse(SAMPLE);
        assert_eq!(registry.lookup(21), Some("ftp"));
        assert_eq!(registry.lookup(22), Some("ssh"));
        assert_eq!(registry.lookup(53), Some("domain"));
        assert_eq!(registry.lookup(443), Some("https"));
    }

    #[test]
    fn test_udp_only_entries_ignored() {
        let registry = ServiceRegistry::parse(SAMPLE);
        assert_eq!(registry.lookup(69), None);
        assert_eq!(registry.lookup(123), None);
    }

    #[test]
    fn test_first_entry_wins() {
        let registry = ServiceRegistry::parse(SAMPLE);
        assert_eq!(registry.lookup(80), Some("http"));
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let registry = ServiceRegistry::parse(SAMPLE);
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.lookup(9999), None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"mysql 3306/tcp\n").unwrap();
        let registry = ServiceRegistry::load(file.path());
        assert_eq!(registry.lookup(3306), Some("mysql"));
    }

    #[test]
    fn test_system_path_matches_platform() {
        if cfg!(windows) {
            assert!(SYSTEM_SERVICES_PATH.ends_with(r"drivers\etc\services"));
        } else {
            assert_eq!(SYSTEM_SERVICES_PATH, "/etc/services");
        }
    }

    #[test]
    fn test_windows_style_file_parses() {
        // Windows ships the same format with CRLF line endings.
        let registry = ServiceRegistry::parse("echo 7/tcp\r\nftp 21/tcp\r\n");
        assert_eq!(registry.lookup(21), Some("ftp"));
        assert_eq!(registry.lookup(7), Some("echo"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ServiceRegistry::load(dir.path().join("services"));
        assert!(registry.is_empty());
        assert_eq!(registry.lookup(22), None);
    }
}
