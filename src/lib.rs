pub mod cli;
pub mod error;
pub mod network;
pub mod output;
pub mod ports;
pub mod scanner;

pub use error::ScanError;
pub use ports::{PortRange, WELL_KNOWN_PORTS};
pub use scanner::{
    aggregate, PortStatus, ProbeResult, Prober, ScanConfig, ScanReport, Scanner, ServiceRegistry,
    TcpProber,
};
