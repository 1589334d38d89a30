use crate::error::ScanError;

/// Ports probed when no explicit range is given.
pub const WELL_KNOWN_PORTS: [u16; 29] = [
    21, 22, 23, 25, 53, 69, 80, 109, 110, 123, 137, 138, 139, 143, 156, 389, 443, 546, 547,
    993, 995, 2082, 2083, 2086, 2087, 3306, 8080, 8443, 10000,
];

pub const MIN_PORT: u32 = 1;
pub const MAX_PORT: u32 = 65535;

/// Which ports a scan covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortRange {
    /// The fixed well-known set.
    Explicit,
    /// Every port in `start..=end`.
    Bounded { start: u16, end: u16 },
}

impl PortRange {
    /// Validated inclusive range. Takes `u32` so out-of-bounds user input reaches
    /// the check instead of wrapping.
    pub fn bounded(start: u32, end: u32) -> Result<Self, ScanError> {
        if start < MIN_PORT || end > MAX_PORT || start > end {
            return Err(ScanError::InvalidRange { start, end });
        }
        Ok(PortRange::Bounded {
            start: start as u16,
            end: end as u16,
        })
    }

    /// Ascending, duplicate-free list of ports to probe.
    pub fn ports(&self) -> Vec<u16> {
        match *self {
            PortRange::Explicit => {
                let mut ports = WELL_KNOWN_PORTS.to_vec();
                ports.sort_unstable();
                ports.dedup();
                ports
            }
            PortRange::Bounded { start, end } => (start..=end).collect(),
        }
    }
}

impl std::fmt::Display for PortRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortRange::Explicit => write!(f, "well-known ports"),
            PortRange::Bounded { start, end } => write!(f, "{}-{}", start, end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_range_is_inclusive() {
        let range = PortRange::bounded(79, 82).unwrap();
        assert_eq!(range.ports(), vec![79, 80, 81, 82]);
    }

    #[test]
    fn test_single_port_range() {
        let range = PortRange::bounded(443, 443).unwrap();
        assert_eq!(range.ports(), vec![443]);
    }

    #[test]
    fn test_full_range() {
        let ports = PortRange::bounded(1, 65535).unwrap().ports();
        assert_eq!(ports.len(), 65535);
        assert_eq!(ports.first(), Some(&1));
        assert_eq!(ports.last(), Some(&65535));
    }

    #[test]
    fn test_bounded_ranges_match_expected_sets() {
        for (start, end) in [(1u32, 1u32), (20, 25), (1000, 1100), (65500, 65535)] {
            let ports = PortRange::bounded(start, end).unwrap().ports();
            assert_eq!(ports.len() as u32, end - start + 1);
            assert!(ports.windows(2).all(|w| w[0] < w[1]));
            let expected: Vec<u16> = (start as u16..=end as u16).collect();
            assert_eq!(ports, expected);
        }
    }

    #[test]
    fn test_reversed_range_rejected() {
        assert!(matches!(
            PortRange::bounded(100, 50),
            Err(ScanError::InvalidRange { start: 100, end: 50 })
        ));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        assert!(PortRange::bounded(0, 10).is_err());
        assert!(PortRange::bounded(1, 65536).is_err());
        assert!(PortRange::bounded(70000, 80000).is_err());
    }

    #[test]
    fn test_well_known_ports_sorted_and_unique() {
        let ports = PortRange::Explicit.ports();
        assert_eq!(ports.len(), 29);
        assert!(ports.windows(2).all(|w| w[0] < w[1]));
        assert!(ports.contains(&22));
        assert!(ports.contains(&10000));
    }

    #[test]
    fn test_display() {
        assert_eq!(PortRange::bounded(1, 1000).unwrap().to_string(), "1-1000");
        assert_eq!(PortRange::Explicit.to_string(), "well-known ports");
    }
}
