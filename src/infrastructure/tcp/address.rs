use crate::domain::error::{TermLinkError, TermLinkResult};
use std::net::{Ipv4Addr, SocketAddrV4};

/// Resolve a bridge host and port into a socket address.
///
/// Only numeric dotted IPv4 hosts are accepted, plus the literal `localhost`
/// which stands for the loopback address. Names are never looked up.
pub fn resolve_bridge_addr(host: &str, port: &str) -> TermLinkResult<SocketAddrV4> {
    let ip = if host == "localhost" {
        Ipv4Addr::LOCALHOST
    } else {
        host.parse::<Ipv4Addr>()
            .map_err(|_| TermLinkError::InvalidAddress(host.to_string()))?
    };

    let port = port
        .parse::<u16>()
        .ok()
        .filter(|port| *port != 0)
        .ok_or_else(|| TermLinkError::InvalidPort(port.to_string()))?;

    Ok(SocketAddrV4::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_hosts() {
        let addr = resolve_bridge_addr("192.168.1.100", "8089").unwrap();
        assert_eq!(addr, "192.168.1.100:8089".parse().unwrap());
    }

    #[test]
    fn test_localhost_is_loopback() {
        let addr = resolve_bridge_addr("localhost", "23").unwrap();
        assert_eq!(*addr.ip(), Ipv4Addr::LOCALHOST);
        assert_eq!(addr.port(), 23);
    }

    #[test]
    fn test_malformed_hosts_are_rejected() {
        for host in ["", "10.0.0", "256.1.1.1", "bridge.local", "::1", "10.0.0.1 "] {
            assert!(
                matches!(resolve_bridge_addr(host, "8089"), Err(TermLinkError::InvalidAddress(_))),
                "host {host:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_bad_ports_are_rejected() {
        for port in ["", "0", "65536", "telnet", "-1"] {
            assert!(
                matches!(resolve_bridge_addr("127.0.0.1", port), Err(TermLinkError::InvalidPort(_))),
                "port {port:?} should be rejected"
            );
        }
    }
}
