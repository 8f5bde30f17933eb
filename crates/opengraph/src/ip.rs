// ABOUTME: IP classifier used as the SSRF gate between DNS resolution and fetching.
// ABOUTME: Flags private, loopback, link-local and unspecified ranges for IPv4 and IPv6.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnet::{Ipv4Net, Ipv6Net};
use once_cell::sync::Lazy;

static BLOCKED_V4: Lazy<Vec<Ipv4Net>> = Lazy::new(|| {
    [
        // RFC1918 private ranges
        "10.0.0.0/8",
        "172.16.0.0/12",
        "192.168.0.0/16",
        // Loopback
        "127.0.0.0/8",
        // Link-local
        "169.254.0.0/16",
        // "This network"
        "0.0.0.0/8",
    ]
    .iter()
    .map(|net| net.parse().unwrap())
    .collect()
});

static BLOCKED_V6: Lazy<Vec<Ipv6Net>> = Lazy::new(|| {
    [
        // Unique local
        "fc00::/7",
        // Link-local
        "fe80::/10",
    ]
    .iter()
    .map(|net| net.parse().unwrap())
    .collect()
});

static NAT64: Lazy<Ipv6Net> = Lazy::new(|| "64:ff9b::/96".parse().unwrap());

/// The IPv4 address carried inside an IPv4-mapped (`::ffff:a.b.c.d`),
/// IPv4-compatible (`::a.b.c.d`) or NAT64 (`64:ff9b::a.b.c.d`) address.
fn embedded_ipv4(ip: &Ipv6Addr) -> Option<Ipv4Addr> {
    if NAT64.contains(ip) {
        let [.., a, b, c, d] = ip.octets();
        return Some(Ipv4Addr::new(a, b, c, d));
    }
    ip.to_ipv4()
}

/// Check if an IP address is in a private, loopback, link-local or reserved range.
///
/// IPv6 addresses that embed an IPv4 address (mapped, compatible or NAT64)
/// are classified by that IPv4 address.
pub fn is_private_or_reserved(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(ip) => BLOCKED_V4.iter().any(|net| net.contains(ip)),
        IpAddr::V6(ip) => {
            if ip.is_loopback() || ip.is_unspecified() {
                return true;
            }
            if let Some(v4) = embedded_ipv4(ip) {
                return is_private_or_reserved(&IpAddr::V4(v4));
            }
            BLOCKED_V6.iter().any(|net| net.contains(ip))
        }
    }
}

/// Textual variant of [`is_private_or_reserved`].
///
/// Strings that are not IP literals are treated as unsafe.
pub fn is_private_or_reserved_str(ip: &str) -> bool {
    match ip.parse::<IpAddr>() {
        Ok(addr) => is_private_or_reserved(&addr),
        Err(_) => true,
    }
}
