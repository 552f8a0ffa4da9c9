use std::net::{IpAddr, Ipv4Addr};

pub const IP_NOT_FOUND: &str = "IP Address not found";
pub const IP_LOOKUP_FAILED: &str = "Error retrieving IP address";

/// Best-guess local IPv4 address for the status header. Never fails; returns
/// a placeholder string instead.
pub fn host_ip_label() -> String {
    match if_addrs::get_if_addrs() {
        Ok(interfaces) => label_for(interfaces.iter().map(|iface| iface.ip())),
        Err(e) => {
            tracing::warn!(error = %e, "network interface enumeration failed");
            IP_LOOKUP_FAILED.to_string()
        }
    }
}

fn label_for(addrs: impl IntoIterator<Item = IpAddr>) -> String {
    match first_ipv4(addrs) {
        Some(ip) => format!("IP Address: {ip}"),
        None => IP_NOT_FOUND.to_string(),
    }
}

fn first_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    addrs.into_iter().find_map(|addr| match addr {
        IpAddr::V4(v4) if !v4.is_loopback() => Some(v4),
        _ => None,
    })
}
