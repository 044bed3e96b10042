use crate::error::{Error, Result};
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

/// Resolve a host given as a dotted quad or a name to an IPv4 address.
///
/// A literal address is accepted directly; anything else goes through a
/// blocking lookup with the OS resolver.  Only IPv4 answers are considered
/// and the first one wins.
pub fn resolve(host: &str) -> Result<Ipv4Addr> {
    if let Ok(addr) = Ipv4Addr::from_str(host) {
        return Ok(addr);
    }
    dns_lookup::lookup_host(host)
        .map_err(|err| {
            tracing::debug!(host, %err, "lookup failed");
            Error::ResolutionFailed(host.to_string())
        })?
        .into_iter()
        .find_map(|addr| match addr {
            IpAddr::V4(addr) => Some(addr),
            IpAddr::V6(_) => None,
        })
        .ok_or_else(|| Error::ResolutionFailed(host.to_string()))
}
