//! Packet wire format parsing and building for the hoplite probe engine.
//!
//! The following packets are supported:
//! - `ICMP` (echo request, echo reply, time exceeded, destination
//!   unreachable)
//! - `IPv4`
//!
//! # Endianness
//!
//! The internal representation is held in network byte order (big-endian) and
//! all accessor methods take and return data in host byte order, converting as
//! necessary for the given architecture.
//!
//! # Example
//!
//! The following example builds an `ICMP` echo request packet carrying the
//! hoplite correlation identifier and send timestamp:
//!
//! ```rust
//! # fn main() -> Result<(), hoplite_packet::error::Error> {
//! use hoplite_packet::checksum::icmp_checksum;
//! use hoplite_packet::icmp::echo_request::EchoRequestPacket;
//! use hoplite_packet::icmp::{IcmpCode, IcmpType};
//!
//! let mut buf = [0; EchoRequestPacket::minimum_packet_size()];
//! let mut icmp = EchoRequestPacket::new(&mut buf)?;
//! icmp.set_icmp_type(IcmpType::EchoRequest);
//! icmp.set_icmp_code(IcmpCode(0));
//! icmp.set_identifier(1234);
//! icmp.set_timestamp(10);
//! icmp.set_checksum(icmp_checksum(icmp.packet()));
//! assert_eq!(icmp.packet(), &hex_literal::hex!("08 00 f3 23 04 d2 00 0a"));
//! # Ok(())
//! # }
//! ```
#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![forbid(unsafe_code)]

mod buffer;

/// Packet errors.
pub mod error;

/// The Internet checksum.
pub mod checksum;

/// `ICMP` packets.
pub mod icmp;

/// `IPv4` packets.
pub mod ipv4;

/// The IP packet next layer protocol.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IpProtocol {
    Icmp,
    Other(u8),
}

impl IpProtocol {
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Icmp => 1,
            Self::Other(id) => id,
        }
    }
}

impl From<u8> for IpProtocol {
    fn from(id: u8) -> Self {
        match id {
            1 => Self::Icmp,
            p => Self::Other(p),
        }
    }
}

/// Format a payload as a hexadecimal string.
#[must_use]
pub fn fmt_payload(bytes: &[u8]) -> String {
    use itertools::Itertools as _;
    format!("{:02x}", bytes.iter().format(" "))
}
