use crate::error::{Error, Result};
use crate::probe::{Reply, ReplyKind};
use crate::types::{PacketSize, ProbeId};
use hoplite_packet::checksum::icmp_checksum;
use hoplite_packet::icmp::destination_unreachable::DestinationUnreachablePacket;
use hoplite_packet::icmp::echo_reply::EchoReplyPacket;
use hoplite_packet::icmp::echo_request::EchoRequestPacket;
use hoplite_packet::icmp::time_exceeded::TimeExceededPacket;
use hoplite_packet::icmp::{IcmpCode, IcmpPacket, IcmpType};
use hoplite_packet::ipv4::Ipv4Packet;
use std::net::IpAddr;
use std::time::{SystemTime, UNIX_EPOCH};

/// The maximum size of the `ICMP` packet we allow.
pub const MAX_PACKET_SIZE: usize = 1024;

/// The size of buffer needed to receive a reply datagram.
///
/// A reply is a full IP datagram; an echo reply mirrors the probe packet and
/// the error replies are far smaller, so the probe size plus one IP header
/// bounds both.
pub const MAX_DATAGRAM_SIZE: usize = MAX_PACKET_SIZE + Ipv4Packet::minimum_packet_size();

/// Clamp a requested packet size to the valid range.
pub fn clamp_packet_size(size: PacketSize) -> usize {
    usize::from(size.0).clamp(EchoRequestPacket::minimum_packet_size(), MAX_PACKET_SIZE)
}

/// Create an `ICMP` `EchoRequest` packet in the given buffer.
///
/// The checksum field holds zero until every other field, including the
/// zeroed payload region, has been written; it is computed over the whole
/// packet and filled in last.
pub fn make_echo_request<'a>(
    icmp_buf: &'a mut [u8],
    identifier: ProbeId,
    size: PacketSize,
) -> Result<EchoRequestPacket<'a>> {
    let packet_size = clamp_packet_size(size);
    let mut icmp = EchoRequestPacket::new(&mut icmp_buf[..packet_size])?;
    icmp.set_icmp_type(IcmpType::EchoRequest);
    icmp.set_icmp_code(IcmpCode(0));
    icmp.set_identifier(identifier.0);
    icmp.set_timestamp(timestamp_ms());
    icmp.set_checksum(icmp_checksum(icmp.packet()));
    Ok(icmp)
}

/// Decode a received IP datagram into a [`Reply`].
///
/// For the error replies the identifier and timestamp are read from the
/// router-embedded copy of the original request, reached through the nested
/// IP header rather than at a hard-coded offset, so datagrams carrying IP
/// options decode correctly and truncated ones fail as malformed.
pub fn decode_reply(datagram: &[u8]) -> Result<Reply> {
    let ipv4 = Ipv4Packet::new_view(datagram)?;
    let addr = ipv4.get_source();
    let ttl = ipv4.get_ttl();
    let icmp = IcmpPacket::new_view(ipv4.payload())?;
    match icmp.get_icmp_type() {
        IcmpType::EchoReply => {
            let echo = EchoReplyPacket::new_view(icmp.packet())?;
            Ok(Reply {
                kind: ReplyKind::EchoReply,
                identifier: ProbeId(echo.get_identifier()),
                timestamp_ms: echo.get_timestamp(),
                addr,
                ttl,
            })
        }
        IcmpType::TimeExceeded => {
            let packet = TimeExceededPacket::new_view(icmp.packet())?;
            let (identifier, timestamp_ms) = extract_embedded_echo(packet.payload())?;
            Ok(Reply {
                kind: ReplyKind::TtlExceeded,
                identifier,
                timestamp_ms,
                addr,
                ttl,
            })
        }
        IcmpType::DestinationUnreachable => Err(Error::Unreachable(IpAddr::V4(addr))),
        icmp_type => Err(Error::UnknownIcmpType(icmp_type.id())),
    }
}

/// Extract just the correlation identifier from a received IP datagram.
///
/// This is the cheap decode used to discard replies belonging to other
/// probing contexts before committing to a full decode.  Returns `None` for
/// echo requests: a raw `ICMP` socket on a loopback path observes our own
/// outbound probe, which carries a matching identifier but is not a reply.
pub fn peek_identifier(datagram: &[u8]) -> Result<Option<ProbeId>> {
    let ipv4 = Ipv4Packet::new_view(datagram)?;
    let icmp = IcmpPacket::new_view(ipv4.payload())?;
    match icmp.get_icmp_type() {
        IcmpType::EchoRequest => Ok(None),
        IcmpType::TimeExceeded => {
            let packet = TimeExceededPacket::new_view(icmp.packet())?;
            Ok(Some(extract_embedded_echo(packet.payload())?.0))
        }
        IcmpType::DestinationUnreachable => {
            let packet = DestinationUnreachablePacket::new_view(icmp.packet())?;
            Ok(Some(extract_embedded_echo(packet.payload())?.0))
        }
        _ => {
            let echo = EchoReplyPacket::new_view(icmp.packet())?;
            Ok(Some(ProbeId(echo.get_identifier())))
        }
    }
}

/// Read the identifier and timestamp from the embedded original request.
///
/// The error replies embed the original IP header followed by the first 8
/// bytes of the original `ICMP` packet, which span exactly the fields we
/// stamped on the way out.
fn extract_embedded_echo(embedded: &[u8]) -> Result<(ProbeId, u16)> {
    let inner_ipv4 = Ipv4Packet::new_view(embedded)?;
    let echo = EchoRequestPacket::new_view(inner_ipv4.payload())?;
    Ok((ProbeId(echo.get_identifier()), echo.get_timestamp()))
}

/// The current wall-clock time in truncated milliseconds.
///
/// Wraps roughly every 65 seconds; round trip arithmetic on these values is
/// done with wrapping subtraction.
pub fn timestamp_ms() -> u16 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u16)
        .unwrap_or_default()
}
