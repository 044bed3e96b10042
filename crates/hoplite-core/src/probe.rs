use crate::types::ProbeId;
use std::net::{IpAddr, Ipv4Addr};

/// The outcome of exactly one probe.
///
/// Created when the probe completes and never mutated afterwards; the caller
/// owns it.  Exactly one of three shapes is produced:
///
/// - a decoded reply: `error` is false and `ttl_exceeded` tells whether the
///   reply came from an intermediate hop rather than the destination
/// - a timeout: `error` and `ttl_exceeded` are both true, `rtt_ms` is `-1`
///   and there is no responder
/// - a failure (setup, send or decode): `error` is true and `ttl_exceeded`
///   is false
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// The host this probe was aimed at, as given by the caller.
    pub target: String,
    /// The host which answered, if any.
    pub responder: Option<IpAddr>,
    /// The size of the probe packet sent, in bytes.
    pub size: usize,
    /// The round trip time in milliseconds.
    ///
    /// Derived from 16-bit truncated-millisecond timestamps and therefore
    /// only valid when the reply arrives within the same ~65 second window;
    /// meaningless when `error` is set.
    pub rtt_ms: i64,
    /// The time-to-live observed on the reply datagram.
    pub ttl: u8,
    /// The reply came from an intermediate hop, not the destination.
    pub ttl_exceeded: bool,
    /// No usable reply was obtained.
    pub error: bool,
}

impl ProbeResult {
    /// A reply was received and decoded.
    pub(crate) fn complete(target: &str, reply: &Reply, size: usize, rtt_ms: i64) -> Self {
        Self {
            target: target.to_string(),
            responder: Some(IpAddr::V4(reply.addr)),
            size,
            rtt_ms,
            ttl: reply.ttl,
            ttl_exceeded: reply.kind == ReplyKind::TtlExceeded,
            error: false,
        }
    }

    /// No matching reply arrived in time.
    pub(crate) fn timed_out(target: &str, size: usize) -> Self {
        Self {
            target: target.to_string(),
            responder: None,
            size,
            rtt_ms: -1,
            ttl: 0,
            ttl_exceeded: true,
            error: true,
        }
    }

    /// The probe failed outright.
    pub(crate) fn failed(target: &str, size: usize) -> Self {
        Self {
            target: target.to_string(),
            responder: None,
            size,
            rtt_ms: -1,
            ttl: 0,
            ttl_exceeded: false,
            error: true,
        }
    }

    /// Did this probe elicit a reply from the destination itself?
    #[must_use]
    pub const fn is_destination(&self) -> bool {
        !self.error && !self.ttl_exceeded
    }
}

/// A decoded inbound reply datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Which kind of terminal reply this is.
    pub kind: ReplyKind,
    /// The correlation identifier echoed back to us.
    pub identifier: ProbeId,
    /// The truncated-millisecond timestamp we stamped on the request.
    pub timestamp_ms: u16,
    /// The source address of the reply datagram.
    pub addr: Ipv4Addr,
    /// The time-to-live of the reply datagram.
    pub ttl: u8,
}

/// The kind of a decoded reply.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReplyKind {
    /// The destination answered our echo request.
    EchoReply,
    /// An intermediate router dropped the probe when its ttl expired.
    TtlExceeded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_echo_reply() {
        let reply = Reply {
            kind: ReplyKind::EchoReply,
            identifier: ProbeId(1),
            timestamp_ms: 100,
            addr: Ipv4Addr::new(1, 2, 3, 4),
            ttl: 57,
        };
        let result = ProbeResult::complete("example.com", &reply, 32, 12);
        assert_eq!("example.com", result.target);
        assert_eq!(Some(IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4))), result.responder);
        assert_eq!(32, result.size);
        assert_eq!(12, result.rtt_ms);
        assert_eq!(57, result.ttl);
        assert!(!result.ttl_exceeded);
        assert!(!result.error);
        assert!(result.is_destination());
    }

    #[test]
    fn test_complete_ttl_exceeded() {
        let reply = Reply {
            kind: ReplyKind::TtlExceeded,
            identifier: ProbeId(1),
            timestamp_ms: 100,
            addr: Ipv4Addr::new(10, 0, 0, 1),
            ttl: 255,
        };
        let result = ProbeResult::complete("example.com", &reply, 32, 3);
        assert!(result.ttl_exceeded);
        assert!(!result.error);
        assert!(!result.is_destination());
    }

    #[test]
    fn test_timed_out() {
        let result = ProbeResult::timed_out("example.com", 32);
        assert_eq!(None, result.responder);
        assert_eq!(-1, result.rtt_ms);
        assert_eq!(0, result.ttl);
        assert!(result.ttl_exceeded);
        assert!(result.error);
        assert!(!result.is_destination());
    }

    #[test]
    fn test_failed() {
        let result = ProbeResult::failed("example.com", 32);
        assert!(!result.ttl_exceeded);
        assert!(result.error);
        assert!(!result.is_destination());
    }
}
