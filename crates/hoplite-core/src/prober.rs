use crate::config::ProbeConfig;
use crate::error::{Error, Result};
use crate::net::ipv4::{
    clamp_packet_size, decode_reply, make_echo_request, peek_identifier, timestamp_ms,
    MAX_DATAGRAM_SIZE, MAX_PACKET_SIZE,
};
use crate::net::session::Session;
use crate::net::socket::Socket;
use crate::probe::ProbeResult;
use crate::resolve::resolve;
use crate::types::{PacketSize, ProbeId, TimeToLive};
use std::net::Ipv4Addr;
use std::time::Instant;

/// A single-probe driver.
///
/// Issues one `ICMP` echo probe at a time: build the packet, send it on a
/// fresh [`Session`], wait for the reply carrying this context's [`ProbeId`]
/// and decode it.  The identifier is handed over at construction and stays
/// constant for every probe this instance issues, which is what lets a
/// traceroute walk correlate replies across hops.
#[derive(Debug, Clone)]
pub struct Prober {
    identifier: ProbeId,
    config: ProbeConfig,
}

/// An abstraction over the probe driver for the hop walk.
#[cfg_attr(test, mockall::automock)]
pub trait Pinger {
    /// Issue a single probe and report its outcome.
    fn ping(&self, host: &str, size: PacketSize, ttl: TimeToLive) -> ProbeResult;
}

impl Pinger for Prober {
    fn ping(&self, host: &str, size: PacketSize, ttl: TimeToLive) -> ProbeResult {
        self.probe(host, size, ttl)
    }
}

impl Prober {
    #[must_use]
    pub const fn new(identifier: ProbeId, config: ProbeConfig) -> Self {
        Self { identifier, config }
    }

    /// The correlation identifier of this probing context.
    #[must_use]
    pub const fn identifier(&self) -> ProbeId {
        self.identifier
    }

    /// Issue one probe towards `host` and wait for its outcome.
    ///
    /// Synchronous and blocking; the only side effect is the raw socket
    /// created for, and destroyed with, this call.  Every failure mode is
    /// folded into the returned [`ProbeResult`], never a panic or an `Err`:
    /// a probe that cannot even be set up reports `error` with the cause
    /// logged.
    pub fn probe(&self, host: &str, size: PacketSize, ttl: TimeToLive) -> ProbeResult {
        let packet_size = clamp_packet_size(size);
        match self.probe_inner(host, size, ttl) {
            Ok(result) => result,
            Err(Error::TimedOut) => {
                tracing::debug!(host, ?ttl, "probe timed out");
                ProbeResult::timed_out(host, packet_size)
            }
            Err(err) => {
                tracing::debug!(host, ?ttl, %err, "probe failed");
                ProbeResult::failed(host, packet_size)
            }
        }
    }

    fn probe_inner(&self, host: &str, size: PacketSize, ttl: TimeToLive) -> Result<ProbeResult> {
        // resolution comes first so that an unknown host never costs a socket
        let addr = resolve(host)?;
        let mut session = Session::open(ttl)?;
        self.run(host, addr, size, &mut session)
    }

    /// Drive one probe over an open session.
    fn run<S: Socket>(
        &self,
        host: &str,
        addr: Ipv4Addr,
        size: PacketSize,
        session: &mut Session<S>,
    ) -> Result<ProbeResult> {
        let mut icmp_buf = [0_u8; MAX_PACKET_SIZE];
        let echo = make_echo_request(&mut icmp_buf, self.identifier, size)?;
        let packet_size = echo.packet().len();
        session.send(addr, echo.packet())?;
        let deadline = Instant::now() + self.config.probe_timeout;
        let mut recv_buf = [0_u8; MAX_DATAGRAM_SIZE];
        loop {
            // each receive attempt re-arms the bounded wait; the deadline
            // caps the probe as a whole no matter how much unrelated traffic
            // keeps arriving
            if Instant::now() >= deadline {
                return Err(Error::TimedOut);
            }
            let Some((bytes_read, from)) =
                session.recv(&mut recv_buf, self.config.receive_timeout)?
            else {
                return Err(Error::TimedOut);
            };
            let datagram = &recv_buf[..bytes_read];
            match peek_identifier(datagram) {
                Ok(Some(identifier)) if identifier == self.identifier => {
                    let reply = decode_reply(datagram)?;
                    let rtt_ms = i64::from(timestamp_ms().wrapping_sub(reply.timestamp_ms));
                    return Ok(ProbeResult::complete(host, &reply, packet_size, rtt_ms));
                }
                Ok(Some(identifier)) => {
                    tracing::debug!(?identifier, ?from, "discarding reply for another probe");
                }
                Ok(None) => {
                    tracing::debug!(?from, "discarding non-reply datagram");
                }
                Err(err) => {
                    tracing::debug!(%err, ?from, "discarding undecodable datagram");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IoError, IoResult};
    use crate::mocket_recv_from;
    use crate::net::ipv4::tests::{echo_reply_datagram, time_exceeded_datagram};
    use crate::net::socket::MockSocket;
    use mockall::Sequence;
    use std::io;
    use std::net::{IpAddr, SocketAddr};
    use std::time::Duration;

    const TARGET: Ipv4Addr = Ipv4Addr::new(1, 2, 3, 4);
    const HOP: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 0);

    fn prober() -> Prober {
        Prober::new(
            ProbeId(4711),
            ProbeConfig {
                receive_timeout: Duration::from_millis(500),
                probe_timeout: Duration::from_secs(3),
            },
        )
    }

    fn mocket() -> MockSocket {
        let mut socket = MockSocket::new();
        socket.expect_set_ttl().returning(|_| Ok(()));
        socket.expect_send_to().returning(|buf, _| Ok(buf.len()));
        socket
    }

    #[test]
    fn test_probe_decodes_matching_echo_reply() {
        let mut socket = mocket();
        let datagram = echo_reply_datagram(4711, timestamp_ms(), TARGET, 57);
        socket.expect_is_readable().times(1).returning(|_| Ok(true));
        socket
            .expect_recv_from()
            .times(1)
            .returning(mocket_recv_from!(datagram, HOP));
        let mut session = Session::attach(socket, TimeToLive(30)).unwrap();
        let result = prober()
            .run("1.2.3.4", TARGET, PacketSize(32), &mut session)
            .unwrap();
        assert!(!result.error);
        assert!(!result.ttl_exceeded);
        assert_eq!(Some(IpAddr::V4(TARGET)), result.responder);
        assert_eq!(57, result.ttl);
        assert_eq!(32, result.size);
        assert!(result.rtt_ms >= 0);
    }

    #[test]
    fn test_probe_ignores_mismatched_identifier() {
        let mut seq = Sequence::new();
        let mut socket = mocket();
        let other = echo_reply_datagram(9999, timestamp_ms(), TARGET, 57);
        let matching = echo_reply_datagram(4711, timestamp_ms(), TARGET, 57);
        for datagram in [other, matching] {
            socket
                .expect_is_readable()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(true));
            socket
                .expect_recv_from()
                .times(1)
                .in_sequence(&mut seq)
                .returning(mocket_recv_from!(datagram, HOP));
        }
        let mut session = Session::attach(socket, TimeToLive(30)).unwrap();
        let result = prober()
            .run("1.2.3.4", TARGET, PacketSize(32), &mut session)
            .unwrap();
        assert!(!result.error);
        assert_eq!(Some(IpAddr::V4(TARGET)), result.responder);
    }

    #[test]
    fn test_probe_skips_its_own_request_on_loopback() {
        use crate::net::ipv4::tests::wrap_as_ip_datagram;
        let mut seq = Sequence::new();
        let mut socket = mocket();
        let mut request_buf = [0_u8; MAX_PACKET_SIZE];
        let request = make_echo_request(&mut request_buf, ProbeId(4711), PacketSize(32)).unwrap();
        let own_request = wrap_as_ip_datagram(request.packet(), Ipv4Addr::LOCALHOST, 64);
        let reply = echo_reply_datagram(4711, timestamp_ms(), Ipv4Addr::LOCALHOST, 64);
        for datagram in [own_request, reply] {
            socket
                .expect_is_readable()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(true));
            socket
                .expect_recv_from()
                .times(1)
                .in_sequence(&mut seq)
                .returning(mocket_recv_from!(datagram, HOP));
        }
        let mut session = Session::attach(socket, TimeToLive(30)).unwrap();
        let result = prober()
            .run("127.0.0.1", Ipv4Addr::LOCALHOST, PacketSize(32), &mut session)
            .unwrap();
        assert!(!result.error);
        assert!(!result.ttl_exceeded);
    }

    #[test]
    fn test_probe_times_out_without_reading() {
        let mut socket = mocket();
        socket
            .expect_is_readable()
            .times(1)
            .returning(|_| Ok(false));
        // no recv_from expectation: reading after the wait expires would fail
        // the test
        let mut session = Session::attach(socket, TimeToLive(30)).unwrap();
        let err = prober()
            .run("1.2.3.4", TARGET, PacketSize(32), &mut session)
            .unwrap_err();
        assert!(matches!(err, Error::TimedOut));
    }

    #[test]
    fn test_probe_deadline_caps_unrelated_traffic() {
        let mut socket = mocket();
        let other = echo_reply_datagram(9999, timestamp_ms(), TARGET, 57);
        socket.expect_is_readable().returning(|_| Ok(true));
        socket
            .expect_recv_from()
            .returning(mocket_recv_from!(other, HOP));
        let mut session = Session::attach(socket, TimeToLive(30)).unwrap();
        let prober = Prober::new(
            ProbeId(4711),
            ProbeConfig {
                receive_timeout: Duration::from_millis(1),
                probe_timeout: Duration::from_millis(50),
            },
        );
        let err = prober
            .run("1.2.3.4", TARGET, PacketSize(32), &mut session)
            .unwrap_err();
        assert!(matches!(err, Error::TimedOut));
    }

    #[test]
    fn test_probe_ttl_exceeded_reply() {
        let mut socket = mocket();
        let datagram = time_exceeded_datagram(4711, timestamp_ms());
        socket.expect_is_readable().times(1).returning(|_| Ok(true));
        socket
            .expect_recv_from()
            .times(1)
            .returning(mocket_recv_from!(datagram, HOP));
        let mut session = Session::attach(socket, TimeToLive(1)).unwrap();
        let result = prober()
            .run("1.2.3.4", TARGET, PacketSize(32), &mut session)
            .unwrap();
        assert!(!result.error);
        assert!(result.ttl_exceeded);
        assert_eq!(
            Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))),
            result.responder
        );
    }

    #[test]
    fn test_probe_send_failure() {
        let mut socket = MockSocket::new();
        socket.expect_set_ttl().returning(|_| Ok(()));
        socket.expect_send_to().times(1).returning(|_, addr| {
            Err(IoError::SendTo(
                io::Error::from(io::ErrorKind::PermissionDenied),
                addr,
            ))
        });
        let mut session = Session::attach(socket, TimeToLive(30)).unwrap();
        let err = prober()
            .run("1.2.3.4", TARGET, PacketSize(32), &mut session)
            .unwrap_err();
        assert!(matches!(err, Error::SendFailed(_)));
    }

    #[test]
    fn test_probe_unresolvable_host_creates_no_socket() {
        // an empty host fails resolution before Session::open runs, so this
        // needs no privileges and must report a plain failure
        let result = prober().probe("", PacketSize(32), TimeToLive(30));
        assert!(result.error);
        assert!(!result.ttl_exceeded);
        assert_eq!(None, result.responder);
    }
}
