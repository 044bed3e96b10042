use crate::error::{Error, Result};
use crate::net::socket::Socket;
use crate::net::SocketImpl;
use crate::types::TimeToLive;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// The transport session for one probe.
///
/// Owns one live raw `ICMP` socket together with the time-to-live it was
/// configured with.  A session is created at the start of a probe and dropped
/// (closing the socket) at the end of that probe; it is never reused, because
/// the outbound TTL is a per-socket option which must be in place before the
/// first send.
#[derive(Debug)]
pub struct Session<S: Socket> {
    socket: S,
    ttl: TimeToLive,
}

impl Session<SocketImpl> {
    /// Open a session with a fresh raw `ICMP` socket.
    ///
    /// This operation requires the `CAP_NET_RAW` capability on Linux.
    pub fn open(ttl: TimeToLive) -> Result<Self> {
        Self::attach(SocketImpl::new_icmp_socket()?, ttl)
    }
}

impl<S: Socket> Session<S> {
    /// Configure an existing socket with the given time-to-live.
    pub fn attach(mut socket: S, ttl: TimeToLive) -> Result<Self> {
        socket.set_ttl(u32::from(ttl.0))?;
        Ok(Self { socket, ttl })
    }

    /// The time-to-live this session was configured with.
    #[must_use]
    pub const fn ttl(&self) -> TimeToLive {
        self.ttl
    }

    /// Send one probe packet.
    ///
    /// A partial send is logged and the probe carries on waiting for a reply;
    /// only an outright send failure aborts the probe.
    pub fn send(&mut self, dest: Ipv4Addr, buf: &[u8]) -> Result<()> {
        let addr = SocketAddr::new(IpAddr::V4(dest), 0);
        let sent = self.socket.send_to(buf, addr).map_err(Error::SendFailed)?;
        if sent < buf.len() {
            tracing::warn!(sent, expected = buf.len(), %dest, "partial send");
        }
        Ok(())
    }

    /// Wait for a datagram with a bounded timeout.
    ///
    /// Blocks on a readiness wait for at most `timeout`; on expiry returns
    /// `None` without attempting a read, otherwise performs exactly one
    /// receive call.
    pub fn recv(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<Option<(usize, Option<SocketAddr>)>> {
        if !self.socket.is_readable(timeout)? {
            return Ok(None);
        }
        match self.socket.recv_from(buf) {
            Ok((bytes_read, addr)) => Ok(Some((bytes_read, addr))),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(err) => Err(Error::Io(err)),
        }
    }
}
