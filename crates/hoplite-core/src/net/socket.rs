use crate::error::IoResult as Result;
use std::net::SocketAddr;
use std::time::Duration;

/// An operating system socket for sending and receiving `ICMP` packets.
///
/// One socket serves exactly one probe; the outbound time-to-live is a
/// per-socket option and so is configured before the first send and never
/// changed afterwards.
#[cfg_attr(test, mockall::automock)]
pub trait Socket
where
    Self: Sized,
{
    /// Create a raw IPv4 socket for sending and receiving `ICMP` packets.
    fn new_icmp_socket() -> Result<Self>;
    /// Set the outbound time-to-live.
    fn set_ttl(&mut self, ttl: u32) -> Result<()>;
    /// Send a packet, returning the number of bytes the OS accepted.
    fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> Result<usize>;
    /// Returns true if the socket becomes readable before the timeout, false
    /// otherwise.
    fn is_readable(&mut self, timeout: Duration) -> Result<bool>;
    /// Receive a single datagram.
    fn recv_from(&mut self, buf: &mut [u8]) -> Result<(usize, Option<SocketAddr>)>;
}
