use std::fmt::{Display, Formatter};
use std::io;
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

/// A probe error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A probe error.
#[derive(Error, Debug)]
pub enum Error {
    /// The inbound datagram could not be parsed.
    #[error("invalid packet: {0}")]
    Packet(#[from] hoplite_packet::error::Error),
    /// The host is neither a dotted quad nor a resolvable name.
    #[error("failed to resolve {0}")]
    ResolutionFailed(String),
    /// An operating system call failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),
    /// The probe packet could not be sent.
    #[error("probe failed to send: {0}")]
    SendFailed(IoError),
    /// The destination reported itself unreachable.
    #[error("destination unreachable, reported by {0}")]
    Unreachable(IpAddr),
    /// A matching reply carried an `ICMP` type the probe cannot interpret.
    #[error("unknown ICMP packet type {0}")]
    UnknownIcmpType(u8),
    /// No matching reply arrived before the deadline.
    #[error("timed out waiting for a matching reply")]
    TimedOut,
}

/// Custom IO error result.
pub type IoResult<T> = std::result::Result<T, IoError>;

/// Custom IO error.
///
/// Carries the underlying OS error together with the operation that failed,
/// so a missing `CAP_NET_RAW` surfaces as `failed to create new socket:
/// EPERM` rather than a bare errno.
#[derive(Error, Debug)]
pub enum IoError {
    #[error("sendto error for {1}: {0}")]
    SendTo(io::Error, SocketAddr),
    #[error("failed to {1}: {0}")]
    Other(io::Error, IoOperation),
}

impl IoError {
    /// The kind of the underlying error.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::SendTo(e, _) | Self::Other(e, _) => e.kind(),
        }
    }
}

/// Io operation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IoOperation {
    NewSocket,
    SetNonBlocking,
    SetTtl,
    Select,
    RecvFrom,
}

impl Display for IoOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NewSocket => write!(f, "create new socket"),
            Self::SetNonBlocking => write!(f, "set non-blocking"),
            Self::SetTtl => write!(f, "set TTL"),
            Self::Select => write!(f, "select"),
            Self::RecvFrom => write!(f, "recv from"),
        }
    }
}
