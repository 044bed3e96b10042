use crate::types::{PacketSize, TimeToLive};
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Default values for configuration.
pub mod defaults {
    use std::time::Duration;

    /// The default value for `packet-size`.
    ///
    /// The size of the `ICMP` portion of the probe, header included.
    pub const DEFAULT_PACKET_SIZE: u16 = 32;

    /// The default value for `ttl` for a single ping.
    pub const DEFAULT_TTL: u8 = 30;

    /// The default value for `first-ttl` for a hop walk.
    pub const DEFAULT_FIRST_TTL: u8 = 1;

    /// The default value for `max-ttl` for a hop walk.
    pub const DEFAULT_MAX_TTL: u8 = 30;

    /// The default value for `receive-timeout`.
    ///
    /// The bounded readiness wait for each receive attempt; a probe which
    /// receives no traffic at all times out after exactly one such wait.
    pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_millis(500);

    /// The default value for `probe-timeout`.
    ///
    /// The overall deadline for a single probe.  Each receive attempt re-arms
    /// the receive timeout, so a host which keeps sending unrelated traffic
    /// would otherwise hold the probe open indefinitely.
    pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);
}

/// Probe timing configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ProbeConfig {
    /// The bounded wait for each receive attempt.
    pub receive_timeout: Duration,
    /// The overall deadline for the probe.
    pub probe_timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            receive_timeout: defaults::DEFAULT_RECEIVE_TIMEOUT,
            probe_timeout: defaults::DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// How the hop walk treats a failed probe which did not reach the target.
///
/// A probe can fail for reasons unrelated to the destination being reached,
/// for example a malformed reply or a send error on one hop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorPolicy {
    /// Stop the walk on any failed probe.
    Halt,
    /// Record the failed hop and keep walking until the ttl ceiling.
    Continue,
}

impl Display for ErrorPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Halt => write!(f, "halt"),
            Self::Continue => write!(f, "continue"),
        }
    }
}

/// Hop walk configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WalkConfig {
    /// The size of each probe packet.
    pub packet_size: PacketSize,
    /// The ttl of the first hop.
    pub first_ttl: TimeToLive,
    /// The ttl ceiling.
    pub max_ttl: TimeToLive,
    /// How to treat failed probes.
    pub error_policy: ErrorPolicy,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            packet_size: PacketSize(defaults::DEFAULT_PACKET_SIZE),
            first_ttl: TimeToLive(defaults::DEFAULT_FIRST_TTL),
            max_ttl: TimeToLive(defaults::DEFAULT_MAX_TTL),
            error_policy: ErrorPolicy::Halt,
        }
    }
}
