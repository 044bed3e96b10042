use derive_more::{Add, AddAssign};

/// `ProbeId` newtype.
///
/// A 16-bit value identifying all probes issued by one probing context (one
/// worker tracing one host).  It is assigned explicitly when the context is
/// created and stays constant for the lifetime of the context; it is never
/// derived from ambient runtime identity such as a thread id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd)]
pub struct ProbeId(pub u16);

/// `TimeToLive` (ttl) newtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Add, AddAssign)]
pub struct TimeToLive(pub u8);

/// `PacketSize` newtype.
///
/// The requested size of the `ICMP` portion of the probe packet; clamped to
/// `[8, 1024]` when the packet is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd)]
pub struct PacketSize(pub u16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_add() {
        let mut ttl = TimeToLive(1);
        ttl += TimeToLive(1);
        assert_eq!(TimeToLive(2), ttl);
        assert_eq!(TimeToLive(5), ttl + TimeToLive(3));
    }
}
