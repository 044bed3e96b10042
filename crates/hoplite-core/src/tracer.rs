use crate::config::{ErrorPolicy, WalkConfig};
use crate::probe::ProbeResult;
use crate::prober::Pinger;
use crate::types::TimeToLive;

/// A hop walk towards a target.
///
/// Repeatedly invokes the probe driver with an increasing time-to-live,
/// starting at 1, and records one [`ProbeResult`] per hop.  Hops are strictly
/// ordered: each probe is issued only after the previous one has fully
/// completed.
///
/// The walk ends when a probe reaches the destination, when the ttl ceiling
/// is hit, or - subject to [`ErrorPolicy`] - when a probe fails outright.
#[derive(Debug, Clone)]
pub struct Tracer<P> {
    pinger: P,
    config: WalkConfig,
}

impl<P: Pinger> Tracer<P> {
    #[must_use]
    pub const fn new(pinger: P, config: WalkConfig) -> Self {
        Self { pinger, config }
    }

    /// Walk the hops towards `host` and return the results in hop order.
    pub fn trace(&self, host: &str) -> Vec<ProbeResult> {
        let mut hops = Vec::new();
        let mut ttl = self.config.first_ttl;
        while ttl <= self.config.max_ttl {
            let result = self.pinger.ping(host, self.config.packet_size, ttl);
            let walk_done = !result.ttl_exceeded
                && (!result.error || self.config.error_policy == ErrorPolicy::Halt);
            hops.push(result);
            if walk_done {
                break;
            }
            ttl += TimeToLive(1);
        }
        hops
    }
}
