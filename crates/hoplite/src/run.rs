use anyhow::anyhow;
use crossbeam::channel;
use hoplite_core::{
    defaults, PacketSize, ProbeConfig, ProbeId, ProbeResult, Prober, TimeToLive, Tracer, WalkConfig,
};
use hoplite_privilege::Privilege;
use std::process;
use std::sync::atomic::{AtomicU16, Ordering};
use std::thread;
use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber when verbose logging was requested.
pub fn init_tracing(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hoplite=debug,hoplite_core=debug")),
            )
            .init();
    }
}

/// Check that we can open raw sockets and fail with guidance if not.
pub fn ensure_privileges() -> anyhow::Result<()> {
    let privilege = Privilege::acquire_privileges()?;
    if privilege.has_privileges() {
        Ok(())
    } else {
        Err(anyhow!(
            "raw ICMP sockets require elevated privileges; run as root or grant CAP_NET_RAW"
        ))
    }
}

/// Allocate a correlation identifier for one probing context.
///
/// Unique within the process via the counter and unlikely to collide with
/// other processes probing at the same time via the pid.
fn next_probe_id() -> ProbeId {
    static COUNTER: AtomicU16 = AtomicU16::new(1);
    let pid = process::id() as u16;
    ProbeId(pid.wrapping_add(COUNTER.fetch_add(1, Ordering::Relaxed)))
}

/// Ping every host once, in parallel, and collect the results.
///
/// One worker thread per host; workers hand their result back over a channel
/// and are joined before this returns, so the result list is complete.
/// Results are returned in the order the hosts were given.
#[must_use]
pub fn run_ping(hosts: &[String]) -> Vec<ProbeResult> {
    let (tx, rx) = channel::unbounded();
    let handles: Vec<_> = hosts
        .iter()
        .enumerate()
        .map(|(index, host)| {
            let tx = tx.clone();
            let host = host.clone();
            let identifier = next_probe_id();
            thread::spawn(move || {
                let prober = Prober::new(identifier, ProbeConfig::default());
                let result = prober.probe(
                    &host,
                    PacketSize(defaults::DEFAULT_PACKET_SIZE),
                    TimeToLive(defaults::DEFAULT_TTL),
                );
                let _ = tx.send((index, result));
            })
        })
        .collect();
    drop(tx);
    for handle in handles {
        let _ = handle.join();
    }
    let mut results: Vec<_> = rx.iter().collect();
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, result)| result).collect()
}

/// Trace the route to every host, in parallel, and collect the hop lists.
///
/// Hop lists are returned in the order the hosts were given; the hops within
/// each list are in strictly increasing ttl order.
#[must_use]
pub fn run_trace(hosts: &[String]) -> Vec<(String, Vec<ProbeResult>)> {
    let (tx, rx) = channel::unbounded();
    let handles: Vec<_> = hosts
        .iter()
        .enumerate()
        .map(|(index, host)| {
            let tx = tx.clone();
            let host = host.clone();
            let identifier = next_probe_id();
            thread::spawn(move || {
                let prober = Prober::new(identifier, ProbeConfig::default());
                let tracer = Tracer::new(prober, WalkConfig::default());
                let hops = tracer.trace(&host);
                let _ = tx.send((index, host, hops));
            })
        })
        .collect();
    drop(tx);
    for handle in handles {
        let _ = handle.join();
    }
    let mut results: Vec<_> = rx.iter().collect();
    results.sort_by_key(|(index, _, _)| *index);
    results
        .into_iter()
        .map(|(_, host, hops)| (host, hops))
        .collect()
}
