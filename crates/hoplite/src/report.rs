use hoplite_core::ProbeResult;
use itertools::Itertools;

/// The separator printed between the progress output and the final report.
const SEPARATOR_WIDTH: usize = 60;

fn responder(result: &ProbeResult) -> String {
    result
        .responder
        .map_or_else(|| String::from("???"), |addr| addr.to_string())
}

/// Print a one line summary per pinged host.
pub fn print_ping_report(results: &[ProbeResult]) {
    println!("{}", "-".repeat(SEPARATOR_WIDTH));
    for result in results {
        let status = if result.error { "failed" } else { "success" };
        println!(
            "Ping {} {}, from: {}, ttl: {}, time: {} ms",
            result.target,
            status,
            responder(result),
            result.ttl,
            result.rtt_ms
        );
    }
}

/// Print an ordered hop list per traced host.
pub fn print_trace_report(results: &[(String, Vec<ProbeResult>)]) {
    println!("{}", "-".repeat(SEPARATOR_WIDTH));
    for (host, hops) in results {
        println!("Tracing to {host}:");
        let lines = hops
            .iter()
            .enumerate()
            .map(|(index, hop)| {
                format!("{:>3}  {} ms  {}", index + 1, hop.rtt_ms, responder(hop))
            })
            .join("\n");
        println!("{lines}");
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_responder_fallback() {
        let result = ProbeResult {
            target: String::from("example.com"),
            responder: None,
            size: 32,
            rtt_ms: -1,
            ttl: 0,
            ttl_exceeded: true,
            error: true,
        };
        assert_eq!("???", responder(&result));
    }

    #[test]
    fn test_responder_address() {
        let result = ProbeResult {
            target: String::from("example.com"),
            responder: Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))),
            size: 32,
            rtt_ms: 3,
            ttl: 254,
            ttl_exceeded: true,
            error: false,
        };
        assert_eq!("10.0.0.1", responder(&result));
    }
}
