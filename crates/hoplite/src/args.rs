use clap::Parser;

/// Ping one or more hosts in parallel.
///
/// Each host gets a single ICMP echo probe with fixed defaults (32 byte
/// packet, ttl 30, 500ms receive timeout) and a one line summary.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, arg_required_else_help(true))]
pub struct PingArgs {
    /// The hosts to ping.
    #[arg(required = true, value_name = "HOST")]
    pub hosts: Vec<String>,

    /// Enable verbose debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Trace the route to one or more hosts in parallel.
///
/// Each host is walked hop by hop (ttl 1 through 30) with fixed defaults and
/// reported as an ordered hop list.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, arg_required_else_help(true))]
pub struct TraceArgs {
    /// The hosts to trace.
    #[arg(required = true, value_name = "HOST")]
    pub hosts: Vec<String>,

    /// Enable verbose debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}
