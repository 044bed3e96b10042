use clap::Parser;
use hoplite::TraceArgs;

fn main() -> anyhow::Result<()> {
    let args = TraceArgs::parse();
    hoplite::init_tracing(args.verbose);
    hoplite::ensure_privileges()?;
    let results = hoplite::run_trace(&args.hosts);
    hoplite::print_trace_report(&results);
    Ok(())
}
