use clap::Parser;
use hoplite::PingArgs;

fn main() -> anyhow::Result<()> {
    let args = PingArgs::parse();
    hoplite::init_tracing(args.verbose);
    hoplite::ensure_privileges()?;
    let results = hoplite::run_ping(&args.hosts);
    hoplite::print_ping_report(&results);
    Ok(())
}
