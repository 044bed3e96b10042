//! Shared plumbing for the `hoplite-ping` and `hoplite-trace` binaries.
#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]
#![forbid(unsafe_code)]

mod args;
mod report;
mod run;

pub use args::{PingArgs, TraceArgs};
pub use report::{print_ping_report, print_trace_report};
pub use run::{ensure_privileges, init_tracing, run_ping, run_trace};
