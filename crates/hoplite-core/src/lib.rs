//! Hoplite - an `ICMP` echo probe engine.
//!
//! This crate provides the probing facility used by the standalone
//! `hoplite-ping` and `hoplite-trace` tools: it builds a raw `ICMP` echo
//! request, sends it with a caller-chosen time-to-live, waits for the
//! correlated reply with a bounded timeout and decodes it into a
//! [`ProbeResult`].
//!
//! Each probe owns its socket exclusively: a [`Session`]
//! is created when the probe starts (the outbound TTL is a socket option and
//! must be in place before the first send) and closed when it completes.
//! Replies are correlated by a 16-bit [`ProbeId`] carried in the echo
//! request and echoed back by the destination, or recovered from the
//! router-embedded copy of the request for `TimeExceeded` and
//! `DestinationUnreachable` errors.
//!
//! # Example
//!
//! The following example probes a host once at the default time-to-live and
//! prints the outcome:
//!
//! ```no_run
//! use hoplite_core::{defaults, PacketSize, ProbeConfig, ProbeId, Prober, TimeToLive};
//!
//! let prober = Prober::new(ProbeId(1234), ProbeConfig::default());
//! let result = prober.probe(
//!     "example.com",
//!     PacketSize(defaults::DEFAULT_PACKET_SIZE),
//!     TimeToLive(defaults::DEFAULT_TTL),
//! );
//! println!("{result:?}");
//! ```
//!
//! # See Also
//!
//! - [`Prober::probe`] - Issue a single probe.
//! - [`Tracer::trace`] - Walk the hops towards a target.
#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::option_if_let_else,
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]
#![deny(unsafe_code)]

mod config;
mod error;
mod net;
mod probe;
mod prober;
mod resolve;
mod tracer;
mod types;

pub use config::{defaults, ErrorPolicy, ProbeConfig, WalkConfig};
pub use error::{Error, IoError, IoOperation, Result};
pub use net::session::Session;
pub use net::SocketImpl;
pub use probe::{ProbeResult, Reply, ReplyKind};
pub use prober::{Pinger, Prober};
pub use resolve::resolve;
pub use tracer::Tracer;
pub use types::{PacketSize, ProbeId, TimeToLive};
