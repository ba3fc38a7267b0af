//! Logging setup and diagnostics shared by the es-stream crates.
//!
//! Components never write to a global logger directly. They receive a
//! [`Diagnostics`] handle and report through it; the default sink forwards to
//! `tracing`, which [`init_observability`] wires to stdout.

use std::borrow::Cow;

use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::{prelude::*, registry::LookupSpan};

pub use crate::diagnostics::{Diagnostic, DiagnosticSink, Diagnostics, MemorySink, TracingSink};
pub use crate::error_kind::ErrorKind;

use crate::format::StreamFormat;

mod diagnostics;
mod error_kind;
mod format;

const RUST_LOG_FORMAT: &str = "RUST_LOG_FORMAT";

pub type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Install the global `tracing` subscriber.
///
/// Log level comes from `RUST_LOG` (default `info`). Set `RUST_LOG_FORMAT=json`
/// to emit one JSON object per line, which is what CloudWatch expects.
pub fn init_observability(
    package_name: impl Into<Cow<'static, str>>,
    package_version: impl Into<Cow<'static, str>>,
) {
    let layers = vec![stdout()];

    tracing_subscriber::registry().with(layers).init();

    tracing::debug!(
        package = %package_name.into(),
        version = %package_version.into(),
        "observability initialized"
    );
}

fn stdout<S>() -> BoxedLayer<S>
where
    S: Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let log_env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("INFO"));

    let json_fmt = std::env::var(RUST_LOG_FORMAT)
        .map(|val| val == "json")
        .unwrap_or(false);

    if json_fmt {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .json()
            .with_filter(log_env_filter)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .event_format(StreamFormat::default())
            .fmt_fields(StreamFormat::default())
            .with_filter(log_env_filter)
            .boxed()
    }
}
