//! Tracing setup for the command line.
//!
//! Two layers share one registry: a daily rolling log file in the temp
//! directory that records everything `RUST_LOG` allows (`info` by default),
//! and a compact stderr layer whose default level follows `-q` / `-v`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;

use crate::args::GlobalArgs;

/// Initialize the file and stderr layers.
///
/// Returns a `WorkerGuard` that must be kept alive for the file logging to work.
pub fn init_tracing(args: &GlobalArgs) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(std::env::temp_dir(), "lurk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter("info"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(env_filter(stderr_level(args)));

    Registry::default().with(file_layer).with(stderr_layer).init();

    guard
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn stderr_level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "off";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
