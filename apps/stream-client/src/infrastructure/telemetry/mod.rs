//! Tracing Setup
//!
//! Structured logging via `tracing` with an `EnvFilter`. Call
//! [`init`] once at startup; log levels are controlled through
//! `RUST_LOG` (default `tradedash_stream_client=info`).

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the tracing subscriber.
///
/// # Panics
///
/// Panics if a subscriber was already installed, which indicates a
/// double initialization bug at startup.
#[allow(clippy::expect_used)]
pub fn init() {
    let env_filter = EnvFilter::from_default_env().add_directive(
        "tradedash_stream_client=info"
            .parse()
            .expect("static directive 'tradedash_stream_client=info' is valid"),
    );

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
