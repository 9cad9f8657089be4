//! Logging setup
//!
//! Structured logging through `tracing`. Logs go to stderr so stdout only
//! ever carries command output; a successful `validate` prints nothing.
//!
//! `RUST_LOG` takes precedence over the built-in filter:
//!
//! ```bash
//! RUST_LOG=chunkscan=trace chunkscan count big.log
//! RUST_LOG=chunkscan::scan::engine=debug chunkscan validate dump.bin
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "chunkscan=debug"
    } else {
        "warn"
    }
}

/// Initialize the tracing subscriber
///
/// Call once at startup. A second call is a no-op.
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(debug)
            .with_thread_names(debug)
            .compact(),
    );

    // Ignore error if a subscriber is already installed (tests)
    let _ = tracing::subscriber::set_global_default(subscriber);
}
