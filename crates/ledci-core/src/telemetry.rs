//! Log setup for the ledci binary.
//!
//! Build tool output goes to stdout through [`crate::LockedPrinter`]; tracing
//! events always go to stderr so the two streams never mix.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Set when colour escapes must not be written (see <https://no-color.org>).
pub const NO_COLOR_ENV_VAR: &str = "NO_COLOR";

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `level`. With `json` every event is one JSON object per
/// line. Only the first call in a process has any effect.
pub fn init_tracing(json: bool, level: Level) {
    let filter = env_filter(level);
    let ansi = std::env::var_os(NO_COLOR_ENV_VAR).is_none();

    let output: Box<dyn Layer<Registry> + Send + Sync> = if json {
        fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(false)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(output)
        .with(filter)
        .try_init()
        .ok();
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}
