//! Logging setup.

use tracing::Level;

/// Installs a plain-text subscriber writing to stderr at `level`.
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init(level: Level) {
    // `try_init` fails only when a global subscriber already exists.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
