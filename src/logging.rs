//! Log output for the podcaster binary

use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber filtered by `RUST_LOG`
///
/// Without `RUST_LOG`, only warnings are shown, or debug output for this crate
/// when `verbose` is set.
pub fn init(verbose: bool) {
    let default_directive = if verbose { "warn,podcaster=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
