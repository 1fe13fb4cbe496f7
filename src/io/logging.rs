//! Tracing subscriber setup for the command-line tool

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

/// Default filter directive for a run
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Handle for adjusting the installed subscriber's verbosity
pub struct LogControl {
    handle: Option<reload::Handle<EnvFilter, Registry>>,
    env_override: bool,
}

impl LogControl {
    /// Whether this call installed the global subscriber
    pub const fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Switch between info and debug output; ignored when `RUST_LOG` is set
    pub fn set_verbose(&self, verbose: bool) {
        if self.env_override {
            return;
        }
        let Some(handle) = &self.handle else {
            return;
        };
        if let Err(e) = handle.reload(EnvFilter::new(default_directive(verbose))) {
            tracing::warn!("Could not change log level: {e}");
        }
    }
}

/// Install a stderr fmt subscriber honoring `RUST_LOG`, falling back to info/debug
///
/// Calling this more than once is harmless; later calls keep the first subscriber
/// and return an inactive [`LogControl`].
pub fn init_tracing(verbose: bool) -> LogControl {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let env_override = env_filter.is_some();
    let filter = env_filter.unwrap_or_else(|| EnvFilter::new(default_directive(verbose)));
    let (filter, handle) = reload::Layer::new(filter);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .is_ok();

    LogControl {
        handle: installed.then_some(handle),
        env_override,
    }
}
