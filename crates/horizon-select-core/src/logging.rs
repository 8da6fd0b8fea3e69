//! Logging facilities for Horizon Select.
//!
//! Horizon Select uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_select=debug,horizon_select_core=trace")
//!         .init();
//! }
//! ```
//!
//! The constants below name the targets used throughout the workspace so
//! hosts can filter on a single subsystem. Spans carry the same targets.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Timer system target.
    pub const TIMER: &str = "horizon_select_core::timer";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_select_core::signal";
    /// Selection widget state machine target.
    pub const SELECT: &str = "horizon_select::select";
    /// Debounce scheduler target.
    pub const DEBOUNCE: &str = "horizon_select::debounce";
    /// Selection manager target.
    pub const SELECTION: &str = "horizon_select::selection";
}

/// Install a compact `tracing-subscriber` writer for tests.
///
/// Safe to call from every test; only the first call installs anything.
#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_are_namespaced() {
        init_test_tracing();
        for target in [targets::TIMER, targets::SIGNAL] {
            assert!(target.starts_with("horizon_select_core::"));
        }
        for target in [targets::SELECT, targets::DEBOUNCE, targets::SELECTION] {
            assert!(target.starts_with("horizon_select::"));
        }
        tracing::trace!(target: targets::TIMER, "logging initialised for tests");
    }
}
