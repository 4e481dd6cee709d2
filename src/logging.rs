//! Tracing setup
//!
//! In the browser events go to the devtools console through `tracing-wasm`.
//! Native builds (unit tests, tooling) use a plain fmt subscriber.

use tracing::Level;

#[cfg(debug_assertions)]
const MAX_TRACING_LEVEL: Level = Level::DEBUG;
#[cfg(not(debug_assertions))]
const MAX_TRACING_LEVEL: Level = Level::INFO;

/// Install the global subscriber. Call once, from the wasm start function.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(MAX_TRACING_LEVEL)
            .build(),
    );
    tracing::debug!("logging initialised");
}

/// Install the global subscriber. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let installed = tracing_subscriber::fmt()
        .with_max_level(MAX_TRACING_LEVEL)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("logging initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_logging();
        init_logging();
        tracing::info!("still logging");
    }
}
