//! Error types for configuration and state handling

use thiserror::Error;

/// Errors raised while loading configuration or applying UI actions.
///
/// Per-frame animation never fails; everything here happens at a boundary
/// where the caller can report the problem and keep the previous state.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("the tree needs at least one layer")]
    NoLayers,

    #[error("layer {index} has invalid geometry (height {height}, radius {radius})")]
    InvalidLayer {
        index: usize,
        height: f32,
        radius: f32,
    },

    #[error("the {group} group must have a positive instance count")]
    EmptyGroup { group: &'static str },

    #[error("the {group} group asks for {count} instances, the limit is {max}")]
    TooManyInstances {
        group: &'static str,
        count: usize,
        max: usize,
    },

    #[error("the {group} scatter radius must be positive and finite, got {radius}")]
    InvalidScatterRadius { group: &'static str, radius: f32 },

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidRate { name: &'static str, value: f32 },

    #[error("unknown theme colour `{0}` (expected gold, silver or ruby)")]
    UnknownTheme(String),
}

pub type Result<T, E = TreeError> = std::result::Result<T, E>;
