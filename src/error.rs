//! Error types.
//!
//! Interaction itself never fails: bad geometry degrades to safe defaults and
//! invalid gestures are no-ops. Loading configuration is the one fallible edge.

/// Error returned by [`crate::config::EngineConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The input is not valid JSON for an engine configuration.
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
    /// The grid unit is zero, negative or not finite.
    #[error("invalid grid size: {0}")]
    InvalidGridSize(f64),
    /// The smart-guide threshold is negative or not finite.
    #[error("invalid snap threshold: {0}")]
    InvalidSnapThreshold(f64),
    /// More quick slots were configured than there are digit keys.
    #[error("too many quick slots: {count} (max {max})")]
    TooManyQuickSlots { count: usize, max: usize },
    /// A creation binding names a key code that is not a physical key code.
    #[error("invalid key code in creation binding: {0:?}")]
    InvalidKeyCode(String),
}
