use thiserror::Error;

/// Rejected slider configuration. Raised when a merged configuration would
/// break the invariants the geometry and scheduler rely on.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("items_on_display must be at least 1")]
    ZeroItemsOnDisplay,

    #[error("interval_ms must be greater than zero while cycling is enabled")]
    ZeroInterval,
}

#[derive(Error, Debug)]
pub enum SliderError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Slider controller is no longer running")]
    ControllerClosed,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, SliderError>;
