//! Errors surfaced by the engine's configuration layer.
//!
//! The simulation itself never fails; every odd input degrades to a no-op.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must lie in [0, 1], got {value}")]
    NotAProbability { field: &'static str, value: f64 },

    #[error("{field} ({min}) must not exceed {other} ({max})")]
    InvertedRange {
        field: &'static str,
        min: f64,
        other: &'static str,
        max: f64,
    },

    #[error("paddle width {paddle_width} does not fit the playable width {playable}")]
    PaddleTooWide { paddle_width: f32, playable: f32 },

    #[error("reward code length must be between 1 and 16, got {0}")]
    CodeLength(usize),

    #[cfg(feature = "serde")]
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}
