//! Error types
//!
//! Only construction and validation can fail. A running tick never returns an
//! error: anything malformed it meets is logged and dropped.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Entity lane outside `[0, lane_count)`
    #[error("lane {lane} out of range (road has {lane_count} lanes)")]
    InvalidLane { lane: usize, lane_count: usize },

    /// Entity with a negative or non-finite size
    #[error("invalid entity dimensions {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid color {0:?} (expected #RRGGBB)")]
    InvalidColor(String),

    #[error("unknown car profile {0:?}")]
    UnknownCar(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
