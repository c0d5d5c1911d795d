//! Error types for caption scheduling and presentation.

use bevy::prelude::Entity;
use thiserror::Error;

/// Rejected configuration, detected once at startup.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The path bounds are non-finite or `end` does not lie past `start`.
    #[error("path end ({end}) must be finite and greater than path start ({start})")]
    InvalidPath {
        /// Configured start bound.
        start: f32,
        /// Configured end bound.
        end: f32,
    },
    /// The dolly would never reach the end of the path.
    #[error("dolly speed must be positive, got {0}")]
    NonPositiveSpeed(f32),
    /// A pinned caption threshold does not lie on the path.
    #[error("caption {index} is pinned at {threshold}, outside the path")]
    ThresholdOutOfPath {
        /// Caption index in the script.
        index: usize,
        /// Offending threshold.
        threshold: f32,
    },
    /// The timed reveal period for this speed is not a representable duration.
    #[error("speed {speed} gives no usable reveal period for {segment}-unit segments")]
    RevealPeriod {
        /// Path length between consecutive captions.
        segment: f32,
        /// Configured dolly speed.
        speed: f32,
    },
    /// Two captions share one payload.
    #[error("caption {index} reuses the payload of an earlier caption")]
    DuplicatePayload {
        /// Index of the second occurrence.
        index: usize,
    },
}

/// A caption could not be shown.
#[derive(Debug, Error, PartialEq)]
pub enum PresentError {
    /// The caption entity was removed from the scene.
    #[error("caption entity {0} no longer exists")]
    Despawned(Entity),
}
