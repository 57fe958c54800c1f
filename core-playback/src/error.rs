//! # Playback Error Types
//!
//! Error types for surface-bound video playback.

use thiserror::Error;

use crate::binding::BindingPhase;

/// Errors that can occur while driving a surface-bound player.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Contract Violations
    // ========================================================================
    /// A lifecycle event arrived in a state where it is not a defined transition.
    #[error("Illegal transition: {event} while {phase}")]
    IllegalTransition {
        /// State the binding was in when the event arrived.
        phase: BindingPhase,
        /// Event that was rejected.
        event: &'static str,
    },

    /// The provider signalled availability but has no surface to hand out.
    #[error("Surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A required capability was not supplied.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    /// The player has already been disposed.
    #[error("Player disposed")]
    Disposed,

    // ========================================================================
    // Engine Errors
    // ========================================================================
    /// The engine factory could not build an engine.
    #[error("Failed to create playback engine: {0}")]
    EngineCreation(String),

    /// The engine was released because its surface was torn down.
    #[error("Playback engine suspended until a surface becomes available")]
    EngineSuspended,

    // ========================================================================
    // Playback Control Errors
    // ========================================================================
    /// Invalid volume value (must be in range [0.0, 1.0]).
    #[error("Invalid volume: {0} (must be between 0.0 and 1.0)")]
    InvalidVolume(f32),

    /// Invalid playback speed (must be finite and positive).
    #[error("Invalid playback speed: {0} (must be greater than 0.0)")]
    InvalidPlaybackSpeed(f32),

    /// Rotation is not a multiple of 90 degrees.
    #[error("Unsupported rotation: {0} degrees")]
    UnsupportedRotation(i32),
}

impl PlaybackError {
    /// Returns `true` if this error indicates a broken caller or provider contract
    /// rather than a runtime condition.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            PlaybackError::IllegalTransition { .. }
                | PlaybackError::SurfaceUnavailable(_)
                | PlaybackError::CapabilityMissing { .. }
                | PlaybackError::Disposed
        )
    }

    /// Returns `true` if the operation may succeed once a new surface arrives.
    pub fn is_transient(&self) -> bool {
        matches!(self, PlaybackError::EngineSuspended)
    }

    /// Returns `true` if the engine factory failed.
    pub fn is_engine_error(&self) -> bool {
        matches!(self, PlaybackError::EngineCreation(_))
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
