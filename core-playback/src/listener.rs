//! Event listener for texture-backed players.
//!
//! Translates [`EngineEvent`]s into [`PlayerCallbacks`] and computes the
//! rotation correction the compositor has to apply when the surface provider
//! does not handle crop and rotation itself.

use crate::error::{PlaybackError, Result};
use crate::events::{EngineEvent, EngineEventListener, PlayerCallbacks};
use crate::traits::VideoSize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Clockwise rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDegrees {
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl RotationDegrees {
    /// Map a degree value onto a quarter turn. Negative values and values
    /// past a full turn are normalized first.
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Self::Rotate0),
            90 => Ok(Self::Rotate90),
            180 => Ok(Self::Rotate180),
            270 => Ok(Self::Rotate270),
            _ => Err(PlaybackError::UnsupportedRotation(degrees)),
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Self::Rotate0 => 0,
            Self::Rotate90 => 90,
            Self::Rotate180 => 180,
            Self::Rotate270 => 270,
        }
    }

    /// Returns `true` if the rotation exchanges width and height.
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Self::Rotate90 | Self::Rotate270)
    }
}

/// Listener installed on every engine owned by a texture-backed player.
pub struct TextureEventListener {
    callbacks: Arc<dyn PlayerCallbacks>,
    provider_handles_crop_and_rotation: bool,
    // Shared across engine generations so `on_initialized` fires once per player.
    initialized: Arc<AtomicBool>,
    buffering: bool,
}

impl TextureEventListener {
    pub fn new(
        callbacks: Arc<dyn PlayerCallbacks>,
        provider_handles_crop_and_rotation: bool,
        initialized: Arc<AtomicBool>,
    ) -> Self {
        Self {
            callbacks,
            provider_handles_crop_and_rotation,
            initialized,
            buffering: false,
        }
    }

    fn set_buffering(&mut self, buffering: bool) {
        if self.buffering == buffering {
            return;
        }
        self.buffering = buffering;
        if buffering {
            self.callbacks.on_buffering_start();
        } else {
            self.callbacks.on_buffering_end();
        }
    }

    fn send_initialized(&self, video_size: VideoSize, duration: Duration) {
        let mut width = video_size.width;
        let mut height = video_size.height;
        let mut correction = RotationDegrees::Rotate0;

        if !video_size.is_unknown() {
            if !self.provider_handles_crop_and_rotation {
                correction = RotationDegrees::from_degrees(video_size.unapplied_rotation_degrees)
                    .unwrap_or_else(|err| {
                        warn!(error = %err, "Ignoring rotation reported by engine");
                        RotationDegrees::Rotate0
                    });
            }
            // Portrait footage: the texture is rotated, so its reported size is too.
            if correction.is_quarter_turn() {
                std::mem::swap(&mut width, &mut height);
            }
        }

        debug!(
            width,
            height,
            rotation_correction = correction.degrees(),
            "Player initialized"
        );
        self.callbacks
            .on_initialized(width, height, duration, correction.degrees());
    }
}

impl EngineEventListener for TextureEventListener {
    fn on_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::BufferingStarted { buffered_position } => {
                self.set_buffering(true);
                self.callbacks.on_buffering_update(buffered_position);
            }
            EngineEvent::BufferingEnded => self.set_buffering(false),
            EngineEvent::Ready {
                video_size,
                duration,
            } => {
                self.set_buffering(false);
                if self
                    .initialized
                    .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    self.send_initialized(video_size, duration);
                }
            }
            EngineEvent::IsPlayingChanged(is_playing) => {
                self.callbacks.on_is_playing_state_update(is_playing);
            }
            EngineEvent::Ended => {
                self.set_buffering(false);
                self.callbacks.on_completed();
            }
            EngineEvent::Error(message) => {
                self.set_buffering(false);
                self.callbacks
                    .on_error("VideoError", &format!("Video player had error {message}"));
            }
        }
    }
}
