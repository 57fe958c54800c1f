//! Engine events and caller-facing player callbacks.
//!
//! Engines report progress as [`EngineEvent`]s to an [`EngineEventListener`];
//! the listener translates them into [`PlayerCallbacks`] notifications that
//! the owner of the player (typically a UI bridge) consumes.

use crate::traits::VideoSize;
use bridge_traits::platform::{PlatformSend, PlatformSendSync};
use std::time::Duration;

/// Event emitted by a playback engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The engine started buffering; `buffered_position` is how far media is loaded.
    BufferingStarted { buffered_position: Duration },
    /// The engine left the buffering state.
    BufferingEnded,
    /// The engine is ready to render frames.
    Ready {
        video_size: VideoSize,
        duration: Duration,
    },
    /// Playback actually started or stopped.
    IsPlayingChanged(bool),
    /// The end of the media was reached.
    Ended,
    /// The engine hit an unrecoverable error.
    Error(String),
}

/// Receiver of engine events, installed on each engine when it is created.
pub trait EngineEventListener: PlatformSend {
    fn on_event(&mut self, event: EngineEvent);
}

/// Notifications delivered to the owner of a player.
pub trait PlayerCallbacks: PlatformSendSync {
    /// The media is ready. Sent once per player, even across engine recreation.
    fn on_initialized(&self, width: u32, height: u32, duration: Duration, rotation_correction: i32);

    fn on_buffering_start(&self);

    fn on_buffering_update(&self, buffered_position: Duration);

    fn on_buffering_end(&self);

    fn on_completed(&self);

    fn on_error(&self, code: &str, message: &str);

    fn on_is_playing_state_update(&self, is_playing: bool);
}
