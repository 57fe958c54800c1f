//! Snapshot of resumable playback state.
//!
//! Taken when a surface is torn down and the engine must be released, and
//! replayed onto the engine created once a new surface arrives.

use crate::traits::{EngineState, PlaybackEngine, TrackSelection};
use std::time::Duration;
use tracing::debug;

/// Immutable capture of an engine's resumable state.
///
/// Only [`save`](Self::save) creates a snapshot and [`restore`](Self::restore)
/// consumes it, so a snapshot is replayed at most once.
#[derive(Debug, PartialEq)]
pub struct EngineStateSnapshot {
    state: EngineState,
}

impl EngineStateSnapshot {
    /// Capture the engine's current state in one consistent read.
    pub fn save(engine: &dyn PlaybackEngine) -> Self {
        let state = engine.current_state();
        debug!(
            position_ms = state.position.as_millis() as u64,
            speed = state.playback_speed,
            volume = state.volume,
            play_when_ready = state.play_when_ready,
            tracks = state.track_selections.len(),
            "Saved engine state"
        );
        Self { state }
    }

    /// Replay the captured state onto a freshly created engine.
    ///
    /// Tracks are reselected before seeking so the seek lands in the right
    /// renditions; play intent is applied last so playback resumes from the
    /// restored position.
    pub fn restore(self, engine: &mut dyn PlaybackEngine) {
        let state = self.state;
        engine.select_tracks(&state.track_selections);
        engine.set_looping(state.looping);
        engine.set_volume(state.volume);
        engine.set_playback_speed(state.playback_speed);
        engine.seek_to(state.position);
        engine.set_play_when_ready(state.play_when_ready);
        debug!(
            position_ms = state.position.as_millis() as u64,
            "Restored engine state"
        );
    }

    pub fn position(&self) -> Duration {
        self.state.position
    }

    pub fn track_selections(&self) -> &[TrackSelection] {
        &self.state.track_selections
    }

    pub fn playback_speed(&self) -> f32 {
        self.state.playback_speed
    }

    pub fn volume(&self) -> f32 {
        self.state.volume
    }

    pub fn looping(&self) -> bool {
        self.state.looping
    }

    pub fn play_when_ready(&self) -> bool {
        self.state.play_when_ready
    }

    /// The full captured state.
    pub fn state(&self) -> &EngineState {
        &self.state
    }
}
