//! # Core Playback Traits
//!
//! Abstractions over the video decode/render pipeline that a surface binding
//! drives. The pipeline itself (renderer selection, decoder fallback, track
//! selection strategy, media source factories) lives behind
//! [`PlaybackEngine`] and is configured once, inside an [`EngineFactory`].
//!
//! ## Threading Model
//!
//! An engine is exclusively owned by one binding and is only ever called from
//! the binding's sequencing context. Playback progression (position advancing,
//! buffering) may happen on threads owned by the engine; accessors must
//! therefore be safe to call while those threads run, and
//! [`PlaybackEngine::current_state`] must read every restorable field in one
//! consistent step.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use core_playback::{EngineFactory, PlaybackEngine};
//! use std::sync::Arc;
//!
//! let factory: EngineFactory = Arc::new(|| {
//!     let engine = MyExoLikeEngine::builder()
//!         .decoder_fallback(true)
//!         .build()?;
//!     Ok(Box::new(engine) as Box<dyn PlaybackEngine>)
//! });
//! ```

use crate::config::MediaItem;
use crate::error::Result;
use crate::events::EngineEventListener;
use bridge_traits::platform::{PlatformSend, PlatformSendSync};
use bridge_traits::surface::Surface;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Track Selection
// ============================================================================

/// Kind of elementary stream a track carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Video,
    Audio,
    Text,
}

/// One selected track, addressed by its group and index within the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackSelection {
    pub track_type: TrackType,
    pub group_index: u32,
    pub track_index: u32,
}

impl TrackSelection {
    pub fn new(track_type: TrackType, group_index: u32, track_index: u32) -> Self {
        Self {
            track_type,
            group_index,
            track_index,
        }
    }
}

// ============================================================================
// Engine State
// ============================================================================

/// Decoded video dimensions plus the rotation the decoder did not apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoSize {
    pub width: u32,
    pub height: u32,
    /// Clockwise rotation in degrees still to be applied at composition time.
    pub unapplied_rotation_degrees: i32,
}

impl VideoSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            unapplied_rotation_degrees: 0,
        }
    }

    pub fn with_rotation(mut self, degrees: i32) -> Self {
        self.unapplied_rotation_degrees = degrees;
        self
    }

    /// Returns `true` until the decoder has reported real dimensions.
    pub fn is_unknown(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Resumable playback state read from an engine in one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    /// Current playback position.
    pub position: Duration,
    /// Tracks currently selected for rendering.
    pub track_selections: Vec<TrackSelection>,
    /// Playback speed multiplier (1.0 = normal).
    pub playback_speed: f32,
    /// Output volume in `0.0..=1.0`.
    pub volume: f32,
    /// Whether the engine loops back to the start at the end of the media.
    pub looping: bool,
    /// Whether playback proceeds as soon as the engine is ready.
    pub play_when_ready: bool,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            position: Duration::ZERO,
            track_selections: Vec::new(),
            playback_speed: 1.0,
            volume: 1.0,
            looping: false,
            play_when_ready: false,
        }
    }
}

// ============================================================================
// Core Traits
// ============================================================================

/// A media decode/render pipeline instance.
///
/// Engines are expensive to construct and hold hardware decoder resources
/// until [`release`](PlaybackEngine::release) is called; dropping an engine
/// without releasing it is a resource leak on most platforms.
pub trait PlaybackEngine: PlatformSend {
    /// Bind the engine to the media it will play.
    fn set_media_item(&mut self, item: &MediaItem);

    /// Configure audio focus: mix with other audio or request exclusive focus.
    fn set_audio_mix(&mut self, mix_with_others: bool);

    /// Install the listener that receives engine events.
    fn set_event_listener(&mut self, listener: Box<dyn EngineEventListener>);

    /// Start loading media. Returns immediately; readiness is reported through
    /// the event listener.
    fn prepare(&mut self);

    /// Attach (or detach, with `None`) the render surface.
    fn set_video_surface(&mut self, surface: Option<Surface>);

    /// Read every restorable field in one consistent step.
    fn current_state(&self) -> EngineState;

    fn seek_to(&mut self, position: Duration);

    fn select_tracks(&mut self, selections: &[TrackSelection]);

    fn set_playback_speed(&mut self, speed: f32);

    fn set_volume(&mut self, volume: f32);

    fn set_looping(&mut self, looping: bool);

    /// Start or pause playback once the engine is ready.
    fn set_play_when_ready(&mut self, play: bool);

    /// Tear down the decode pipeline and free its hardware resources.
    fn release(&mut self);
}

/// Zero-argument constructor for fully configured, surface-less engines.
///
/// The factory captures renderer and track-selection configuration once so
/// that an engine recreated after surface loss is identical to the first.
pub type EngineFactory = Arc<dyn Fn() -> Result<Box<dyn PlaybackEngine>> + Send + Sync>;

/// Capability set shared by every player variant.
pub trait VideoPlayer: PlatformSendSync {
    /// Build the listener that translates engine events for this variant.
    fn create_event_listener(&self) -> Result<Box<dyn EngineEventListener>>;

    /// Resumable state of the player, whether or not an engine is live.
    fn current_state(&self) -> Result<EngineState>;

    /// Terminal teardown of the engine and every platform resource.
    fn release(&self) -> Result<()>;
}

// ============================================================================
// Tests
// ============================================================================
