//! # Surface-Bound Playback Module
//!
//! Keeps a video playback engine attached to a render surface whose lifetime
//! is controlled by the host's windowing/compositor subsystem.
//!
//! ## Overview
//!
//! This module handles:
//! - Attaching the engine to the surface once the provider realizes it
//! - Snapshotting and releasing the engine when the surface is torn down
//! - Recreating the engine and restoring position, tracks, speed, volume and
//!   play intent when a new surface arrives
//! - Translating engine events into caller-facing notifications
//!
//! ## Components
//!
//! - [`SurfaceBinding`] - the attach/suspend/resume state machine
//! - [`EngineStateSnapshot`] - immutable capture of resumable state
//! - [`TextureBoundEngine`] - shareable player handle registered with the provider

pub mod binding;
pub mod config;
pub mod error;
pub mod events;
pub mod listener;
pub mod snapshot;
pub mod texture;
pub mod traits;

pub use binding::{BindingPhase, SurfaceBinding};
pub use config::{MediaItem, PlayerOptions, StreamingFormat};
pub use error::{PlaybackError, Result};
pub use events::{EngineEvent, EngineEventListener, PlayerCallbacks};
pub use listener::{RotationDegrees, TextureEventListener};
pub use snapshot::EngineStateSnapshot;
pub use texture::{TextureBoundEngine, TextureBoundEngineBuilder};
pub use traits::{
    EngineFactory, EngineState, PlaybackEngine, TrackSelection, TrackType, VideoPlayer, VideoSize,
};
