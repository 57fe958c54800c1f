//! # Surface Binding
//!
//! State machine that keeps one playback engine attached to one externally
//! managed render surface.
//!
//! ## States
//!
//! ```text
//!             new() ──┬──────────────► Attached ◄──────────────┐
//!                     │                  │   ▲                  │
//!                     ▼                  │   │ available        │ available
//!              PendingSurface ───────────┘   │ (no-op)          │ (recreate + restore)
//!                 available              cleanup                │
//!                                            ▼                  │
//!                                        Suspended ─────────────┘
//!
//!             any state ── dispose() ──► Disposed
//! ```
//!
//! While `Suspended` no engine exists: its resumable state lives in an
//! [`EngineStateSnapshot`] until the provider hands out a new surface.
//!
//! ## Concurrency
//!
//! Transitions take `&mut self`. Surface callbacks and disposal must arrive
//! from a single sequencing context; [`TextureBoundEngine`](crate::TextureBoundEngine)
//! enforces that by serializing every call through a mutex.

use crate::config::{MediaItem, PlayerOptions};
use crate::error::{PlaybackError, Result};
use crate::events::{EngineEventListener, PlayerCallbacks};
use crate::listener::TextureEventListener;
use crate::snapshot::EngineStateSnapshot;
use crate::traits::{EngineFactory, EngineState, PlaybackEngine};
use bridge_traits::surface::SurfaceProvider;
use core_runtime::logging::redact_uri;
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Observable phase of a [`SurfaceBinding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingPhase {
    /// Engine live with a surface attached.
    Attached,
    /// Engine live, waiting for the first surface.
    PendingSurface,
    /// Engine released, resumable state held in a snapshot.
    Suspended,
    /// Terminal.
    Disposed,
}

impl BindingPhase {
    /// Returns `true` if an engine instance currently exists.
    pub fn has_engine(&self) -> bool {
        matches!(self, Self::Attached | Self::PendingSurface)
    }
}

impl fmt::Display for BindingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Attached => "attached",
            Self::PendingSurface => "pending surface",
            Self::Suspended => "suspended",
            Self::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

enum BindingState {
    Attached(Box<dyn PlaybackEngine>),
    PendingSurface(Box<dyn PlaybackEngine>),
    Suspended(EngineStateSnapshot),
    Disposed,
}

impl BindingState {
    fn phase(&self) -> BindingPhase {
        match self {
            Self::Attached(_) => BindingPhase::Attached,
            Self::PendingSurface(_) => BindingPhase::PendingSurface,
            Self::Suspended(_) => BindingPhase::Suspended,
            Self::Disposed => BindingPhase::Disposed,
        }
    }
}

/// Binding between one playback engine and one surface slot.
pub struct SurfaceBinding {
    state: BindingState,
    provider: Arc<dyn SurfaceProvider>,
    callbacks: Arc<dyn PlayerCallbacks>,
    media_item: MediaItem,
    options: PlayerOptions,
    factory: EngineFactory,
    initialized: Arc<AtomicBool>,
    texture_id: i64,
}

impl SurfaceBinding {
    /// Create the first engine and attach the provider's surface if one is
    /// already realized.
    ///
    /// Without a surface the binding starts in [`BindingPhase::PendingSurface`];
    /// the provider will signal availability later.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the engine factory.
    pub fn new(
        callbacks: Arc<dyn PlayerCallbacks>,
        provider: Arc<dyn SurfaceProvider>,
        media_item: MediaItem,
        options: PlayerOptions,
        factory: EngineFactory,
    ) -> Result<Self> {
        let texture_id = provider.texture_id();
        let mut binding = Self {
            state: BindingState::Disposed,
            provider,
            callbacks,
            media_item,
            options,
            factory,
            initialized: Arc::new(AtomicBool::new(false)),
            texture_id,
        };

        let mut engine = binding.create_engine()?;
        binding.state = match binding.provider.surface() {
            Some(surface) => {
                engine.set_video_surface(Some(surface));
                BindingState::Attached(engine)
            }
            None => BindingState::PendingSurface(engine),
        };

        info!(
            texture_id,
            uri = %redact_uri(&binding.media_item.uri),
            phase = %binding.phase(),
            "Surface binding created"
        );
        Ok(binding)
    }

    /// Current state of the binding.
    pub fn phase(&self) -> BindingPhase {
        self.state.phase()
    }

    /// Returns `true` if the engine has no surface attached, either because
    /// none was available yet or because the binding is suspended.
    pub fn needs_surface(&self) -> bool {
        matches!(
            self.state,
            BindingState::PendingSurface(_) | BindingState::Suspended(_)
        )
    }

    /// The snapshot held while suspended.
    pub fn saved_snapshot(&self) -> Option<&EngineStateSnapshot> {
        match &self.state {
            BindingState::Suspended(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Host texture id of the provider this binding renders into.
    pub fn texture_id(&self) -> i64 {
        self.texture_id
    }

    /// Media every engine generation is bound to.
    pub fn media_item(&self) -> &MediaItem {
        &self.media_item
    }

    /// Options applied to every engine generation.
    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    /// Build the listener installed on every engine this binding creates.
    pub fn create_event_listener(&self) -> Box<dyn EngineEventListener> {
        Box::new(TextureEventListener::new(
            Arc::clone(&self.callbacks),
            self.provider.handles_crop_and_rotation(),
            Arc::clone(&self.initialized),
        ))
    }

    fn create_engine(&self) -> Result<Box<dyn PlaybackEngine>> {
        let mut engine = (self.factory)()?;
        engine.set_media_item(&self.media_item);
        engine.set_audio_mix(self.options.mix_with_others);
        engine.set_event_listener(self.create_event_listener());
        engine.prepare();
        Ok(engine)
    }

    // ========================================================================
    // Surface Lifecycle
    // ========================================================================

    /// React to the provider reporting a usable surface.
    ///
    /// - `Suspended`: recreate the engine, attach the surface, restore the snapshot.
    /// - `PendingSurface`: attach the surface to the existing engine.
    /// - `Attached`: redundant notification, nothing happens.
    ///
    /// # Errors
    ///
    /// - Engine factory errors while resuming; the binding stays suspended
    ///   with its snapshot intact.
    /// - [`PlaybackError::SurfaceUnavailable`] if the provider has no surface.
    /// - [`PlaybackError::Disposed`] after disposal.
    #[instrument(skip(self), fields(texture_id = self.texture_id))]
    pub fn on_surface_available(&mut self) -> Result<()> {
        match self.state {
            BindingState::Disposed => return Err(PlaybackError::Disposed),
            BindingState::Attached(_) => {
                debug!("Surface already attached, ignoring availability");
                return Ok(());
            }
            BindingState::PendingSurface(_) | BindingState::Suspended(_) => {}
        }

        let surface = self.provider.surface().ok_or_else(|| {
            PlaybackError::SurfaceUnavailable(format!(
                "texture {} signalled availability without a surface",
                self.texture_id
            ))
        })?;

        match std::mem::replace(&mut self.state, BindingState::Disposed) {
            BindingState::Suspended(snapshot) => {
                let mut engine = match self.create_engine() {
                    Ok(engine) => engine,
                    Err(err) => {
                        error!(error = %err, "Failed to recreate engine, staying suspended");
                        self.state = BindingState::Suspended(snapshot);
                        return Err(err);
                    }
                };
                engine.set_video_surface(Some(surface));
                let position = snapshot.position();
                snapshot.restore(engine.as_mut());
                self.state = BindingState::Attached(engine);
                info!(
                    position_ms = position.as_millis() as u64,
                    "Engine recreated and state restored"
                );
            }
            BindingState::PendingSurface(mut engine) => {
                engine.set_video_surface(Some(surface));
                self.state = BindingState::Attached(engine);
                info!("Surface attached");
            }
            other => self.state = other,
        }
        Ok(())
    }

    /// React to the provider announcing that the surface is about to go away.
    ///
    /// Snapshots the engine, releases it synchronously and enters `Suspended`.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::IllegalTransition`] unless the binding is `Attached`;
    /// the state is left untouched.
    #[instrument(skip(self), fields(texture_id = self.texture_id))]
    pub fn on_surface_cleanup(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, BindingState::Disposed) {
            BindingState::Attached(mut engine) => {
                let snapshot = EngineStateSnapshot::save(engine.as_ref());
                engine.release();
                drop(engine);
                info!(
                    position_ms = snapshot.position().as_millis() as u64,
                    "Engine released, playback suspended"
                );
                self.state = BindingState::Suspended(snapshot);
                Ok(())
            }
            BindingState::Disposed => Err(PlaybackError::Disposed),
            other => {
                let phase = other.phase();
                self.state = other;
                error!(%phase, "Surface cleanup without an attached surface");
                Err(PlaybackError::IllegalTransition {
                    phase,
                    event: "surface cleanup",
                })
            }
        }
    }

    /// Terminal teardown: release the engine, then the provider.
    ///
    /// The engine may still be drawing while it shuts down, so it is released
    /// before the provider frees the surface.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::Disposed`] if called a second time.
    #[instrument(skip(self), fields(texture_id = self.texture_id))]
    pub fn dispose(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, BindingState::Disposed) {
            BindingState::Disposed => return Err(PlaybackError::Disposed),
            BindingState::Attached(mut engine) | BindingState::PendingSurface(mut engine) => {
                engine.release();
            }
            BindingState::Suspended(_) => {}
        }
        self.provider.release();
        info!("Surface binding disposed");
        Ok(())
    }

    // ========================================================================
    // Playback Controls
    // ========================================================================

    fn live_engine(&mut self) -> Result<&mut Box<dyn PlaybackEngine>> {
        match &mut self.state {
            BindingState::Attached(engine) | BindingState::PendingSurface(engine) => Ok(engine),
            BindingState::Suspended(_) => Err(PlaybackError::EngineSuspended),
            BindingState::Disposed => Err(PlaybackError::Disposed),
        }
    }

    pub fn play(&mut self) -> Result<()> {
        self.live_engine()?.set_play_when_ready(true);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.live_engine()?.set_play_when_ready(false);
        Ok(())
    }

    pub fn seek_to(&mut self, position: Duration) -> Result<()> {
        self.live_engine()?.seek_to(position);
        Ok(())
    }

    /// Set output volume in `0.0..=1.0`.
    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(PlaybackError::InvalidVolume(volume));
        }
        self.live_engine()?.set_volume(volume);
        Ok(())
    }

    /// Set the playback speed multiplier. Must be finite and positive.
    pub fn set_playback_speed(&mut self, speed: f32) -> Result<()> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(PlaybackError::InvalidPlaybackSpeed(speed));
        }
        self.live_engine()?.set_playback_speed(speed);
        Ok(())
    }

    pub fn set_looping(&mut self, looping: bool) -> Result<()> {
        self.live_engine()?.set_looping(looping);
        Ok(())
    }

    /// Current position; while suspended, the position playback will resume at.
    pub fn position(&self) -> Result<Duration> {
        self.current_state().map(|state| state.position)
    }

    /// Resumable state of the live engine, or of the snapshot while suspended.
    pub fn current_state(&self) -> Result<EngineState> {
        match &self.state {
            BindingState::Attached(engine) | BindingState::PendingSurface(engine) => {
                Ok(engine.current_state())
            }
            BindingState::Suspended(snapshot) => Ok(snapshot.state().clone()),
            BindingState::Disposed => Err(PlaybackError::Disposed),
        }
    }
}

impl fmt::Debug for SurfaceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceBinding")
            .field("texture_id", &self.texture_id)
            .field("phase", &self.phase())
            .field("uri", &redact_uri(&self.media_item.uri))
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Drop for SurfaceBinding {
    fn drop(&mut self) {
        if matches!(self.state, BindingState::Disposed) {
            return;
        }
        warn!(
            texture_id = self.texture_id,
            phase = %self.phase(),
            "Surface binding dropped without dispose, releasing resources"
        );
        if let Err(err) = self.dispose() {
            error!(texture_id = self.texture_id, error = %err, "Dispose on drop failed");
        }
    }
}
