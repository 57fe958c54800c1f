//! # Texture-Bound Player
//!
//! [`TextureBoundEngine`] is the shareable player handle hosts hold on to. It
//! owns a [`SurfaceBinding`] behind a mutex, registers itself as the
//! provider's [`SurfaceCallback`], and forwards playback controls to the live
//! engine.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_playback::{MediaItem, PlayerOptions, TextureBoundEngine};
//! use std::sync::Arc;
//!
//! let player = TextureBoundEngine::builder()
//!     .callbacks(Arc::new(FlutterEventSink::new(channel)))
//!     .surface_provider(texture_registry.create_surface_producer())
//!     .media_item(MediaItem::new("https://cdn.example.com/movie.m3u8"))
//!     .options(PlayerOptions::default().with_mix_with_others(true))
//!     .engine_factory(Arc::new(move || build_engine(&context)))
//!     .build()?;
//!
//! player.play()?;
//! ```

use crate::binding::{BindingPhase, SurfaceBinding};
use crate::config::{MediaItem, PlayerOptions};
use crate::error::{PlaybackError, Result};
use crate::events::{EngineEventListener, PlayerCallbacks};
use crate::traits::{EngineFactory, EngineState, VideoPlayer};
use bridge_traits::surface::{SurfaceCallback, SurfaceProvider};
use core_runtime::logging::redact_uri;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Player variant that renders into a texture supplied by a [`SurfaceProvider`].
///
/// Every entry point locks the inner binding for the duration of one
/// transition, so surface callbacks, controls and disposal never interleave.
/// [`PlayerCallbacks`] must not call back into the player synchronously.
pub struct TextureBoundEngine {
    binding: Mutex<SurfaceBinding>,
    callbacks: Arc<dyn PlayerCallbacks>,
    texture_id: i64,
}

impl TextureBoundEngine {
    /// Start building a texture-bound player.
    pub fn builder() -> TextureBoundEngineBuilder {
        TextureBoundEngineBuilder::default()
    }

    /// Create the player and register it as the provider's callback target.
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
    ) -> Result<Arc<Self>> {
        let binding = SurfaceBinding::new(
            Arc::clone(&callbacks),
            Arc::clone(&provider),
            media_item,
            options,
            factory,
        )?;
        let texture_id = binding.texture_id();

        let player = Arc::new(Self {
            binding: Mutex::new(binding),
            callbacks,
            texture_id,
        });

        let weak: Weak<Self> = Arc::downgrade(&player);
        let target: Weak<dyn SurfaceCallback> = weak;
        provider.set_callback(Some(target));
        player.attach_missed_surface(provider.as_ref());

        Ok(player)
    }

    /// A surface realized between the binding's initial query and callback
    /// registration was announced to nobody; pick it up now.
    fn attach_missed_surface(&self, provider: &dyn SurfaceProvider) {
        let result = {
            let mut binding = self.binding.lock();
            if binding.phase() != BindingPhase::PendingSurface || provider.surface().is_none() {
                return;
            }
            debug!(texture_id = self.texture_id, "Surface appeared during registration");
            binding.on_surface_available()
        };
        if let Err(err) = result {
            self.report("surface available", err);
        }
    }

    pub fn texture_id(&self) -> i64 {
        self.texture_id
    }

    pub fn phase(&self) -> BindingPhase {
        self.binding.lock().phase()
    }

    pub fn needs_surface(&self) -> bool {
        self.binding.lock().needs_surface()
    }

    pub fn play(&self) -> Result<()> {
        self.binding.lock().play()
    }

    pub fn pause(&self) -> Result<()> {
        self.binding.lock().pause()
    }

    pub fn seek_to(&self, position: Duration) -> Result<()> {
        self.binding.lock().seek_to(position)
    }

    pub fn set_volume(&self, volume: f32) -> Result<()> {
        self.binding.lock().set_volume(volume)
    }

    pub fn set_playback_speed(&self, speed: f32) -> Result<()> {
        self.binding.lock().set_playback_speed(speed)
    }

    pub fn set_looping(&self, looping: bool) -> Result<()> {
        self.binding.lock().set_looping(looping)
    }

    pub fn position(&self) -> Result<Duration> {
        self.binding.lock().position()
    }

    /// Release the engine, then the surface. Terminal.
    pub fn dispose(&self) -> Result<()> {
        self.binding.lock().dispose()
    }

    fn report(&self, event: &'static str, err: PlaybackError) {
        if err.is_contract_violation() {
            warn!(texture_id = self.texture_id, event, error = %err, "Surface contract violated");
        } else {
            error!(texture_id = self.texture_id, event, error = %err, "Surface transition failed");
        }
        self.callbacks.on_error("VideoError", &err.to_string());
    }
}

impl SurfaceCallback for TextureBoundEngine {
    fn on_surface_available(&self) {
        let result = self.binding.lock().on_surface_available();
        if let Err(err) = result {
            self.report("surface available", err);
        }
    }

    fn on_surface_cleanup(&self) {
        let result = self.binding.lock().on_surface_cleanup();
        if let Err(err) = result {
            self.report("surface cleanup", err);
        }
    }
}

impl VideoPlayer for TextureBoundEngine {
    fn create_event_listener(&self) -> Result<Box<dyn EngineEventListener>> {
        let binding = self.binding.lock();
        if binding.phase() == BindingPhase::Disposed {
            return Err(PlaybackError::Disposed);
        }
        Ok(binding.create_event_listener())
    }

    fn current_state(&self) -> Result<EngineState> {
        self.binding.lock().current_state()
    }

    fn release(&self) -> Result<()> {
        self.dispose()
    }
}

impl fmt::Debug for TextureBoundEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("TextureBoundEngine");
        debug.field("texture_id", &self.texture_id);
        match self.binding.try_lock() {
            Some(binding) => debug.field("binding", &*binding),
            None => debug.field("binding", &"<locked>"),
        };
        debug.finish_non_exhaustive()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`TextureBoundEngine`].
///
/// Fails fast with [`PlaybackError::CapabilityMissing`] when a required
/// collaborator is not supplied.
#[derive(Default)]
pub struct TextureBoundEngineBuilder {
    callbacks: Option<Arc<dyn PlayerCallbacks>>,
    surface_provider: Option<Arc<dyn SurfaceProvider>>,
    media_item: Option<MediaItem>,
    options: PlayerOptions,
    engine_factory: Option<EngineFactory>,
}

impl TextureBoundEngineBuilder {
    /// Sink for player notifications (required).
    pub fn callbacks(mut self, callbacks: Arc<dyn PlayerCallbacks>) -> Self {
        self.callbacks = Some(callbacks);
        self
    }

    /// Owner of the render surface (required).
    pub fn surface_provider(mut self, provider: Arc<dyn SurfaceProvider>) -> Self {
        self.surface_provider = Some(provider);
        self
    }

    /// Media to play (required).
    pub fn media_item(mut self, item: MediaItem) -> Self {
        self.media_item = Some(item);
        self
    }

    /// Playback options (defaults to [`PlayerOptions::default`]).
    pub fn options(mut self, options: PlayerOptions) -> Self {
        self.options = options;
        self
    }

    /// Constructor for configured engines (required).
    pub fn engine_factory(mut self, factory: EngineFactory) -> Self {
        self.engine_factory = Some(factory);
        self
    }

    /// Build the player.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::CapabilityMissing`] if a required collaborator is absent
    /// - Any error raised by the engine factory
    pub fn build(self) -> Result<Arc<TextureBoundEngine>> {
        let surface_provider = self.surface_provider.ok_or_else(|| {
            PlaybackError::CapabilityMissing {
                capability: "SurfaceProvider".to_string(),
                message: "A texture-bound player renders into a provider-owned surface. \
                          Supply the host's surface producer for this texture."
                    .to_string(),
            }
        })?;
        let engine_factory = self
            .engine_factory
            .ok_or_else(|| PlaybackError::CapabilityMissing {
                capability: "EngineFactory".to_string(),
                message: "No engine factory provided; engines must be recreatable after \
                          surface loss."
                    .to_string(),
            })?;
        let callbacks = self
            .callbacks
            .ok_or_else(|| PlaybackError::CapabilityMissing {
                capability: "PlayerCallbacks".to_string(),
                message: "No callback sink provided for player events.".to_string(),
            })?;
        let media_item = self
            .media_item
            .ok_or_else(|| PlaybackError::CapabilityMissing {
                capability: "MediaItem".to_string(),
                message: "No media item provided.".to_string(),
            })?;

        TextureBoundEngine::new(
            callbacks,
            surface_provider,
            media_item,
            self.options,
            engine_factory,
        )
    }
}

impl fmt::Debug for TextureBoundEngineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureBoundEngineBuilder")
            .field("callbacks", &self.callbacks.as_ref().map(|_| "PlayerCallbacks { ... }"))
            .field(
                "surface_provider",
                &self.surface_provider.as_ref().map(|p| p.texture_id()),
            )
            .field(
                "media_item",
                &self.media_item.as_ref().map(|m| redact_uri(&m.uri)),
            )
            .field("options", &self.options)
            .field(
                "engine_factory",
                &self.engine_factory.as_ref().map(|_| "EngineFactory { ... }"),
            )
            .finish()
    }
}
