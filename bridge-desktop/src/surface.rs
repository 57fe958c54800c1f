//! Headless Surface Provider Implementation
//!
//! In-process [`SurfaceProvider`] for desktop hosts that render off-screen and
//! for exercising surface loss in tests. The embedding window (or test) drives
//! the lifecycle explicitly through [`HeadlessSurfaceProvider::create_surface`]
//! and [`HeadlessSurfaceProvider::destroy_surface`].

use bridge_traits::{
    error::{BridgeError, Result},
    surface::{Surface, SurfaceCallback, SurfaceProvider},
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

static NEXT_TEXTURE_ID: AtomicI64 = AtomicI64::new(1);

#[derive(Default)]
struct ProviderState {
    surface: Option<Surface>,
    callback: Option<Weak<dyn SurfaceCallback>>,
    released: bool,
    generation: u64,
}

/// Desktop surface provider backed by an off-screen texture slot.
///
/// Lifecycle notifications are delivered synchronously on the calling thread,
/// after the internal lock has been dropped, so callback targets may query
/// [`surface`](SurfaceProvider::surface) from inside a notification.
pub struct HeadlessSurfaceProvider {
    state: Mutex<ProviderState>,
    texture_id: i64,
    handles_crop_and_rotation: bool,
}

impl HeadlessSurfaceProvider {
    /// Create a provider whose compositor does not apply rotation metadata.
    pub fn new() -> Self {
        Self::with_crop_and_rotation(false)
    }

    /// Create a provider, declaring whether it applies crop and rotation itself.
    pub fn with_crop_and_rotation(handles_crop_and_rotation: bool) -> Self {
        Self {
            state: Mutex::new(ProviderState::default()),
            texture_id: NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed),
            handles_crop_and_rotation,
        }
    }

    /// Realize a new surface and notify the registered callback.
    ///
    /// # Errors
    ///
    /// Fails if a surface is already live or the provider was released.
    pub fn create_surface(&self, width: u32, height: u32) -> Result<Surface> {
        let (surface, callback) = {
            let mut state = self.state.lock();
            if state.released {
                return Err(BridgeError::OperationFailed(format!(
                    "texture {} was released",
                    self.texture_id
                )));
            }
            if state.surface.is_some() {
                return Err(BridgeError::OperationFailed(format!(
                    "texture {} already has a live surface",
                    self.texture_id
                )));
            }
            let surface = Surface::new(width, height);
            state.surface = Some(surface.clone());
            state.generation += 1;
            (surface, live_callback(&state))
        };

        info!(
            texture_id = self.texture_id,
            width, height, "Surface created"
        );
        if let Some(callback) = callback {
            callback.on_surface_available();
        }
        Ok(surface)
    }

    /// Notify the registered callback, then drop the live surface.
    ///
    /// # Errors
    ///
    /// Fails if there is no live surface.
    pub fn destroy_surface(&self) -> Result<()> {
        let callback = {
            let state = self.state.lock();
            if state.surface.is_none() {
                return Err(BridgeError::OperationFailed(format!(
                    "texture {} has no live surface to destroy",
                    self.texture_id
                )));
            }
            live_callback(&state)
        };

        // Consumers stop drawing before the surface goes away.
        if let Some(callback) = callback {
            callback.on_surface_cleanup();
        }

        self.state.lock().surface = None;
        info!(texture_id = self.texture_id, "Surface destroyed");
        Ok(())
    }

    /// Replace the live surface with one of a new size.
    pub fn resize(&self, width: u32, height: u32) -> Result<Surface> {
        self.destroy_surface()?;
        self.create_surface(width, height)
    }

    /// Number of surfaces realized so far.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn is_released(&self) -> bool {
        self.state.lock().released
    }

    pub fn has_callback(&self) -> bool {
        self.state.lock().callback.is_some()
    }
}

fn live_callback(state: &ProviderState) -> Option<Arc<dyn SurfaceCallback>> {
    state.callback.as_ref().and_then(Weak::upgrade)
}

impl Default for HeadlessSurfaceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceProvider for HeadlessSurfaceProvider {
    fn surface(&self) -> Option<Surface> {
        self.state.lock().surface.clone()
    }

    fn set_callback(&self, callback: Option<Weak<dyn SurfaceCallback>>) {
        let mut state = self.state.lock();
        if state.released && callback.is_some() {
            warn!(texture_id = self.texture_id, "Ignoring callback for released texture");
            return;
        }
        debug!(
            texture_id = self.texture_id,
            registered = callback.is_some(),
            "Surface callback updated"
        );
        state.callback = callback;
    }

    fn release(&self) {
        let mut state = self.state.lock();
        if state.released {
            return;
        }
        state.released = true;
        state.surface = None;
        state.callback = None;
        info!(texture_id = self.texture_id, "Texture released");
    }

    fn handles_crop_and_rotation(&self) -> bool {
        self.handles_crop_and_rotation
    }

    fn texture_id(&self) -> i64 {
        self.texture_id
    }
}
