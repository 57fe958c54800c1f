//! Render Surface Abstractions
//!
//! A render surface is owned by the host's windowing/compositor subsystem.
//! It can be created, destroyed and recreated at any time (app backgrounding,
//! view detachment, resize), and the core is told about those transitions
//! through a [`SurfaceCallback`] registered on the [`SurfaceProvider`].
//!
//! - **Android**: `SurfaceProducer` backed by a `SurfaceTexture` or `ImageReader`
//! - **iOS/macOS**: `CVPixelBuffer`-backed texture registry entry
//! - **Desktop**: GPU texture owned by the embedding window
//! - **Web**: Offscreen canvas

use serde::{Deserialize, Serialize};
use std::sync::Weak;
use uuid::Uuid;

use crate::platform::PlatformSendSync;

/// Identifier of one surface generation.
///
/// A provider hands out a new identifier every time it (re)creates its
/// surface, so two surfaces with the same id are the same native object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(Uuid);

impl SurfaceId {
    /// Generate a new surface identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct an identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque handle to a renderable destination.
///
/// Cloning a `Surface` clones the handle, not the native object. The object
/// itself stays owned by the [`SurfaceProvider`] that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surface {
    id: SurfaceId,
    width: u32,
    height: u32,
}

impl Surface {
    /// Create a handle for a freshly produced surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            id: SurfaceId::new(),
            width,
            height,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Receiver of surface lifecycle notifications.
///
/// Providers guarantee exactly one `on_surface_available` per surface
/// creation and exactly one `on_surface_cleanup` per surface destruction,
/// strictly alternating and never concurrent for the same callback target.
pub trait SurfaceCallback: PlatformSendSync {
    /// A renderable surface is ready (first creation or recreation).
    fn on_surface_available(&self);

    /// The current surface is about to be destroyed or reassigned.
    ///
    /// Anything drawing to the surface must stop before this returns.
    fn on_surface_cleanup(&self);
}

/// Owner of a render surface's lifecycle.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::surface::{SurfaceCallback, SurfaceProvider};
/// use std::sync::{Arc, Weak};
///
/// fn attach(provider: &dyn SurfaceProvider, target: &Arc<dyn SurfaceCallback>) {
///     provider.set_callback(Some(Arc::downgrade(target)));
///     if let Some(surface) = provider.surface() {
///         println!("surface {}x{} ready", surface.width(), surface.height());
///     }
/// }
/// ```
pub trait SurfaceProvider: PlatformSendSync {
    /// The surface currently available for rendering, if any.
    ///
    /// Returns `None` before the surface is first realized and between a
    /// cleanup and the next availability notification.
    fn surface(&self) -> Option<Surface>;

    /// Register (or clear, with `None`) the lifecycle callback target.
    ///
    /// The provider holds the target weakly; a target that has been dropped
    /// is simply not notified.
    fn set_callback(&self, callback: Option<Weak<dyn SurfaceCallback>>);

    /// Release the surface and drop the registered callback.
    ///
    /// After release the provider delivers no further notifications.
    fn release(&self);

    /// Whether the provider applies crop and rotation metadata itself.
    ///
    /// When `false`, consumers must report a rotation correction so the
    /// frame can be rotated during composition.
    fn handles_crop_and_rotation(&self) -> bool;

    /// Host-visible identifier of the texture backing this provider.
    fn texture_id(&self) -> i64;
}
