//! Workspace facade crate.
//!
//! Re-exports the playback core and its bridge so host applications can
//! depend on `surface-player-workspace` alone. The `desktop-shims` feature
//! (default) adds the in-process desktop surface provider.

pub use bridge_traits;
pub use core_playback;
pub use core_runtime;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop;
