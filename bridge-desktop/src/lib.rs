//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HeadlessSurfaceProvider`: off-screen texture slot whose lifecycle is
//!   driven explicitly by the embedding window
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::HeadlessSurfaceProvider;
//! use std::sync::Arc;
//!
//! let provider = Arc::new(HeadlessSurfaceProvider::new());
//! let player = TextureBoundEngine::builder()
//!     .surface_provider(provider.clone())
//!     // ...
//!     .build()?;
//!
//! provider.create_surface(1920, 1080)?;
//! ```

mod surface;

pub use surface::HeadlessSurfaceProvider;
