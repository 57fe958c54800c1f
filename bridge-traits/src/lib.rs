//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the core library and platform-specific
//! implementations. Each trait represents a capability that the core requires but
//! that must be implemented differently per platform (desktop, iOS, Android, web).
//!
//! ## Traits
//!
//! ### Rendering
//! - [`SurfaceProvider`](surface::SurfaceProvider) - Owner of a render surface's lifecycle
//! - [`SurfaceCallback`](surface::SurfaceCallback) - Receiver of surface available/cleanup notifications
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ In Progress |
//! | iOS      | TBD                 | 📋 Planned |
//! | Android  | TBD                 | 📋 Planned |
//! | Web      | TBD                 | 📋 Planned |
//!
//! ## Fail-Fast Strategy
//!
//! The core fails fast with descriptive errors when a required capability is
//! missing. A texture-backed player cannot exist without a surface provider:
//!
//! ```ignore
//! use core_playback::{PlaybackError, TextureBoundEngine};
//!
//! let err = TextureBoundEngine::builder()
//!     .engine_factory(factory)
//!     .build()
//!     .unwrap_err();
//! assert!(matches!(err, PlaybackError::CapabilityMissing { .. }));
//! ```
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type for consistent
//! error handling. Platform implementations should:
//!
//! - Convert platform-specific errors to `BridgeError`
//! - Provide actionable error messages
//! - Include error context (e.g., texture ids, surface generations)
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds on native targets (see
//! [`platform`]). Surface callbacks are nonetheless delivered from a single
//! sequencing context; implementations must never invoke two callbacks for
//! the same target concurrently.

pub mod error;
pub mod logging;
pub mod platform;
pub mod surface;

pub use error::BridgeError;

// Re-export commonly used types
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use surface::{Surface, SurfaceCallback, SurfaceId, SurfaceProvider};
