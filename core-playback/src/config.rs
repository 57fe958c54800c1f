//! # Player Configuration
//!
//! Media descriptors and playback options captured when a player is created.
//! Both are kept for the player's whole lifetime so that an engine recreated
//! after surface loss is configured exactly like the first one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Adaptive streaming container hint for remote media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamingFormat {
    /// MPEG-DASH manifest.
    Dash,
    /// HTTP Live Streaming playlist.
    Hls,
    /// Microsoft Smooth Streaming manifest.
    Smooth,
}

/// Descriptor of the media a player is bound to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Location of the media (`file://`, `asset://`, `https://`, `rtsp://`...).
    pub uri: String,
    /// Container hint when the URI does not make the format obvious.
    #[serde(default)]
    pub format_hint: Option<StreamingFormat>,
    /// HTTP headers to send with remote requests (e.g., Authorization).
    #[serde(default)]
    pub http_headers: HashMap<String, String>,
}

impl MediaItem {
    /// Create a media item for the given URI.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            format_hint: None,
            http_headers: HashMap::new(),
        }
    }

    /// Attach a streaming format hint.
    pub fn with_format_hint(mut self, format: StreamingFormat) -> Self {
        self.format_hint = Some(format);
        self
    }

    /// Add an HTTP header sent with remote requests.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.http_headers.insert(name.into(), value.into());
        self
    }

    /// Returns `true` if this item is fetched over the network.
    pub fn is_remote(&self) -> bool {
        let scheme = self.uri.split("://").next().unwrap_or_default();
        matches!(
            scheme.to_ascii_lowercase().as_str(),
            "http" | "https" | "rtsp"
        )
    }
}

/// Options applied to every engine a player creates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerOptions {
    /// Whether the player's audio may mix with other apps' audio instead of
    /// taking exclusive audio focus.
    ///
    /// Default: false.
    #[serde(default = "default_mix_with_others")]
    pub mix_with_others: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            mix_with_others: default_mix_with_others(),
        }
    }
}

impl PlayerOptions {
    /// Allow or forbid mixing with other audio.
    pub fn with_mix_with_others(mut self, mix: bool) -> Self {
        self.mix_with_others = mix;
        self
    }
}

fn default_mix_with_others() -> bool {
    false
}
