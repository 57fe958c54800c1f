//! # Surface Lifecycle Example
//!
//! Drives a texture-bound player through the surface transitions a host
//! produces when the app is backgrounded and foregrounded again.
//!
//! Run with: `cargo run --example surface_lifecycle --package core-playback`

use bridge_desktop::HeadlessSurfaceProvider;
use bridge_traits::surface::Surface;
use bridge_traits::LogLevel;
use core_playback::{
    EngineEvent, EngineEventListener, EngineFactory, EngineState, MediaItem, PlaybackEngine,
    PlayerCallbacks, PlayerOptions, StreamingFormat, TextureBoundEngine, TrackSelection,
    VideoSize,
};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Simulated Engine (for demonstration)
// ============================================================================

#[derive(Default)]
struct SimulatedEngine {
    state: EngineState,
    listener: Option<Box<dyn EngineEventListener>>,
    surface: Option<Surface>,
}

impl PlaybackEngine for SimulatedEngine {
    fn set_media_item(&mut self, item: &MediaItem) {
        println!("  engine: media {:?}", item.format_hint);
    }

    fn set_audio_mix(&mut self, _mix_with_others: bool) {}

    fn set_event_listener(&mut self, listener: Box<dyn EngineEventListener>) {
        self.listener = Some(listener);
    }

    fn prepare(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_event(EngineEvent::Ready {
                video_size: VideoSize::new(1920, 1080).with_rotation(90),
                duration: Duration::from_secs(5400),
            });
        }
    }

    fn set_video_surface(&mut self, surface: Option<Surface>) {
        self.surface = surface;
    }

    fn current_state(&self) -> EngineState {
        self.state.clone()
    }

    fn seek_to(&mut self, position: Duration) {
        self.state.position = position;
    }

    fn select_tracks(&mut self, selections: &[TrackSelection]) {
        self.state.track_selections = selections.to_vec();
    }

    fn set_playback_speed(&mut self, speed: f32) {
        self.state.playback_speed = speed;
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.volume = volume;
    }

    fn set_looping(&mut self, looping: bool) {
        self.state.looping = looping;
    }

    fn set_play_when_ready(&mut self, play: bool) {
        self.state.play_when_ready = play;
        if let Some(listener) = self.listener.as_mut() {
            listener.on_event(EngineEvent::IsPlayingChanged(play));
        }
    }

    fn release(&mut self) {
        self.surface = None;
        self.listener = None;
    }
}

struct PrintingCallbacks;

impl PlayerCallbacks for PrintingCallbacks {
    fn on_initialized(&self, width: u32, height: u32, duration: Duration, rotation: i32) {
        println!(
            "  callback: initialized {}x{} ({}s, rotate {}°)",
            width,
            height,
            duration.as_secs(),
            rotation
        );
    }

    fn on_buffering_start(&self) {}

    fn on_buffering_update(&self, _buffered_position: Duration) {}

    fn on_buffering_end(&self) {}

    fn on_completed(&self) {
        println!("  callback: completed");
    }

    fn on_error(&self, code: &str, message: &str) {
        println!("  callback: {}: {}", code, message);
    }

    fn on_is_playing_state_update(&self, is_playing: bool) {
        println!("  callback: playing = {}", is_playing);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Debug),
    );

    let provider = Arc::new(HeadlessSurfaceProvider::new());
    let factory: EngineFactory =
        Arc::new(|| Ok(Box::new(SimulatedEngine::default()) as Box<dyn PlaybackEngine>));

    println!("1. Realize the surface and create the player");
    provider.create_surface(1920, 1080)?;
    let player = TextureBoundEngine::builder()
        .callbacks(Arc::new(PrintingCallbacks))
        .surface_provider(provider.clone())
        .media_item(
            MediaItem::new("https://cdn.example.com/films/feature.m3u8?token=demo")
                .with_format_hint(StreamingFormat::Hls),
        )
        .options(PlayerOptions::default())
        .engine_factory(factory)
        .build()?;

    println!("2. Play from 37s at 1.5x");
    player.seek_to(Duration::from_secs(37))?;
    player.set_playback_speed(1.5)?;
    player.play()?;

    println!("3. App goes to background: surface destroyed");
    provider.destroy_surface()?;
    println!("   phase = {}, resume at {:?}", player.phase(), player.position()?);

    println!("4. App returns: surface recreated");
    provider.create_surface(1920, 1080)?;
    println!("   phase = {}, position = {:?}", player.phase(), player.position()?);

    println!("5. Dispose");
    player.dispose()?;
    println!("   phase = {}", player.phase());

    Ok(())
}
