//! Surface lifecycle tests for core-playback
//!
//! This test suite verifies:
//! - Engine release and recreation across surface loss
//! - State restoration onto a distinct engine instance
//! - Tolerance of redundant and illegal provider notifications
//! - Disposal of the engine and the provider
//! - Error reporting through player callbacks

use bridge_desktop::HeadlessSurfaceProvider;
use bridge_traits::surface::{Surface, SurfaceCallback, SurfaceProvider};
use core_playback::{
    BindingPhase, EngineEvent, EngineEventListener, EngineFactory, EngineState, MediaItem,
    PlaybackEngine, PlaybackError, PlayerCallbacks, PlayerOptions, SurfaceBinding,
    TextureBoundEngine, TrackSelection, TrackType, VideoPlayer, VideoSize,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Recording Engine
// ============================================================================

#[derive(Default)]
struct EngineRecord {
    state: EngineState,
    surface: Option<Surface>,
    media_uri: Option<String>,
    mix_with_others: Option<bool>,
    prepared: bool,
    released: bool,
    surface_sets: usize,
    listener: Option<Box<dyn EngineEventListener>>,
}

struct RecordingEngine {
    record: Arc<Mutex<EngineRecord>>,
}

impl PlaybackEngine for RecordingEngine {
    fn set_media_item(&mut self, item: &MediaItem) {
        self.record.lock().media_uri = Some(item.uri.clone());
    }

    fn set_audio_mix(&mut self, mix_with_others: bool) {
        self.record.lock().mix_with_others = Some(mix_with_others);
    }

    fn set_event_listener(&mut self, listener: Box<dyn EngineEventListener>) {
        self.record.lock().listener = Some(listener);
    }

    fn prepare(&mut self) {
        self.record.lock().prepared = true;
    }

    fn set_video_surface(&mut self, surface: Option<Surface>) {
        let mut record = self.record.lock();
        record.surface = surface;
        record.surface_sets += 1;
    }

    fn current_state(&self) -> EngineState {
        self.record.lock().state.clone()
    }

    fn seek_to(&mut self, position: Duration) {
        self.record.lock().state.position = position;
    }

    fn select_tracks(&mut self, selections: &[TrackSelection]) {
        self.record.lock().state.track_selections = selections.to_vec();
    }

    fn set_playback_speed(&mut self, speed: f32) {
        self.record.lock().state.playback_speed = speed;
    }

    fn set_volume(&mut self, volume: f32) {
        self.record.lock().state.volume = volume;
    }

    fn set_looping(&mut self, looping: bool) {
        self.record.lock().state.looping = looping;
    }

    fn set_play_when_ready(&mut self, play: bool) {
        self.record.lock().state.play_when_ready = play;
    }

    fn release(&mut self) {
        let mut record = self.record.lock();
        record.released = true;
        record.surface = None;
    }
}

/// Keeps every engine the factory builds so tests can inspect past generations.
#[derive(Default)]
struct EngineRegistry {
    engines: Mutex<Vec<Arc<Mutex<EngineRecord>>>>,
    fail_next: AtomicBool,
}

impl EngineRegistry {
    fn factory(self: &Arc<Self>) -> EngineFactory {
        let registry = Arc::clone(self);
        Arc::new(move || {
            if registry.fail_next.swap(false, Ordering::SeqCst) {
                return Err(PlaybackError::EngineCreation(
                    "hardware decoder unavailable".to_string(),
                ));
            }
            let record = Arc::new(Mutex::new(EngineRecord::default()));
            registry.engines.lock().push(Arc::clone(&record));
            Ok(Box::new(RecordingEngine { record }) as Box<dyn PlaybackEngine>)
        })
    }

    fn count(&self) -> usize {
        self.engines.lock().len()
    }

    fn engine(&self, index: usize) -> Arc<Mutex<EngineRecord>> {
        Arc::clone(&self.engines.lock()[index])
    }

    fn emit(&self, index: usize, event: EngineEvent) {
        let record = self.engine(index);
        let mut record = record.lock();
        if let Some(listener) = record.listener.as_mut() {
            listener.on_event(event);
        }
    }
}

// ============================================================================
// Recording Callbacks
// ============================================================================

#[derive(Default)]
struct RecordingCallbacks {
    events: Mutex<Vec<String>>,
}

impl RecordingCallbacks {
    fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| event.starts_with("error"))
            .collect()
    }
}

impl PlayerCallbacks for RecordingCallbacks {
    fn on_initialized(&self, width: u32, height: u32, duration: Duration, rotation: i32) {
        self.events.lock().push(format!(
            "initialized {width}x{height} {}s rot={rotation}",
            duration.as_secs()
        ));
    }

    fn on_buffering_start(&self) {
        self.events.lock().push("buffering_start".into());
    }

    fn on_buffering_update(&self, buffered_position: Duration) {
        self.events
            .lock()
            .push(format!("buffered {}ms", buffered_position.as_millis()));
    }

    fn on_buffering_end(&self) {
        self.events.lock().push("buffering_end".into());
    }

    fn on_completed(&self) {
        self.events.lock().push("completed".into());
    }

    fn on_error(&self, code: &str, message: &str) {
        self.events.lock().push(format!("error {code}: {message}"));
    }

    fn on_is_playing_state_update(&self, is_playing: bool) {
        self.events.lock().push(format!("playing={is_playing}"));
    }
}

// ============================================================================
// Fixtures
// ============================================================================

struct Fixture {
    registry: Arc<EngineRegistry>,
    callbacks: Arc<RecordingCallbacks>,
    provider: Arc<HeadlessSurfaceProvider>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            registry: Arc::new(EngineRegistry::default()),
            callbacks: Arc::new(RecordingCallbacks::default()),
            provider: Arc::new(HeadlessSurfaceProvider::new()),
        }
    }

    fn media_item() -> MediaItem {
        MediaItem::new("https://cdn.example.com/vod/movie.mpd?sig=abc")
    }

    fn player(&self) -> Arc<TextureBoundEngine> {
        TextureBoundEngine::builder()
            .callbacks(self.callbacks.clone())
            .surface_provider(self.provider.clone())
            .media_item(Self::media_item())
            .options(PlayerOptions::default().with_mix_with_others(true))
            .engine_factory(self.registry.factory())
            .build()
            .expect("player should build")
    }

    /// A binding driven by hand; the provider never notifies it.
    fn binding(&self) -> SurfaceBinding {
        SurfaceBinding::new(
            self.callbacks.clone(),
            self.provider.clone(),
            Self::media_item(),
            PlayerOptions::default(),
            self.registry.factory(),
        )
        .expect("binding should build")
    }
}

fn assert_engine_xor_snapshot(binding: &SurfaceBinding) {
    let has_engine = binding.phase().has_engine();
    let has_snapshot = binding.saved_snapshot().is_some();
    assert!(
        has_engine != has_snapshot,
        "phase {} has engine={has_engine} snapshot={has_snapshot}",
        binding.phase()
    );
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_attaches_immediately_when_surface_exists() {
    let fixture = Fixture::new();
    let surface = fixture.provider.create_surface(1920, 1080).unwrap();

    let player = fixture.player();

    assert_eq!(player.phase(), BindingPhase::Attached);
    assert!(!player.needs_surface());
    assert_eq!(player.texture_id(), fixture.provider.texture_id());
    let engine = fixture.registry.engine(0);
    let engine = engine.lock();
    assert_eq!(engine.surface, Some(surface));
    assert!(engine.prepared);
    assert_eq!(engine.mix_with_others, Some(true));
    assert_eq!(
        engine.media_uri.as_deref(),
        Some("https://cdn.example.com/vod/movie.mpd?sig=abc")
    );
}

#[test]
fn test_waits_for_first_surface() {
    let fixture = Fixture::new();
    let player = fixture.player();

    assert_eq!(player.phase(), BindingPhase::PendingSurface);
    assert!(player.needs_surface());
    assert_eq!(fixture.registry.engine(0).lock().surface_sets, 0);

    fixture.provider.create_surface(1280, 720).unwrap();

    assert_eq!(player.phase(), BindingPhase::Attached);
    assert_eq!(fixture.registry.count(), 1);
    assert_eq!(
        fixture.registry.engine(0).lock().surface,
        fixture.provider.surface()
    );
}

/// Provider whose surface is realized while the player registers its
/// callback, after the initial query, without notifying anyone.
struct RegistrationRaceProvider {
    surface: Mutex<Option<Surface>>,
}

impl SurfaceProvider for RegistrationRaceProvider {
    fn surface(&self) -> Option<Surface> {
        self.surface.lock().clone()
    }

    fn set_callback(&self, callback: Option<std::sync::Weak<dyn SurfaceCallback>>) {
        if callback.is_some() {
            *self.surface.lock() = Some(Surface::new(1280, 720));
        }
    }

    fn release(&self) {
        *self.surface.lock() = None;
    }

    fn handles_crop_and_rotation(&self) -> bool {
        true
    }

    fn texture_id(&self) -> i64 {
        99
    }
}

#[test]
fn test_surface_realized_during_registration_is_attached() {
    let fixture = Fixture::new();
    let provider = Arc::new(RegistrationRaceProvider {
        surface: Mutex::new(None),
    });

    let player = TextureBoundEngine::builder()
        .callbacks(fixture.callbacks.clone())
        .surface_provider(provider.clone())
        .media_item(Fixture::media_item())
        .engine_factory(fixture.registry.factory())
        .build()
        .unwrap();

    assert_eq!(player.phase(), BindingPhase::Attached);
    assert_eq!(fixture.registry.count(), 1);
    assert_eq!(fixture.registry.engine(0).lock().surface, provider.surface());
    assert!(fixture.callbacks.errors().is_empty());
}

#[test]
fn test_builder_requires_surface_provider() {
    let fixture = Fixture::new();
    let result = TextureBoundEngine::builder()
        .callbacks(fixture.callbacks.clone())
        .media_item(Fixture::media_item())
        .engine_factory(fixture.registry.factory())
        .build();

    match result {
        Err(PlaybackError::CapabilityMissing { capability, .. }) => {
            assert_eq!(capability, "SurfaceProvider");
        }
        other => panic!("expected CapabilityMissing, got {other:?}"),
    }
    assert_eq!(fixture.registry.count(), 0);
}

#[test]
fn test_builder_requires_engine_factory() {
    let fixture = Fixture::new();
    let result = TextureBoundEngine::builder()
        .callbacks(fixture.callbacks.clone())
        .surface_provider(fixture.provider.clone())
        .media_item(Fixture::media_item())
        .build();

    assert!(matches!(
        result,
        Err(PlaybackError::CapabilityMissing { ref capability, .. }) if capability == "EngineFactory"
    ));
}

#[test]
fn test_initial_factory_failure_is_propagated() {
    let fixture = Fixture::new();
    fixture.registry.fail_next.store(true, Ordering::SeqCst);

    let result = TextureBoundEngine::builder()
        .callbacks(fixture.callbacks.clone())
        .surface_provider(fixture.provider.clone())
        .media_item(Fixture::media_item())
        .engine_factory(fixture.registry.factory())
        .build();

    assert!(matches!(result, Err(PlaybackError::EngineCreation(_))));
    assert!(!fixture.provider.has_callback());
}

// ============================================================================
// Suspend / Resume
// ============================================================================

#[test]
fn test_surface_loss_resumes_playback_on_new_engine() {
    let fixture = Fixture::new();
    fixture.provider.create_surface(1920, 1080).unwrap();
    let player = fixture.player();

    player.seek_to(Duration::from_secs(37)).unwrap();
    player.set_playback_speed(1.5).unwrap();
    player.set_volume(0.6).unwrap();
    player.play().unwrap();

    fixture.provider.destroy_surface().unwrap();

    assert_eq!(player.phase(), BindingPhase::Suspended);
    assert!(fixture.registry.engine(0).lock().released);
    assert_eq!(player.position().unwrap(), Duration::from_secs(37));

    let surface = fixture.provider.create_surface(1920, 1080).unwrap();

    assert_eq!(player.phase(), BindingPhase::Attached);
    assert_eq!(fixture.registry.count(), 2);
    let resumed = fixture.registry.engine(1);
    let resumed = resumed.lock();
    assert!(!resumed.released);
    assert!(resumed.prepared);
    assert_eq!(resumed.surface, Some(surface));
    assert_eq!(resumed.state.position, Duration::from_secs(37));
    assert_eq!(resumed.state.playback_speed, 1.5);
    assert_eq!(resumed.state.volume, 0.6);
    assert!(resumed.state.play_when_ready);
    assert!(fixture.callbacks.errors().is_empty());
}

#[test]
fn test_restore_reproduces_full_state_on_distinct_engine() {
    let fixture = Fixture::new();
    fixture.provider.create_surface(1280, 720).unwrap();
    let player = fixture.player();

    let saved = EngineState {
        position: Duration::from_millis(125_500),
        track_selections: vec![
            TrackSelection::new(TrackType::Video, 0, 1),
            TrackSelection::new(TrackType::Audio, 2, 0),
        ],
        playback_speed: 0.5,
        volume: 0.3,
        looping: true,
        play_when_ready: false,
    };
    fixture.registry.engine(0).lock().state = saved.clone();

    fixture.provider.resize(720, 1280).unwrap();

    assert_eq!(fixture.registry.count(), 2);
    assert!(!Arc::ptr_eq(
        &fixture.registry.engine(0),
        &fixture.registry.engine(1)
    ));
    assert_eq!(fixture.registry.engine(1).lock().state, saved);
    assert_eq!(player.current_state().unwrap(), saved);
}

#[test]
fn test_repeated_surface_loss_creates_one_engine_per_surface() {
    let fixture = Fixture::new();
    let player = fixture.player();

    for _ in 0..3 {
        fixture.provider.create_surface(640, 360).unwrap();
        fixture.provider.destroy_surface().unwrap();
    }

    assert_eq!(player.phase(), BindingPhase::Suspended);
    // The first surface attaches the pending engine, each later one recreates.
    assert_eq!(fixture.registry.count(), 3);
    for index in 0..3 {
        assert!(fixture.registry.engine(index).lock().released);
    }
}

#[test]
fn test_engine_xor_snapshot_across_transitions() {
    let fixture = Fixture::new();
    let mut binding = fixture.binding();
    assert_engine_xor_snapshot(&binding);

    fixture.provider.create_surface(800, 600).unwrap();
    binding.on_surface_available().unwrap();
    assert_engine_xor_snapshot(&binding);

    binding.on_surface_cleanup().unwrap();
    assert_engine_xor_snapshot(&binding);
    fixture.provider.destroy_surface().unwrap();

    fixture.provider.create_surface(800, 600).unwrap();
    binding.on_surface_available().unwrap();
    assert_engine_xor_snapshot(&binding);

    binding.dispose().unwrap();
    assert!(!binding.phase().has_engine());
    assert!(binding.saved_snapshot().is_none());
}

#[test]
fn test_controls_are_rejected_while_suspended() {
    let fixture = Fixture::new();
    fixture.provider.create_surface(800, 600).unwrap();
    let player = fixture.player();
    fixture.provider.destroy_surface().unwrap();

    assert!(matches!(player.play(), Err(PlaybackError::EngineSuspended)));
    assert!(matches!(
        player.seek_to(Duration::from_secs(5)),
        Err(PlaybackError::EngineSuspended)
    ));
    assert!(player.current_state().is_ok());
}

#[test]
fn test_control_arguments_are_validated() {
    let fixture = Fixture::new();
    let player = fixture.player();

    assert!(matches!(
        player.set_volume(1.5),
        Err(PlaybackError::InvalidVolume(_))
    ));
    assert!(matches!(
        player.set_playback_speed(0.0),
        Err(PlaybackError::InvalidPlaybackSpeed(_))
    ));
    assert!(matches!(
        player.set_playback_speed(f32::NAN),
        Err(PlaybackError::InvalidPlaybackSpeed(_))
    ));
    player.set_volume(0.0).unwrap();
    player.set_looping(true).unwrap();
    let state = fixture.registry.engine(0).lock().state.clone();
    assert_eq!(state.volume, 0.0);
    assert!(state.looping);
}

// ============================================================================
// Redundant and Illegal Notifications
// ============================================================================

#[test]
fn test_redundant_available_is_ignored() {
    let fixture = Fixture::new();
    fixture.provider.create_surface(1920, 1080).unwrap();
    let player = fixture.player();

    player.on_surface_available();
    player.on_surface_available();

    assert_eq!(player.phase(), BindingPhase::Attached);
    assert_eq!(fixture.registry.count(), 1);
    assert_eq!(fixture.registry.engine(0).lock().surface_sets, 1);
    assert!(fixture.callbacks.errors().is_empty());
}

#[test]
fn test_cleanup_without_surface_is_illegal() {
    let fixture = Fixture::new();
    let mut binding = fixture.binding();

    let err = binding.on_surface_cleanup().unwrap_err();

    assert!(matches!(
        err,
        PlaybackError::IllegalTransition {
            phase: BindingPhase::PendingSurface,
            ..
        }
    ));
    assert!(err.is_contract_violation());
    assert_eq!(binding.phase(), BindingPhase::PendingSurface);
    assert!(!fixture.registry.engine(0).lock().released);
}

#[test]
fn test_cleanup_while_suspended_is_illegal_and_keeps_snapshot() {
    let fixture = Fixture::new();
    fixture.provider.create_surface(800, 600).unwrap();
    let mut binding = fixture.binding();
    binding.seek_to(Duration::from_secs(12)).unwrap();
    binding.on_surface_cleanup().unwrap();

    let err = binding.on_surface_cleanup().unwrap_err();

    assert!(matches!(
        err,
        PlaybackError::IllegalTransition {
            phase: BindingPhase::Suspended,
            ..
        }
    ));
    assert_eq!(
        binding.saved_snapshot().map(|s| s.position()),
        Some(Duration::from_secs(12))
    );
}

#[test]
fn test_player_reports_illegal_cleanup_through_callbacks() {
    let fixture = Fixture::new();
    let player = fixture.player();

    player.on_surface_cleanup();

    assert_eq!(player.phase(), BindingPhase::PendingSurface);
    let errors = fixture.callbacks.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("error VideoError: Illegal transition"));
}

#[test]
fn test_available_without_surface_is_reported() {
    let fixture = Fixture::new();
    let mut binding = fixture.binding();

    assert!(matches!(
        binding.on_surface_available(),
        Err(PlaybackError::SurfaceUnavailable(_))
    ));
    assert_eq!(binding.phase(), BindingPhase::PendingSurface);
}

#[test]
fn test_failed_resume_keeps_snapshot_and_retries() {
    let fixture = Fixture::new();
    fixture.provider.create_surface(1920, 1080).unwrap();
    let player = fixture.player();
    player.seek_to(Duration::from_secs(90)).unwrap();
    fixture.provider.destroy_surface().unwrap();

    fixture.registry.fail_next.store(true, Ordering::SeqCst);
    fixture.provider.create_surface(1920, 1080).unwrap();

    assert_eq!(player.phase(), BindingPhase::Suspended);
    assert_eq!(player.position().unwrap(), Duration::from_secs(90));
    let errors = fixture.callbacks.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("hardware decoder unavailable"));

    // The host retries by signalling availability again.
    player.on_surface_available();

    assert_eq!(player.phase(), BindingPhase::Attached);
    assert_eq!(fixture.registry.count(), 2);
    assert_eq!(
        fixture.registry.engine(1).lock().state.position,
        Duration::from_secs(90)
    );
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn test_initialized_is_reported_once_across_engines() {
    let fixture = Fixture::new();
    fixture.provider.create_surface(1920, 1080).unwrap();
    let _player = fixture.player();

    let ready = EngineEvent::Ready {
        video_size: VideoSize::new(1920, 1080).with_rotation(270),
        duration: Duration::from_secs(600),
    };
    fixture.registry.emit(0, ready.clone());
    fixture.provider.resize(1920, 1080).unwrap();
    fixture.registry.emit(1, ready);

    let initialized: Vec<_> = fixture
        .callbacks
        .events()
        .into_iter()
        .filter(|event| event.starts_with("initialized"))
        .collect();
    assert_eq!(initialized, vec!["initialized 1080x1920 600s rot=270"]);
}

#[test]
fn test_engine_error_is_forwarded() {
    let fixture = Fixture::new();
    let _player = fixture.player();

    fixture
        .registry
        .emit(0, EngineEvent::Error("source error".to_string()));

    assert_eq!(
        fixture.callbacks.errors(),
        vec!["error VideoError: Video player had error source error"]
    );
}

#[test]
fn test_create_event_listener_after_dispose_fails() {
    let fixture = Fixture::new();
    let player = fixture.player();
    assert!(player.create_event_listener().is_ok());

    player.release().unwrap();

    assert!(matches!(
        player.create_event_listener(),
        Err(PlaybackError::Disposed)
    ));
}

// ============================================================================
// Disposal
// ============================================================================

#[test]
fn test_dispose_releases_engine_and_provider() {
    let fixture = Fixture::new();
    fixture.provider.create_surface(1920, 1080).unwrap();
    let player = fixture.player();

    player.dispose().unwrap();

    assert_eq!(player.phase(), BindingPhase::Disposed);
    assert!(fixture.registry.engine(0).lock().released);
    assert!(fixture.provider.is_released());
    assert!(!fixture.provider.has_callback());
    assert!(matches!(player.dispose(), Err(PlaybackError::Disposed)));
    assert!(matches!(player.play(), Err(PlaybackError::Disposed)));
}

#[test]
fn test_dispose_while_suspended_releases_provider_only() {
    let fixture = Fixture::new();
    fixture.provider.create_surface(1920, 1080).unwrap();
    let player = fixture.player();
    fixture.provider.destroy_surface().unwrap();

    player.dispose().unwrap();

    assert_eq!(fixture.registry.count(), 1);
    assert!(fixture.provider.is_released());
    assert!(matches!(player.position(), Err(PlaybackError::Disposed)));
}

#[test]
fn test_dropping_player_disposes() {
    let fixture = Fixture::new();
    fixture.provider.create_surface(1920, 1080).unwrap();
    let player = fixture.player();

    drop(player);

    assert!(fixture.registry.engine(0).lock().released);
    assert!(fixture.provider.is_released());
}

#[test]
fn test_binding_debug_redacts_media_uri() {
    let fixture = Fixture::new();
    let binding = fixture.binding();

    let rendered = format!("{binding:?}");

    assert!(rendered.contains("movie.mpd"));
    assert!(!rendered.contains("sig=abc"));
}
