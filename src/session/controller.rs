use super::{ChapterRange, Marker, MarkerSet};
use crate::catalog::{VideoCatalog, VideoInfo};
use crate::config::SessionConfig;
use crate::error::PlayerError;
use crate::player::{
    AdapterState, EmbedSdk, LoadOutcome, MountPoint, PlaybackAdapter, PlaybackPoller,
    PlaybackSnapshot,
};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Descriptive information shown next to the player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMeta {
    pub title: String,
    pub owner_name: String,
    #[serde(default)]
    pub owner_avatar_url: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
}

impl VideoMeta {
    /// Uppercased first letter of the owner name, shown when no avatar loads
    pub fn owner_initial(&self) -> Option<char> {
        self.owner_name
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
    }
}

/// The single active (video, offset) pair and whether it is shown
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSession {
    pub video_id: Option<String>,
    /// Last requested seek target
    pub offset_seconds: Option<f64>,
    pub meta: Option<VideoMeta>,
    pub visible: bool,
}

struct SessionState {
    session: PlaybackSession,
    markers: Arc<MarkerSet>,
    chapters: Arc<Vec<ChapterRange>>,
    /// Duration reported by the metadata service
    video_duration: Option<f64>,
    /// Video whose markers are fetched or being fetched
    markers_key: Option<String>,
    /// Token of the most recent marker fetch
    fetch: u64,
}

struct SessionInner {
    adapter: Arc<PlaybackAdapter>,
    catalog: RwLock<Arc<dyn VideoCatalog>>,
    runtime: Handle,
    config: SessionConfig,
    state: Mutex<SessionState>,
    snapshot: Arc<watch::Sender<PlaybackSnapshot>>,
    poller: Mutex<PlaybackPoller>,
}

/// Single source of truth for what video, offset and markers are active.
///
/// Cheap to clone; every clone drives the same session. Loads and fetches
/// run on the runtime handle and only commit if they still belong to the
/// current video.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<SessionInner>,
}

impl SessionController {
    pub fn new(
        sdk: Arc<dyn EmbedSdk>,
        catalog: Arc<dyn VideoCatalog>,
        config: SessionConfig,
        runtime: Handle,
    ) -> Self {
        let mount = Arc::new(MountPoint::new(config.mount_id.clone()));
        let adapter = PlaybackAdapter::new(sdk, mount).with_autoplay(config.autoplay);
        let (snapshot, _) = watch::channel(PlaybackSnapshot::default());
        let poller = PlaybackPoller::new(config.poll_interval());

        Self {
            inner: Arc::new(SessionInner {
                adapter: Arc::new(adapter),
                catalog: RwLock::new(catalog),
                runtime,
                config,
                state: Mutex::new(SessionState {
                    session: PlaybackSession::default(),
                    markers: Arc::new(MarkerSet::default()),
                    chapters: Arc::new(Vec::new()),
                    video_duration: None,
                    markers_key: None,
                    fetch: 0,
                }),
                snapshot: Arc::new(snapshot),
                poller: Mutex::new(poller),
            }),
        }
    }

    /// Show `video_id` at `offset_seconds`.
    ///
    /// A new video reconstructs the player and refetches markers; the same
    /// video only seeks. Passing no `meta` keeps the current one for the same
    /// video and clears it otherwise.
    pub fn activate(&self, video_id: &str, offset_seconds: f64, meta: Option<VideoMeta>) {
        let offset = if offset_seconds.is_finite() {
            offset_seconds.max(0.0)
        } else {
            0.0
        };
        let mut state = self.inner.state.lock();
        let same_video = state.session.video_id.as_deref() == Some(video_id);

        state.session.visible = true;
        state.session.offset_seconds = Some(offset);
        if meta.is_some() || !same_video {
            state.session.meta = meta;
        }

        if same_video {
            self.reactivate(&state, video_id, offset);
        } else {
            info!("Activating video {} at {:.1}s", video_id, offset);
            self.inner.poller.lock().stop();
            state.session.video_id = Some(video_id.to_string());
            state.markers = Arc::new(MarkerSet::default());
            state.chapters = Arc::new(Vec::new());
            state.video_duration = None;
            let muted = self.inner.snapshot.borrow().is_muted;
            self.inner.snapshot.send_replace(PlaybackSnapshot {
                current_time_seconds: offset,
                is_muted: muted,
                ..Default::default()
            });
            self.spawn_load(video_id, offset);
        }

        if state.markers_key.as_deref() != Some(video_id) {
            self.spawn_fetch(&mut state, video_id);
        }
    }

    fn reactivate(&self, state: &SessionState, video_id: &str, offset: f64) {
        match self.inner.adapter.state() {
            AdapterState::Ready { video_id: loaded } if loaded == video_id => {
                debug!("Seeking {} to {:.1}s without reload", video_id, offset);
                if let Err(err) = self.inner.adapter.seek_and_play(offset) {
                    warn!("Seek on reactivation failed: {}", err);
                }
                self.inner.snapshot.send_modify(|s| {
                    s.current_time_seconds = offset;
                    s.is_paused = false;
                });
                self.inner.start_poller(state, video_id);
            }
            // The pending load picks up the new offset once ready
            AdapterState::Loading { video_id: loading } if loading == video_id => {}
            _ => self.spawn_load(video_id, offset),
        }
    }

    /// Stop rendering and polling; the player instance is kept
    pub fn hide(&self) {
        let mut state = self.inner.state.lock();
        if state.session.visible {
            debug!("Session hidden");
        }
        state.session.visible = false;
        self.inner.poller.lock().stop();
    }

    pub fn seek(&self, seconds: f64) -> Result<(), PlayerError> {
        self.ensure_ready()?;
        let seconds = seconds.max(0.0);
        self.inner.adapter.seek(seconds)?;
        self.inner.state.lock().session.offset_seconds = Some(seconds);
        self.inner
            .snapshot
            .send_modify(|s| s.current_time_seconds = seconds);
        Ok(())
    }

    /// Invert the paused flag of the latest snapshot
    pub fn toggle_play(&self) -> Result<(), PlayerError> {
        self.ensure_ready()?;
        let paused = self.inner.snapshot.borrow().is_paused;
        if paused {
            self.inner.adapter.play()?;
        } else {
            self.inner.adapter.pause()?;
        }
        self.inner.snapshot.send_modify(|s| s.is_paused = !paused);
        Ok(())
    }

    /// Invert the muted flag of the latest snapshot
    pub fn toggle_mute(&self) -> Result<(), PlayerError> {
        self.ensure_ready()?;
        let muted = self.inner.snapshot.borrow().is_muted;
        self.inner.adapter.set_muted(!muted)?;
        self.inner.snapshot.send_modify(|s| s.is_muted = !muted);
        Ok(())
    }

    /// Seek to the next marker past the tolerance window; returns its offset
    pub fn next_marker(&self) -> Result<Option<f64>, PlayerError> {
        let markers = self.markers();
        let target = markers
            .next(self.current_time(), self.tolerance())
            .map(|m| m.offset_seconds);
        self.seek_to(target)
    }

    /// Seek to the previous marker before the tolerance window; returns its offset
    pub fn prev_marker(&self) -> Result<Option<f64>, PlayerError> {
        let markers = self.markers();
        let target = markers
            .prev(self.current_time(), self.tolerance())
            .map(|m| m.offset_seconds);
        self.seek_to(target)
    }

    /// Commands only reach a player bound to the active video
    fn ensure_ready(&self) -> Result<(), PlayerError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(PlayerError::NotReady)
        }
    }

    fn seek_to(&self, target: Option<f64>) -> Result<Option<f64>, PlayerError> {
        match target {
            Some(offset) => {
                self.seek(offset)?;
                Ok(Some(offset))
            }
            None => Ok(None),
        }
    }

    /// Swap the marker/metadata source; the current video is refetched
    pub fn set_catalog(&self, catalog: Arc<dyn VideoCatalog>) {
        *self.inner.catalog.write() = catalog;
        let mut state = self.inner.state.lock();
        state.markers_key = None;
        if let Some(video_id) = state.session.video_id.clone() {
            self.spawn_fetch(&mut state, &video_id);
        }
    }

    /// Full app teardown: stop polling and destroy the player
    pub fn teardown(&self) {
        let mut state = self.inner.state.lock();
        state.session.visible = false;
        self.inner.poller.lock().stop();
        self.inner.adapter.destroy();
        info!("Session torn down");
    }

    pub fn session(&self) -> PlaybackSession {
        self.inner.state.lock().session.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.inner.state.lock().session.visible
    }

    /// Ready for the active video
    pub fn is_ready(&self) -> bool {
        let active = self.inner.state.lock().session.video_id.clone();
        match self.inner.adapter.state() {
            AdapterState::Ready { video_id } => active.as_deref() == Some(video_id.as_str()),
            _ => false,
        }
    }

    /// Display text of the last load failure for the active video
    pub fn error(&self) -> Option<String> {
        let active = self.inner.state.lock().session.video_id.clone();
        match self.inner.adapter.state() {
            AdapterState::Error { video_id, message } if active.as_deref() == Some(video_id.as_str()) => {
                Some(message)
            }
            _ => None,
        }
    }

    pub fn adapter_state(&self) -> AdapterState {
        self.inner.adapter.state()
    }

    pub fn adapter(&self) -> &Arc<PlaybackAdapter> {
        &self.inner.adapter
    }

    pub fn mount_id(&self) -> &str {
        self.inner.adapter.mount().id()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        *self.inner.snapshot.borrow()
    }

    pub fn subscribe_snapshot(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.inner.snapshot.subscribe()
    }

    pub fn is_polling(&self) -> bool {
        self.inner.poller.lock().is_running()
    }

    pub fn markers(&self) -> Arc<MarkerSet> {
        Arc::clone(&self.inner.state.lock().markers)
    }

    pub fn chapters(&self) -> Arc<Vec<ChapterRange>> {
        Arc::clone(&self.inner.state.lock().chapters)
    }

    /// Player-reported duration, falling back to the metadata service
    pub fn duration(&self) -> f64 {
        let polled = self.inner.snapshot.borrow().duration_seconds;
        if polled > 0.0 {
            return polled;
        }
        self.inner.state.lock().video_duration.unwrap_or(0.0)
    }

    pub fn current_time(&self) -> f64 {
        self.inner.snapshot.borrow().current_time_seconds
    }

    /// Most recently passed marker
    pub fn current_marker(&self) -> Option<Marker> {
        self.markers().current(self.current_time()).cloned()
    }

    pub fn is_at_first_marker(&self) -> bool {
        self.markers()
            .is_at_first(self.current_time(), self.tolerance())
    }

    pub fn is_at_last_marker(&self) -> bool {
        self.markers()
            .is_at_last(self.current_time(), self.tolerance())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    fn tolerance(&self) -> f64 {
        self.inner.config.boundary_tolerance_secs
    }

    fn spawn_load(&self, video_id: &str, offset: f64) {
        let inner = Arc::clone(&self.inner);
        let video_id = video_id.to_string();
        self.inner.runtime.spawn(async move {
            match inner.adapter.load(&video_id, offset).await {
                Ok(LoadOutcome::Ready) => inner.on_ready(&video_id, offset),
                Ok(LoadOutcome::Superseded) => {}
                Err(err) => debug!("Load of {} failed: {}", video_id, err),
            }
        });
    }

    fn spawn_fetch(&self, state: &mut SessionState, video_id: &str) {
        state.fetch += 1;
        state.markers_key = Some(video_id.to_string());
        let token = state.fetch;
        let catalog = Arc::clone(&*self.inner.catalog.read());
        let inner = Arc::clone(&self.inner);
        let video_id = video_id.to_string();

        self.inner.runtime.spawn(async move {
            let (markers, info) =
                tokio::join!(catalog.markers(&video_id), catalog.video_info(&video_id));
            let markers = markers.unwrap_or_else(|err| {
                warn!("Marker fetch for {} failed: {}", video_id, err);
                Vec::new()
            });
            let info = info.unwrap_or_else(|err| {
                warn!("Video info fetch for {} failed: {}", video_id, err);
                VideoInfo::default()
            });

            let mut state = inner.state.lock();
            if state.fetch != token {
                debug!("Discarding stale markers for {}", video_id);
                return;
            }
            debug!(
                "Markers for {}: {} ghost(s), {} chapter(s)",
                video_id,
                markers.len(),
                info.chapter_ranges.len()
            );
            state.markers = Arc::new(MarkerSet::new(markers));
            state.chapters = Arc::new(info.chapter_ranges);
            state.video_duration = Some(info.duration_seconds).filter(|d| *d > 0.0);
        });
    }
}

impl SessionInner {
    fn on_ready(&self, video_id: &str, loaded_offset: f64) {
        let state = self.state.lock();
        if state.session.video_id.as_deref() != Some(video_id) {
            return;
        }
        // Offset changed while the player was still loading
        if let Some(offset) = state.session.offset_seconds {
            if (offset - loaded_offset).abs() > f64::EPSILON {
                if let Err(err) = self.adapter.seek(offset) {
                    warn!("Deferred seek failed: {}", err);
                }
            }
        }
        self.start_poller(&state, video_id);
    }

    fn start_poller(&self, state: &SessionState, video_id: &str) {
        if !state.session.visible || state.session.video_id.as_deref() != Some(video_id) {
            return;
        }
        let mut poller = self.poller.lock();
        if !poller.is_running() {
            poller.start(
                &self.runtime,
                Arc::clone(&self.adapter),
                Arc::clone(&self.snapshot),
            );
            debug!("Polling {} every {:?}", video_id, poller.interval());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SearchMatch, SearchQuery};
    use crate::error::CatalogError;
    use crate::player::SimulatedSdk;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct FakeCatalog {
        markers: HashMap<String, Vec<f64>>,
        delays: HashMap<String, Duration>,
        failing: bool,
        marker_calls: AtomicUsize,
    }

    impl FakeCatalog {
        fn with_video(mut self, video_id: &str, offsets: &[f64]) -> Self {
            self.markers.insert(video_id.to_string(), offsets.to_vec());
            self
        }

        fn with_delay(mut self, video_id: &str, delay: Duration) -> Self {
            self.delays.insert(video_id.to_string(), delay);
            self
        }

        fn failing(mut self) -> Self {
            self.failing = true;
            self
        }

        fn marker_calls(&self) -> usize {
            self.marker_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VideoCatalog for FakeCatalog {
        async fn markers(&self, video_id: &str) -> Result<Vec<Marker>, CatalogError> {
            self.marker_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(video_id) {
                tokio::time::sleep(*delay).await;
            }
            if self.failing {
                return Err(CatalogError::UnknownVideo(video_id.to_string()));
            }
            Ok(self
                .markers
                .get(video_id)
                .map(|offsets| {
                    offsets
                        .iter()
                        .enumerate()
                        .map(|(i, o)| Marker::new(format!("{}-{}", video_id, i), format!("ghost{}", i), *o))
                        .collect()
                })
                .unwrap_or_default())
        }

        async fn video_info(&self, video_id: &str) -> Result<VideoInfo, CatalogError> {
            if self.failing {
                return Err(CatalogError::UnknownVideo(video_id.to_string()));
            }
            Ok(VideoInfo {
                duration_seconds: 100.0,
                chapter_ranges: vec![ChapterRange {
                    start_seconds: 20.0,
                    end_seconds: 40.0,
                }],
            })
        }

        async fn search(&self, _query: &SearchQuery) -> Result<Vec<SearchMatch>, CatalogError> {
            Ok(Vec::new())
        }
    }

    fn controller(sdk: SimulatedSdk, catalog: FakeCatalog) -> (Arc<SimulatedSdk>, Arc<FakeCatalog>, SessionController) {
        let sdk = Arc::new(sdk);
        let catalog = Arc::new(catalog);
        let controller = SessionController::new(
            sdk.clone(),
            catalog.clone(),
            SessionConfig::default(),
            Handle::current(),
        );
        (sdk, catalog, controller)
    }

    fn meta(title: &str) -> VideoMeta {
        VideoMeta {
            title: title.to_string(),
            owner_name: "owner".to_string(),
            ..Default::default()
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1250)).await;
    }

    #[test]
    fn test_owner_initial() {
        let mut meta = meta("Run");
        meta.owner_name = "  rey".to_string();
        assert_eq!(meta.owner_initial(), Some('R'));
        meta.owner_name = String::new();
        assert_eq!(meta.owner_initial(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activate_loads_player_and_markers() {
        let (sdk, _, session) = controller(
            SimulatedSdk::new().with_duration("v1", 100.0),
            FakeCatalog::default().with_video("v1", &[90.0, 10.0, 50.0]),
        );
        session.activate("v1", 10.0, Some(meta("Run")));
        assert!(session.is_visible());
        assert!(!session.is_ready());

        settle().await;
        assert!(session.is_ready());
        assert!(session.is_polling());
        assert_eq!(session.error(), None);
        assert_eq!(sdk.constructions(), 1);

        let offsets: Vec<f64> = session.markers().iter().map(|m| m.offset_seconds).collect();
        assert_eq!(offsets, vec![10.0, 50.0, 90.0]);
        assert_eq!(session.chapters().len(), 1);
        assert_eq!(session.duration(), 100.0);
        assert_eq!(session.session().meta, Some(meta("Run")));
        assert_eq!(session.current_marker().map(|m| m.offset_seconds), Some(10.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_video_only_seeks() {
        let (sdk, catalog, session) = controller(
            SimulatedSdk::new(),
            FakeCatalog::default().with_video("v1", &[10.0, 50.0]),
        );
        session.activate("v1", 10.0, Some(meta("Run")));
        settle().await;

        session.activate("v1", 300.0, None);
        assert!((session.current_time() - 300.0).abs() < 0.01);
        settle().await;

        assert_eq!(sdk.constructions(), 1);
        assert_eq!(catalog.marker_calls(), 1);
        assert_eq!(session.session().meta, Some(meta("Run")));
        assert!((session.adapter().current_time().unwrap() - 301.25).abs() < 0.05);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_video_leaves_one_instance() {
        let (sdk, catalog, session) = controller(
            SimulatedSdk::new(),
            FakeCatalog::default()
                .with_video("v1", &[10.0])
                .with_video("v2", &[20.0, 30.0]),
        );
        session.activate("v1", 0.0, Some(meta("One")));
        settle().await;
        session.activate("v2", 5.0, None);
        assert!(session.markers().is_empty());
        assert_eq!(session.session().meta, None);
        settle().await;

        let attached = session.adapter().mount().attached();
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0].video_id, "v2");
        assert_eq!(sdk.constructions(), 2);
        assert_eq!(catalog.marker_calls(), 2);
        assert_eq!(session.markers().len(), 2);
        assert!(session.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_activation_resolves_to_last_call() {
        let (_, _, session) = controller(
            SimulatedSdk::new(),
            FakeCatalog::default()
                .with_video("v1", &[1.0, 2.0, 3.0])
                .with_video("v2", &[40.0])
                .with_delay("v1", Duration::from_millis(900)),
        );
        session.activate("v1", 0.0, None);
        tokio::time::sleep(Duration::from_millis(250)).await;
        session.activate("v2", 40.0, None);
        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert_eq!(
            session.adapter_state(),
            AdapterState::Ready {
                video_id: "v2".into()
            }
        );
        let attached = session.adapter().mount().attached();
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0].video_id, "v2");
        // The slower v1 fetch resolved last and was discarded
        assert_eq!(session.markers().len(), 1);
        assert_eq!(session.session().video_id.as_deref(), Some("v2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hide_stops_polling() {
        let (sdk, _, session) = controller(SimulatedSdk::new(), FakeCatalog::default());
        session.activate("v1", 0.0, None);
        settle().await;
        assert!(session.is_polling());

        session.hide();
        let reads = sdk.time_reads();
        let frozen = session.snapshot();
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert!(!session.is_visible());
        assert!(!session.is_polling());
        assert_eq!(sdk.time_reads(), reads);
        assert_eq!(session.snapshot(), frozen);
        // Player survives the hide
        assert!(session.is_ready());

        session.activate("v1", 60.0, None);
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(session.is_polling());
        assert!(sdk.time_reads() > reads);
        assert_eq!(sdk.constructions(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_degrades_to_empty() {
        let (_, _, session) = controller(SimulatedSdk::new(), FakeCatalog::default().failing());
        session.activate("v1", 0.0, None);
        settle().await;

        assert!(session.is_ready());
        assert!(session.markers().is_empty());
        assert!(session.chapters().is_empty());
        assert_eq!(session.error(), None);
        assert_eq!(session.next_marker(), Ok(None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sdk_failure_surfaces_error() {
        let (_, _, session) = controller(
            SimulatedSdk::new().failing_sdk("blocked"),
            FakeCatalog::default().with_video("v1", &[10.0]),
        );
        session.activate("v1", 0.0, None);
        settle().await;

        assert_eq!(
            session.error().as_deref(),
            Some("Failed to load player SDK: blocked")
        );
        assert!(!session.is_ready());
        assert_eq!(session.markers().len(), 1);
        assert_eq!(session.toggle_play(), Err(PlayerError::NotReady));
        assert_eq!(session.seek(5.0), Err(PlayerError::NotReady));
    }

    #[tokio::test(start_paused = true)]
    async fn test_commands_rejected_while_switching() {
        let (sdk, _, session) = controller(
            SimulatedSdk::new(),
            FakeCatalog::default()
                .with_video("v1", &[10.0])
                .with_video("v2", &[20.0]),
        );
        session.activate("v1", 0.0, None);
        settle().await;

        session.activate("v2", 5.0, None);
        assert!(!session.is_ready());
        assert_eq!(session.toggle_play(), Err(PlayerError::NotReady));
        assert_eq!(session.toggle_mute(), Err(PlayerError::NotReady));
        assert_eq!(session.seek(77.0), Err(PlayerError::NotReady));
        assert!(!session.snapshot().is_muted);
        assert!((session.snapshot().current_time_seconds - 5.0).abs() < 0.01);

        settle().await;
        assert!(session.is_ready());
        assert_eq!(sdk.constructions(), 2);
        assert_eq!(session.seek(77.0), Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggles_invert_snapshot() {
        let (_, _, session) = controller(SimulatedSdk::new(), FakeCatalog::default());
        session.activate("v1", 0.0, None);
        settle().await;
        assert!(!session.snapshot().is_paused);

        session.toggle_play().unwrap();
        assert!(session.snapshot().is_paused);
        assert!(session.adapter().is_paused().unwrap());

        session.toggle_mute().unwrap();
        assert!(session.snapshot().is_muted);
        assert!(session.adapter().is_muted().unwrap());

        session.toggle_play().unwrap();
        assert!(!session.adapter().is_paused().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_marker_navigation() {
        let (_, _, session) = controller(
            SimulatedSdk::new(),
            FakeCatalog::default().with_video("v1", &[10.0, 50.0, 90.0]),
        );
        session.activate("v1", 10.0, None);
        settle().await;
        assert!(session.is_at_first_marker());
        assert!(!session.is_at_last_marker());

        assert_eq!(session.next_marker(), Ok(Some(50.0)));
        assert_eq!(session.next_marker(), Ok(Some(90.0)));
        assert!(session.is_at_last_marker());
        // Clamped at the end
        assert_eq!(session.next_marker(), Ok(Some(90.0)));

        assert_eq!(session.prev_marker(), Ok(Some(50.0)));
        assert_eq!(session.prev_marker(), Ok(Some(10.0)));
        assert_eq!(session.prev_marker(), Ok(Some(10.0)));
        assert_eq!(session.current_marker().map(|m| m.offset_seconds), Some(10.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_destroys_player() {
        let (_, _, session) = controller(SimulatedSdk::new(), FakeCatalog::default());
        session.activate("v1", 0.0, None);
        settle().await;

        session.teardown();
        assert_eq!(session.adapter_state(), AdapterState::Destroyed);
        assert!(session.adapter().mount().attached().is_empty());
        assert!(!session.is_polling());
    }
}
