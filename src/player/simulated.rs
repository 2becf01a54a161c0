use super::{EmbedSdk, InstanceId, MountPoint, PlaybackClock, PlayerInstance, PlayerOptions};
use crate::error::PlayerError;
use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_DURATION_SECS: f64 = 3.0 * 3600.0;

#[derive(Default)]
struct SimControls {
    sdk_loads: AtomicUsize,
    constructions: AtomicUsize,
    time_reads: AtomicUsize,
    reads_failing: AtomicBool,
}

/// In-process stand-in for the web embed SDK.
///
/// Desktop hosts have no embed to talk to, so this drives instances from a
/// playback clock. Delays and failures are configurable, which also makes it
/// the fake backend for tests.
pub struct SimulatedSdk {
    load_delay: Duration,
    create_delay: Duration,
    sdk_failure: Option<String>,
    failing_videos: HashSet<String>,
    durations: HashMap<String, f64>,
    default_duration: f64,
    controls: Arc<SimControls>,
}

impl SimulatedSdk {
    pub fn new() -> Self {
        Self {
            load_delay: Duration::from_millis(200),
            create_delay: Duration::from_millis(300),
            sdk_failure: None,
            failing_videos: HashSet::new(),
            durations: HashMap::new(),
            default_duration: DEFAULT_DURATION_SECS,
            controls: Arc::new(SimControls::default()),
        }
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = delay;
        self
    }

    pub fn with_duration(mut self, video_id: &str, seconds: f64) -> Self {
        self.durations.insert(video_id.to_string(), seconds);
        self
    }

    pub fn with_default_duration(mut self, seconds: f64) -> Self {
        self.default_duration = seconds;
        self
    }

    /// Make every SDK load fail with `message`
    pub fn failing_sdk(mut self, message: &str) -> Self {
        self.sdk_failure = Some(message.to_string());
        self
    }

    /// Make construction fail for one video
    pub fn failing_video(mut self, video_id: &str) -> Self {
        self.failing_videos.insert(video_id.to_string());
        self
    }

    pub fn sdk_loads(&self) -> usize {
        self.controls.sdk_loads.load(Ordering::SeqCst)
    }

    pub fn constructions(&self) -> usize {
        self.controls.constructions.load(Ordering::SeqCst)
    }

    /// Number of successful `current_time` reads across all instances
    pub fn time_reads(&self) -> usize {
        self.controls.time_reads.load(Ordering::SeqCst)
    }

    /// Simulate instances that are nominally ready but not answering reads
    pub fn set_reads_failing(&self, failing: bool) {
        self.controls.reads_failing.store(failing, Ordering::SeqCst);
    }
}

impl Default for SimulatedSdk {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbedSdk for SimulatedSdk {
    async fn load(&self) -> Result<(), PlayerError> {
        self.controls.sdk_loads.fetch_add(1, Ordering::SeqCst);
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }
        match &self.sdk_failure {
            Some(message) => Err(PlayerError::SdkLoad(message.clone())),
            None => Ok(()),
        }
    }

    async fn create_player(
        &self,
        mount: &MountPoint,
        options: PlayerOptions,
    ) -> Result<Box<dyn PlayerInstance>, PlayerError> {
        self.controls.constructions.fetch_add(1, Ordering::SeqCst);
        if !self.create_delay.is_zero() {
            tokio::time::sleep(self.create_delay).await;
        }
        if self.failing_videos.contains(&options.video_id) {
            return Err(PlayerError::Construction(format!(
                "video {} is unavailable",
                options.video_id
            )));
        }

        let duration = self
            .durations
            .get(&options.video_id)
            .copied()
            .unwrap_or(self.default_duration);
        let instance_id = mount.attach(&options.video_id);
        debug!(
            "Simulated player #{} for {} at t={}",
            instance_id,
            options.video_id,
            options.time_param()
        );
        let player = SimulatedPlayer::new(instance_id, duration, Arc::clone(&self.controls));
        player.seek(options.start_seconds);
        if options.autoplay {
            player.play();
        }
        Ok(Box::new(player))
    }
}

/// Clock-driven player instance created by [`SimulatedSdk`]
pub struct SimulatedPlayer {
    instance_id: InstanceId,
    clock: Mutex<PlaybackClock>,
    muted: AtomicBool,
    controls: Arc<SimControls>,
}

impl SimulatedPlayer {
    fn new(instance_id: InstanceId, duration: f64, controls: Arc<SimControls>) -> Self {
        Self {
            instance_id,
            clock: Mutex::new(PlaybackClock::new(duration)),
            muted: AtomicBool::new(false),
            controls,
        }
    }

    fn check_reads(&self) -> Result<(), PlayerError> {
        if self.controls.reads_failing.load(Ordering::SeqCst) {
            return Err(PlayerError::Read("player not initialized".to_string()));
        }
        Ok(())
    }
}

impl PlayerInstance for SimulatedPlayer {
    fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    fn play(&self) {
        self.clock.lock().play();
    }

    fn pause(&self) {
        self.clock.lock().pause();
    }

    fn seek(&self, seconds: f64) {
        self.clock.lock().seek(seconds);
    }

    fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }

    fn current_time(&self) -> Result<f64, PlayerError> {
        self.check_reads()?;
        self.controls.time_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.clock.lock().position())
    }

    fn duration(&self) -> Result<f64, PlayerError> {
        self.check_reads()?;
        Ok(self.clock.lock().duration())
    }

    fn is_paused(&self) -> Result<bool, PlayerError> {
        self.check_reads()?;
        Ok(self.clock.lock().is_paused())
    }

    fn is_muted(&self) -> Result<bool, PlayerError> {
        self.check_reads()?;
        Ok(self.muted.load(Ordering::SeqCst))
    }
}
