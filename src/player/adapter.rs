use super::{EmbedSdk, MountPoint, PlaybackSnapshot, PlayerInstance, PlayerOptions, SdkLoader};
use crate::error::PlayerError;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

/// Lifecycle of the player bound to one mount point.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AdapterState {
    /// Nothing loaded yet
    #[default]
    Empty,

    /// SDK or instance construction in progress for `video_id`
    Loading { video_id: String },

    /// Instance constructed and accepting commands
    Ready { video_id: String },

    /// The most recent load failed; no instance is kept
    Error { video_id: String, message: String },

    /// Torn down; no further loads are accepted
    Destroyed,
}

impl AdapterState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn video_id(&self) -> Option<&str> {
        match self {
            Self::Loading { video_id } | Self::Ready { video_id } | Self::Error { video_id, .. } => {
                Some(video_id)
            }
            Self::Empty | Self::Destroyed => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// How a `load` call ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Ready,
    /// A newer load started before this one finished; its result was discarded
    Superseded,
}

struct AdapterInner {
    /// Token of the most recent load request
    request: u64,
    instance: Option<Arc<dyn PlayerInstance>>,
    destroyed: bool,
}

/// Uniform control surface over the embed SDK for one mount point.
///
/// Owns at most one player instance. Each `load` takes a fresh request token;
/// only the newest request may commit its instance, so rapid video switches
/// resolve to the last one asked for.
pub struct PlaybackAdapter {
    sdk: Arc<dyn EmbedSdk>,
    loader: SdkLoader,
    mount: Arc<MountPoint>,
    autoplay: bool,
    inner: Mutex<AdapterInner>,
    state: watch::Sender<AdapterState>,
}

impl PlaybackAdapter {
    pub fn new(sdk: Arc<dyn EmbedSdk>, mount: Arc<MountPoint>) -> Self {
        let (state, _) = watch::channel(AdapterState::Empty);
        Self {
            loader: SdkLoader::new(Arc::clone(&sdk)),
            sdk,
            mount,
            autoplay: true,
            inner: Mutex::new(AdapterInner {
                request: 0,
                instance: None,
                destroyed: false,
            }),
            state,
        }
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn mount(&self) -> &Arc<MountPoint> {
        &self.mount
    }

    pub fn state(&self) -> AdapterState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AdapterState> {
        self.state.subscribe()
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().is_ready()
    }

    /// Load `video_id` starting at `start_seconds`, replacing any current instance.
    pub async fn load(&self, video_id: &str, start_seconds: f64) -> Result<LoadOutcome, PlayerError> {
        let request = {
            let mut inner = self.inner.lock();
            if inner.destroyed {
                return Err(PlayerError::Destroyed);
            }
            inner.request += 1;
            self.state.send_replace(AdapterState::Loading {
                video_id: video_id.to_string(),
            });
            inner.request
        };
        debug!("Load #{} requested: {} at {:.1}s", request, video_id, start_seconds);

        let options = PlayerOptions {
            video_id: video_id.to_string(),
            start_seconds: start_seconds.max(0.0),
            autoplay: self.autoplay,
        };

        match self.construct(request, options).await {
            Ok(Some(instance)) => Ok(self.commit(request, video_id, instance)),
            Ok(None) => {
                debug!("Load #{} superseded before construction", request);
                Ok(LoadOutcome::Superseded)
            }
            Err(err) => self.fail(request, video_id, err),
        }
    }

    async fn construct(
        &self,
        request: u64,
        options: PlayerOptions,
    ) -> Result<Option<Box<dyn PlayerInstance>>, PlayerError> {
        self.loader.ensure_loaded().await?;
        if !self.is_current(request) {
            return Ok(None);
        }

        self.teardown_instance();
        let instance = self.sdk.create_player(&self.mount, options).await?;
        Ok(Some(instance))
    }

    fn commit(&self, request: u64, video_id: &str, instance: Box<dyn PlayerInstance>) -> LoadOutcome {
        let mut inner = self.inner.lock();
        if inner.destroyed || inner.request != request {
            debug!("Load #{} superseded, discarding instance", request);
            self.mount.detach(instance.instance_id());
            return LoadOutcome::Superseded;
        }

        inner.instance = Some(Arc::from(instance));
        self.state.send_replace(AdapterState::Ready {
            video_id: video_id.to_string(),
        });
        info!("Player ready: {}", video_id);
        LoadOutcome::Ready
    }

    fn fail(&self, request: u64, video_id: &str, err: PlayerError) -> Result<LoadOutcome, PlayerError> {
        let mut inner = self.inner.lock();
        if inner.destroyed || inner.request != request {
            debug!("Load #{} failed after being superseded: {}", request, err);
            return Ok(LoadOutcome::Superseded);
        }

        inner.instance = None;
        self.mount.clear();
        warn!("Player failed for {}: {}", video_id, err);
        self.state.send_replace(AdapterState::Error {
            video_id: video_id.to_string(),
            message: err.to_string(),
        });
        Err(err)
    }

    fn is_current(&self, request: u64) -> bool {
        let inner = self.inner.lock();
        !inner.destroyed && inner.request == request
    }

    fn teardown_instance(&self) {
        let previous = self.inner.lock().instance.take();
        let removed = self.mount.clear();
        if previous.is_some() || removed > 0 {
            debug!("Cleared mount {} ({} instance(s))", self.mount.id(), removed);
        }
    }

    fn ready_instance(&self) -> Result<Arc<dyn PlayerInstance>, PlayerError> {
        let inner = self.inner.lock();
        if inner.destroyed {
            return Err(PlayerError::Destroyed);
        }
        if !self.state.borrow().is_ready() {
            return Err(PlayerError::NotReady);
        }
        inner.instance.clone().ok_or(PlayerError::NotReady)
    }

    pub fn play(&self) -> Result<(), PlayerError> {
        self.ready_instance()?.play();
        Ok(())
    }

    pub fn pause(&self) -> Result<(), PlayerError> {
        self.ready_instance()?.pause();
        Ok(())
    }

    pub fn seek(&self, seconds: f64) -> Result<(), PlayerError> {
        self.ready_instance()?.seek(seconds.max(0.0));
        Ok(())
    }

    /// Jump within the current video without reconstructing the player
    pub fn seek_and_play(&self, seconds: f64) -> Result<(), PlayerError> {
        let instance = self.ready_instance()?;
        instance.seek(seconds.max(0.0));
        instance.play();
        Ok(())
    }

    pub fn set_muted(&self, muted: bool) -> Result<(), PlayerError> {
        self.ready_instance()?.set_muted(muted);
        Ok(())
    }

    pub fn current_time(&self) -> Result<f64, PlayerError> {
        self.ready_instance()?.current_time()
    }

    pub fn duration(&self) -> Result<f64, PlayerError> {
        self.ready_instance()?.duration()
    }

    pub fn is_paused(&self) -> Result<bool, PlayerError> {
        self.ready_instance()?.is_paused()
    }

    pub fn is_muted(&self) -> Result<bool, PlayerError> {
        self.ready_instance()?.is_muted()
    }

    /// Read all polled properties at once. Any failed read fails the sample.
    pub fn sample(&self) -> Result<PlaybackSnapshot, PlayerError> {
        let instance = self.ready_instance()?;
        Ok(PlaybackSnapshot {
            current_time_seconds: instance.current_time()?,
            duration_seconds: instance.duration()?,
            is_paused: instance.is_paused()?,
            is_muted: instance.is_muted()?,
        })
    }

    /// Tear down the instance and refuse further loads
    pub fn destroy(&self) {
        let mut inner = self.inner.lock();
        if inner.destroyed {
            return;
        }
        inner.destroyed = true;
        inner.request += 1;
        inner.instance = None;
        self.mount.clear();
        self.state.send_replace(AdapterState::Destroyed);
        debug!("Adapter for mount {} destroyed", self.mount.id());
    }
}
