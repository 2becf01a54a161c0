use super::{InstanceId, MountPoint};
use crate::error::PlayerError;
use crate::utils::format_twitch_timestamp;
use async_trait::async_trait;

/// Construction parameters handed to the embed SDK
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOptions {
    pub video_id: String,
    pub start_seconds: f64,
    pub autoplay: bool,
}

impl PlayerOptions {
    /// Start position in the embed's "1h2m3s" form
    pub fn time_param(&self) -> String {
        format_twitch_timestamp(self.start_seconds)
    }
}

/// The third-party embed SDK.
///
/// `load` fetches and initializes the SDK itself; the adapter guarantees it is
/// never invoked concurrently. `create_player` builds an instance inside the
/// mount point and resolves once that instance is ready to accept commands.
#[async_trait]
pub trait EmbedSdk: Send + Sync + 'static {
    async fn load(&self) -> Result<(), PlayerError>;

    async fn create_player(
        &self,
        mount: &MountPoint,
        options: PlayerOptions,
    ) -> Result<Box<dyn PlayerInstance>, PlayerError>;
}

/// Imperative control surface of one embedded player.
///
/// The embed publishes no change events for time, pause or mute, so reads are
/// polled. Reads may fail while the instance is still settling.
pub trait PlayerInstance: Send + Sync {
    fn instance_id(&self) -> InstanceId;

    fn play(&self);
    fn pause(&self);
    fn seek(&self, seconds: f64);
    fn set_muted(&self, muted: bool);

    fn current_time(&self) -> Result<f64, PlayerError>;
    fn duration(&self) -> Result<f64, PlayerError>;
    fn is_paused(&self) -> Result<bool, PlayerError>;
    fn is_muted(&self) -> Result<bool, PlayerError>;
}
