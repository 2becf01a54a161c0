use super::{PlaybackAdapter, PlaybackSnapshot};
use log::{debug, trace};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Samples the adapter on a fixed interval while it is `Ready`.
///
/// The sampling task ends on its own as soon as the adapter leaves `Ready`,
/// and `stop` (or drop) aborts it outright.
pub struct PlaybackPoller {
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl PlaybackPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            task: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn start(
        &mut self,
        runtime: &Handle,
        adapter: Arc<PlaybackAdapter>,
        snapshot: Arc<watch::Sender<PlaybackSnapshot>>,
    ) {
        self.stop();
        let period = self.interval;
        self.task = Some(runtime.spawn(poll_loop(adapter, snapshot, period)));
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Playback poller stopped");
        }
    }
}

impl Drop for PlaybackPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(
    adapter: Arc<PlaybackAdapter>,
    snapshot: Arc<watch::Sender<PlaybackSnapshot>>,
    period: Duration,
) {
    let mut state = adapter.subscribe();
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if !state.borrow_and_update().is_ready() {
            break;
        }

        tokio::select! {
            _ = ticker.tick() => {
                match adapter.sample() {
                    Ok(sample) => {
                        snapshot.send_replace(sample);
                    }
                    // Keep the previous snapshot for this tick
                    Err(err) => trace!("Skipped playback sample: {}", err),
                }
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    debug!("Playback poller exited: adapter no longer ready");
}
