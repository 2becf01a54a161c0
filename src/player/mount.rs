use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

pub type InstanceId = u64;

/// A player instance currently rendered into a mount point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub instance: InstanceId,
    /// Video the instance was created for
    pub video_id: String,
}

/// Host container identified by a stable id. Player instances attach
/// themselves on construction; the adapter clears it before replacing one.
#[derive(Debug)]
pub struct MountPoint {
    id: String,
    attached: Mutex<Vec<Attachment>>,
    next_instance: AtomicU64,
}

impl MountPoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attached: Mutex::new(Vec::new()),
            next_instance: AtomicU64::new(1),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attach(&self, video_id: &str) -> InstanceId {
        let instance = self.next_instance.fetch_add(1, Ordering::Relaxed);
        self.attached.lock().push(Attachment {
            instance,
            video_id: video_id.to_string(),
        });
        instance
    }

    /// Remove one instance. Returns false if it was already gone.
    pub fn detach(&self, instance: InstanceId) -> bool {
        let mut attached = self.attached.lock();
        let before = attached.len();
        attached.retain(|a| a.instance != instance);
        attached.len() != before
    }

    /// Empty the container, returning how many instances were removed
    pub fn clear(&self) -> usize {
        let mut attached = self.attached.lock();
        let removed = attached.len();
        attached.clear();
        removed
    }

    pub fn attached(&self) -> Vec<Attachment> {
        self.attached.lock().clone()
    }
}
