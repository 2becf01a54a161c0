use super::EmbedSdk;
use crate::error::PlayerError;
use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, warn};
use parking_lot::Mutex;
use std::sync::Arc;

type SharedLoad = Shared<BoxFuture<'static, Result<(), PlayerError>>>;

/// Loads the embed SDK at most once.
///
/// Concurrent callers await the same in-flight load and all observe its
/// outcome. A failed load is forgotten once it settles so a later call retries.
pub struct SdkLoader {
    sdk: Arc<dyn EmbedSdk>,
    in_flight: Mutex<Option<SharedLoad>>,
}

impl SdkLoader {
    pub fn new(sdk: Arc<dyn EmbedSdk>) -> Self {
        Self {
            sdk,
            in_flight: Mutex::new(None),
        }
    }

    pub async fn ensure_loaded(&self) -> Result<(), PlayerError> {
        let load = {
            let mut slot = self.in_flight.lock();
            match slot.as_ref() {
                Some(load) => load.clone(),
                None => {
                    debug!("Loading embed SDK");
                    let sdk = Arc::clone(&self.sdk);
                    let load = async move { sdk.load().await }.boxed().shared();
                    *slot = Some(load.clone());
                    load
                }
            }
        };

        let result = load.clone().await;
        if let Err(err) = &result {
            let mut slot = self.in_flight.lock();
            if slot.as_ref().is_some_and(|current| current.ptr_eq(&load)) {
                warn!("Embed SDK failed to load: {}", err);
                *slot = None;
            }
        }
        result
    }

    pub fn is_loaded(&self) -> bool {
        self.in_flight
            .lock()
            .as_ref()
            .and_then(|load| load.peek())
            .is_some_and(|result| result.is_ok())
    }
}
