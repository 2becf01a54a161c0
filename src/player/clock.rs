use tokio::time::Instant;

/// Playback position of a simulated instance, bounded by the video length.
/// Reads tokio's clock, so paused-time tests move it deterministically.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    duration: f64,
    /// Position when playback last started or was seeked
    base: f64,
    /// Set while playing
    anchor: Option<Instant>,
}

impl PlaybackClock {
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            base: 0.0,
            anchor: None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn play(&mut self) {
        if self.anchor.is_none() {
            self.anchor = Some(Instant::now());
        }
    }

    pub fn pause(&mut self) {
        self.base = self.position();
        self.anchor = None;
    }

    pub fn seek(&mut self, seconds: f64) {
        self.base = seconds.clamp(0.0, self.duration);
        if self.anchor.is_some() {
            self.anchor = Some(Instant::now());
        }
    }

    pub fn position(&self) -> f64 {
        let elapsed = self
            .anchor
            .map(|anchor| anchor.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        (self.base + elapsed).min(self.duration)
    }

    /// Paused, or stopped at the end of the video
    pub fn is_paused(&self) -> bool {
        self.anchor.is_none() || self.position() >= self.duration
    }
}
