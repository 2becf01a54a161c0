use super::layout::{valid_duration, valid_width};
use super::{compute_layout, TimelineInput, TimelineLayout};
use crate::config::{FisheyeConfig, TimelineConfig};
use crate::session::MarkerSet;

/// Pointer and touch tracking for one timeline bar.
///
/// Seek gestures return the target time instead of seeking, so the caller
/// decides how to reach the session.
#[derive(Debug, Clone)]
pub struct TimelineViewModel {
    fisheye: FisheyeConfig,
    timeline: TimelineConfig,
    width: f32,
    cursor_x: Option<f32>,
    /// Last position of an ongoing touch
    touch_x: Option<f32>,
}

impl TimelineViewModel {
    pub fn new(fisheye: FisheyeConfig, timeline: TimelineConfig) -> Self {
        Self {
            fisheye,
            timeline,
            width: 0.0,
            cursor_x: None,
            touch_x: None,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Measured width of the bar in pixels
    pub fn set_width(&mut self, width: f32) {
        self.width = if valid_width(width) { width } else { 0.0 };
        if let Some(x) = self.cursor_x {
            self.cursor_x = self.clamp_x(x);
        }
    }

    pub fn cursor_x(&self) -> Option<f32> {
        self.cursor_x
    }

    pub fn timeline_config(&self) -> &TimelineConfig {
        &self.timeline
    }

    pub fn pointer_move(&mut self, x: f32) {
        self.cursor_x = self.clamp_x(x);
    }

    pub fn pointer_leave(&mut self) {
        self.cursor_x = None;
    }

    pub fn touch_move(&mut self, x: f32) {
        self.cursor_x = self.clamp_x(x);
        self.touch_x = self.cursor_x;
    }

    /// Finger lifted: commit to the marker nearest the last touch position
    pub fn touch_end(&mut self, markers: &MarkerSet, duration_seconds: f64) -> Option<f64> {
        let target = self
            .touch_x
            .and_then(|x| self.nearest_marker_time(x, markers, duration_seconds));
        self.touch_x = None;
        self.cursor_x = None;
        target
    }

    pub fn touch_cancel(&mut self, markers: &MarkerSet, duration_seconds: f64) -> Option<f64> {
        self.touch_end(markers, duration_seconds)
    }

    /// Seek target for a click at `x`: the nearest marker, or the raw time
    /// when the video has no markers
    pub fn click(&self, x: f32, markers: &MarkerSet, duration_seconds: f64) -> Option<f64> {
        let x = self.clamp_x(x)?;
        if !valid_duration(duration_seconds) {
            return None;
        }
        self.nearest_marker_time(x, markers, duration_seconds)
            .or_else(|| Some(self.x_to_time(x, duration_seconds)))
    }

    pub fn layout(&self, input: &TimelineInput<'_>) -> TimelineLayout {
        compute_layout(
            input,
            self.width,
            self.cursor_x,
            &self.fisheye,
            &self.timeline,
        )
    }

    /// Marker index under `x` in `layout`, with the configured slop
    pub fn hovered_marker(&self, layout: &TimelineLayout, x: f32) -> Option<usize> {
        layout
            .slit_at(x, self.timeline.hover_slop)
            .map(|s| s.marker_index)
    }

    fn clamp_x(&self, x: f32) -> Option<f32> {
        (valid_width(self.width) && x.is_finite()).then(|| x.clamp(0.0, self.width))
    }

    fn x_to_time(&self, x: f32, duration_seconds: f64) -> f64 {
        (x / self.width) as f64 * duration_seconds
    }

    fn nearest_marker_time(&self, x: f32, markers: &MarkerSet, duration_seconds: f64) -> Option<f64> {
        if !valid_width(self.width) || !valid_duration(duration_seconds) {
            return None;
        }
        let time = self.x_to_time(x, duration_seconds);
        markers
            .nearest_index(time)
            .and_then(|i| markers.get(i))
            .map(|m| m.offset_seconds)
    }
}
