use serde::{Deserialize, Serialize};

/// A labelled moment ("ghost") inside a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    pub label: String,
    /// Free-form tag such as a rank tier
    #[serde(default)]
    pub category: Option<String>,
    pub offset_seconds: f64,
}

impl Marker {
    pub fn new(id: impl Into<String>, label: impl Into<String>, offset_seconds: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category: None,
            offset_seconds,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Markers of one video, ordered by offset.
///
/// Navigation helpers take a `tolerance`: a forward window in which the
/// player still counts as sitting on a marker it has just passed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn new(mut markers: Vec<Marker>) -> Self {
        markers.retain(|m| m.offset_seconds.is_finite());
        markers.sort_by(|a, b| a.offset_seconds.total_cmp(&b.offset_seconds));
        Self { markers }
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    pub fn as_slice(&self) -> &[Marker] {
        &self.markers
    }

    /// Last marker at or before `time`
    pub fn current_index(&self, time: f64) -> Option<usize> {
        self.markers
            .partition_point(|m| m.offset_seconds <= time)
            .checked_sub(1)
    }

    pub fn current(&self, time: f64) -> Option<&Marker> {
        self.current_index(time).and_then(|i| self.markers.get(i))
    }

    /// True when there is no earlier marker to step back to
    pub fn is_at_first(&self, time: f64, tolerance: f64) -> bool {
        self.markers
            .partition_point(|m| m.offset_seconds < time - tolerance)
            == 0
    }

    /// True when there is no later marker to step forward to
    pub fn is_at_last(&self, time: f64, tolerance: f64) -> bool {
        self.markers
            .partition_point(|m| m.offset_seconds <= time + tolerance)
            == self.markers.len()
    }

    /// First marker beyond `time + tolerance`, else the last marker
    pub fn next_index(&self, time: f64, tolerance: f64) -> Option<usize> {
        let last = self.markers.len().checked_sub(1)?;
        let i = self
            .markers
            .partition_point(|m| m.offset_seconds <= time + tolerance);
        Some(i.min(last))
    }

    /// Last marker before `time - tolerance`, else the first marker
    pub fn prev_index(&self, time: f64, tolerance: f64) -> Option<usize> {
        if self.markers.is_empty() {
            return None;
        }
        let i = self
            .markers
            .partition_point(|m| m.offset_seconds < time - tolerance);
        Some(i.saturating_sub(1))
    }

    pub fn next(&self, time: f64, tolerance: f64) -> Option<&Marker> {
        self.next_index(time, tolerance).and_then(|i| self.markers.get(i))
    }

    pub fn prev(&self, time: f64, tolerance: f64) -> Option<&Marker> {
        self.prev_index(time, tolerance).and_then(|i| self.markers.get(i))
    }

    /// Marker closest in time, lowest index on ties
    pub fn nearest_index(&self, time: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, marker) in self.markers.iter().enumerate() {
            let distance = (marker.offset_seconds - time).abs();
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((i, distance)),
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 2.0;

    fn set(offsets: &[f64]) -> MarkerSet {
        MarkerSet::new(
            offsets
                .iter()
                .enumerate()
                .map(|(i, &o)| Marker::new(format!("m{}", i), format!("ghost {}", i), o))
                .collect(),
        )
    }

    #[test]
    fn test_sorted_on_construction() {
        let markers = set(&[90.0, 10.0, f64::NAN, 50.0]);
        let offsets: Vec<f64> = markers.iter().map(|m| m.offset_seconds).collect();
        assert_eq!(offsets, vec![10.0, 50.0, 90.0]);
    }

    #[test]
    fn test_current_marker_is_last_passed() {
        let markers = set(&[10.0, 50.0, 90.0]);
        assert_eq!(markers.current_index(0.0), None);
        assert_eq!(markers.current_index(9.99), None);
        assert_eq!(markers.current_index(10.0), Some(0));
        assert_eq!(markers.current_index(49.0), Some(0));
        assert_eq!(markers.current_index(50.0), Some(1));
        assert_eq!(markers.current_index(500.0), Some(2));

        for step in 0..200 {
            let t = step as f64 * 0.75;
            let expected = markers.iter().rposition(|m| m.offset_seconds <= t);
            assert_eq!(markers.current_index(t), expected);
        }
    }

    #[test]
    fn test_boundaries_with_tolerance() {
        let markers = set(&[10.0, 50.0, 90.0]);
        assert!(markers.is_at_first(5.0, TOLERANCE));
        assert!(markers.is_at_first(11.5, TOLERANCE));
        assert!(!markers.is_at_first(13.0, TOLERANCE));

        assert!(!markers.is_at_last(50.0, TOLERANCE));
        assert!(markers.is_at_last(88.5, TOLERANCE));
        assert!(markers.is_at_last(91.0, TOLERANCE));

        let empty = MarkerSet::default();
        assert!(empty.is_at_first(0.0, TOLERANCE));
        assert!(empty.is_at_last(0.0, TOLERANCE));
    }

    #[test]
    fn test_next_and_prev_clamp_at_ends() {
        let markers = set(&[10.0, 50.0, 90.0]);
        assert_eq!(markers.next_index(0.0, TOLERANCE), Some(0));
        assert_eq!(markers.next_index(10.0, TOLERANCE), Some(1));
        assert_eq!(markers.next_index(51.0, TOLERANCE), Some(2));
        assert_eq!(markers.next_index(90.0, TOLERANCE), Some(2));
        assert_eq!(markers.next_index(300.0, TOLERANCE), Some(2));

        assert_eq!(markers.prev_index(91.5, TOLERANCE), Some(1));
        assert_eq!(markers.prev_index(50.0, TOLERANCE), Some(0));
        assert_eq!(markers.prev_index(10.0, TOLERANCE), Some(0));
        assert_eq!(markers.prev_index(0.0, TOLERANCE), Some(0));

        assert_eq!(MarkerSet::default().next_index(1.0, TOLERANCE), None);
        assert_eq!(MarkerSet::default().prev_index(1.0, TOLERANCE), None);
    }

    #[test]
    fn test_next_then_prev_does_not_skip() {
        let markers = set(&[10.0, 50.0, 90.0, 130.0, 170.0]);
        for (i, marker) in markers.iter().enumerate() {
            for drift in [0.0, 0.5, 1.9] {
                let t = marker.offset_seconds + drift;
                let next = markers.next_index(t, TOLERANCE).unwrap();
                let landed = markers.get(next).unwrap().offset_seconds;
                let back = markers.prev_index(landed, TOLERANCE).unwrap();
                assert!(back == i || back + 1 == i, "from {} via {} back to {}", i, next, back);
            }
        }
    }

    #[test]
    fn test_nearest_index() {
        let markers = set(&[10.0, 50.0, 90.0]);
        assert_eq!(markers.nearest_index(48.0), Some(1));
        assert_eq!(markers.nearest_index(30.0), Some(0));
        assert_eq!(markers.nearest_index(1000.0), Some(2));
        assert_eq!(MarkerSet::default().nearest_index(3.0), None);
    }
}
