use crate::utils::format_duration;
use serde::{Deserialize, Serialize};

/// Highlighted `[start, end)` interval of a video
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChapterRange {
    pub start_seconds: f64,
    pub end_seconds: f64,
}

impl ChapterRange {
    pub fn contains(&self, seconds: f64) -> bool {
        seconds >= self.start_seconds && seconds < self.end_seconds
    }

    pub fn length(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}

/// Parse a flat `[start, end, start, end, ...]` list.
///
/// A trailing unpaired value is dropped, as are empty or reversed pairs and
/// pairs that start before the previous kept pair ends.
pub fn parse_chapter_ranges(flat: &[f64]) -> Vec<ChapterRange> {
    let mut ranges = Vec::with_capacity(flat.len() / 2);
    let mut last_end = f64::NEG_INFINITY;

    for pair in flat.chunks_exact(2) {
        let (start, end) = (pair[0], pair[1]);
        if !start.is_finite() || !end.is_finite() || end <= start || start < last_end {
            continue;
        }
        ranges.push(ChapterRange {
            start_seconds: start,
            end_seconds: end,
        });
        last_end = end;
    }

    ranges
}

/// One-line description for the timeline tooltip
pub fn chapter_summary(ranges: &[ChapterRange]) -> String {
    if ranges.is_empty() {
        return "No chapters detected".to_string();
    }

    let noun = if ranges.len() == 1 { "chapter" } else { "chapters" };
    let spans: Vec<String> = ranges
        .iter()
        .map(|r| format!("{}-{}", format_duration(r.start_seconds), format_duration(r.end_seconds)))
        .collect();
    format!("{} {}: {}", ranges.len(), noun, spans.join(", "))
}
