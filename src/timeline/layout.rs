use crate::config::{FisheyeConfig, TimelineConfig};
use crate::geometry::{build_bar_path, displace_markers, BarPath};
use crate::session::{ChapterRange, MarkerSet};

/// Everything the layout depends on besides pointer and width
#[derive(Debug, Clone, Copy)]
pub struct TimelineInput<'a> {
    pub markers: &'a MarkerSet,
    pub chapters: &'a [ChapterRange],
    pub duration_seconds: f64,
    pub current_time_seconds: f64,
}

/// Horizontal span of a highlighted chapter, clipped to the bar by the painter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChapterRect {
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerSlit {
    pub marker_index: usize,
    /// Position before fisheye displacement
    pub natural_x: f32,
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Most recently passed marker
    pub active: bool,
    pub snapped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekIndicator {
    pub x: f32,
    pub height: f32,
}

/// Per-frame geometry of the timeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineLayout {
    pub width: f32,
    pub bar: BarPath,
    pub chapter_rects: Vec<ChapterRect>,
    pub marker_slits: Vec<MarkerSlit>,
    pub seek_indicator: Option<SeekIndicator>,
    /// Cursor that shaped this layout; `None` when not interactive
    pub cursor_x: Option<f32>,
}

impl TimelineLayout {
    /// False for the plain flat bar
    pub fn is_interactive(&self) -> bool {
        !self.marker_slits.is_empty()
    }

    pub fn snapped_slit(&self) -> Option<&MarkerSlit> {
        self.marker_slits.iter().find(|s| s.snapped)
    }

    /// Slit under `x`, accepting `slop` extra pixels on each side
    pub fn slit_at(&self, x: f32, slop: f32) -> Option<&MarkerSlit> {
        self.marker_slits
            .iter()
            .filter(|s| (s.x - x).abs() <= s.width / 2.0 + slop)
            .min_by(|a, b| (a.x - x).abs().total_cmp(&(b.x - x).abs()))
    }

    /// Tooltip of a snapped slit is forced open; others open on hover only
    pub fn tooltip_open(&self, slit: &MarkerSlit, hovered: Option<usize>) -> bool {
        slit.snapped || hovered == Some(slit.marker_index)
    }
}

pub(crate) fn valid_width(width: f32) -> bool {
    width.is_finite() && width > 0.0
}

pub(crate) fn valid_duration(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}

pub(crate) fn time_to_x(seconds: f64, duration: f64, width: f32) -> f32 {
    ((seconds / duration).clamp(0.0, 1.0) as f32) * width
}

/// Pure layout computation.
///
/// Zero width, unknown duration or an empty marker set give a flat bar with no
/// slits and no cursor. Chapters and the seek indicator still need a duration.
pub fn compute_layout(
    input: &TimelineInput<'_>,
    width: f32,
    cursor_x: Option<f32>,
    fisheye: &FisheyeConfig,
    timeline: &TimelineConfig,
) -> TimelineLayout {
    if !valid_width(width) {
        return TimelineLayout::default();
    }
    let duration = input.duration_seconds;
    if !valid_duration(duration) {
        return TimelineLayout {
            width,
            bar: BarPath::flat(width, fisheye.rest_height),
            ..Default::default()
        };
    }

    let chapter_rects = input
        .chapters
        .iter()
        .filter_map(|chapter| {
            let start = time_to_x(chapter.start_seconds, duration, width);
            let end = time_to_x(chapter.end_seconds, duration, width);
            (end > start).then_some(ChapterRect {
                x: start,
                width: end - start,
            })
        })
        .collect();

    let cursor_x = if input.markers.is_empty() {
        None
    } else {
        cursor_x
            .filter(|c| c.is_finite())
            .map(|c| c.clamp(0.0, width))
    };
    let bar = build_bar_path(width, cursor_x, fisheye);

    let natural: Vec<f32> = input
        .markers
        .iter()
        .map(|m| time_to_x(m.offset_seconds, duration, width))
        .collect();
    let displacement = displace_markers(&natural, cursor_x, fisheye);
    let active = input.markers.current_index(input.current_time_seconds);

    let marker_slits = natural
        .iter()
        .zip(&displacement.offsets)
        .enumerate()
        .map(|(i, (&natural_x, &offset))| {
            let snapped = displacement.snapped == Some(i);
            let x = (natural_x + offset).clamp(0.0, width);
            MarkerSlit {
                marker_index: i,
                natural_x,
                x,
                width: if snapped {
                    timeline.snapped_slit_width
                } else {
                    timeline.slit_width
                },
                height: bar.height_at(x),
                active: active == Some(i),
                snapped,
            }
        })
        .collect();

    let seek_x = time_to_x(input.current_time_seconds.max(0.0), duration, width);
    let seek_indicator = Some(SeekIndicator {
        x: seek_x,
        height: bar.height_at(seek_x),
    });

    TimelineLayout {
        width,
        bar,
        chapter_rects,
        marker_slits,
        seek_indicator,
        cursor_x,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Marker;

    fn markers(offsets: &[f64]) -> MarkerSet {
        MarkerSet::new(
            offsets
                .iter()
                .enumerate()
                .map(|(i, o)| Marker::new(i.to_string(), format!("ghost{}", i), *o))
                .collect(),
        )
    }

    fn layout(set: &MarkerSet, chapters: &[ChapterRange], cursor: Option<f32>) -> TimelineLayout {
        let input = TimelineInput {
            markers: set,
            chapters,
            duration_seconds: 100.0,
            current_time_seconds: 55.0,
        };
        compute_layout(
            &input,
            100.0,
            cursor,
            &FisheyeConfig::default(),
            &TimelineConfig::default(),
        )
    }

    #[test]
    fn test_rest_layout() {
        let set = markers(&[10.0, 50.0, 90.0]);
        let result = layout(&set, &[], None);

        let xs: Vec<f32> = result.marker_slits.iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![10.0, 50.0, 90.0]);
        assert!(result.marker_slits.iter().all(|s| !s.snapped && s.height == 8.0));
        assert_eq!(result.snapped_slit(), None);
        // 55 s is past the marker at 50
        assert!(result.marker_slits[1].active);
        assert!(!result.marker_slits[2].active);
        assert_eq!(
            result.seek_indicator,
            Some(SeekIndicator { x: 55.0, height: 8.0 })
        );
    }

    #[test]
    fn test_cursor_on_marker_snaps_and_forces_tooltip() {
        let set = markers(&[10.0, 50.0, 90.0]);
        let result = layout(&set, &[], Some(52.0));

        let snapped = result.snapped_slit().unwrap();
        assert_eq!(snapped.marker_index, 1);
        assert_eq!(snapped.width, 3.0);
        assert!((snapped.x - 52.0).abs() < 2.0);
        assert!(snapped.x > 50.0);
        assert!(result.tooltip_open(snapped, None));

        let other = &result.marker_slits[2];
        assert!(!result.tooltip_open(other, None));
        assert!(result.tooltip_open(other, Some(2)));
        // Neighbours pushed outward
        assert!(result.marker_slits[0].x < 10.0);
        assert!(result.marker_slits[2].x > 90.0);
        assert!(snapped.height > 20.0);
    }

    #[test]
    fn test_chapters_map_to_pixels() {
        let set = markers(&[10.0]);
        let chapters = [
            ChapterRange {
                start_seconds: 20.0,
                end_seconds: 40.0,
            },
            ChapterRange {
                start_seconds: 90.0,
                end_seconds: 150.0,
            },
        ];
        let result = layout(&set, &chapters, None);
        assert_eq!(
            result.chapter_rects,
            vec![
                ChapterRect { x: 20.0, width: 20.0 },
                ChapterRect { x: 90.0, width: 10.0 },
            ]
        );
    }

    #[test]
    fn test_degenerate_inputs_are_flat() {
        let set = markers(&[10.0, 50.0]);
        let input = TimelineInput {
            markers: &set,
            chapters: &[],
            duration_seconds: 0.0,
            current_time_seconds: 5.0,
        };
        let config = FisheyeConfig::default();
        let timeline = TimelineConfig::default();

        let no_duration = compute_layout(&input, 100.0, Some(10.0), &config, &timeline);
        assert!(!no_duration.is_interactive());
        assert_eq!(no_duration.bar, BarPath::flat(100.0, 8.0));
        assert_eq!(no_duration.seek_indicator, None);

        let zero_width = compute_layout(&input, 0.0, Some(10.0), &config, &timeline);
        assert!(zero_width.bar.is_empty());
        assert!(zero_width.marker_slits.is_empty());

        let empty = MarkerSet::default();
        let no_markers = layout(&empty, &[], Some(30.0));
        assert!(!no_markers.is_interactive());
        assert_eq!(no_markers.cursor_x, None);
        assert_eq!(no_markers.bar, BarPath::flat(100.0, 8.0));
        assert!(no_markers.seek_indicator.is_some());
    }

    #[test]
    fn test_slit_hit_testing() {
        let set = markers(&[10.0, 50.0]);
        let result = layout(&set, &[], None);
        assert_eq!(result.slit_at(12.0, 4.0).map(|s| s.marker_index), Some(0));
        assert_eq!(result.slit_at(30.0, 4.0), None);
    }
}
