use super::bar_height;
use crate::config::FisheyeConfig;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
    Close,
}

/// Drawable piece of a [`BarPath`] with absolute endpoints
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line(Point, Point),
    Cubic([Point; 4]),
}

/// Closed outline of the timeline bar: a flat top edge at y = 0 and a bottom
/// edge that follows the sampled bar heights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarPath {
    pub width: f32,
    /// Bottom edge samples, left to right
    pub samples: Vec<Point>,
    pub commands: Vec<PathCommand>,
}

impl BarPath {
    /// Rectangle of constant height. Degenerate widths give an empty path.
    pub fn flat(width: f32, height: f32) -> Self {
        if !(width > 0.0) || !width.is_finite() {
            return Self::default();
        }
        let samples = vec![Point::new(0.0, height), Point::new(width, height)];
        let commands = vec![
            PathCommand::MoveTo(Point::new(0.0, 0.0)),
            PathCommand::LineTo(Point::new(width, 0.0)),
            PathCommand::LineTo(Point::new(width, height)),
            PathCommand::LineTo(Point::new(0.0, height)),
            PathCommand::Close,
        ];
        Self {
            width,
            samples,
            commands,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Bar thickness at `x`, interpolated between samples.
    /// Used to clip chapter highlights and slits to the outline.
    pub fn height_at(&self, x: f32) -> f32 {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return 0.0;
        };
        if x <= first.x {
            return first.y;
        }
        if x >= last.x {
            return last.y;
        }

        let upper = self.samples.partition_point(|p| p.x <= x);
        let a = self.samples[upper - 1];
        let b = self.samples[upper];
        let span = b.x - a.x;
        if span <= 0.0 {
            return a.y;
        }
        a.y + (b.y - a.y) * (x - a.x) / span
    }

    /// Resolve the commands into line and cubic segments, closing back to the
    /// last move
    pub fn segments(&self) -> Vec<PathSegment> {
        let mut segments = Vec::with_capacity(self.commands.len());
        let mut start = None;
        let mut pen: Option<Point> = None;

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => {
                    start = Some(p);
                    pen = Some(p);
                }
                PathCommand::LineTo(p) => {
                    if let Some(from) = pen {
                        segments.push(PathSegment::Line(from, p));
                    }
                    pen = Some(p);
                }
                PathCommand::CubicTo { c1, c2, to } => {
                    if let Some(from) = pen {
                        segments.push(PathSegment::Cubic([from, c1, c2, to]));
                    }
                    pen = Some(to);
                }
                PathCommand::Close => {
                    if let (Some(from), Some(to)) = (pen, start) {
                        if from != to {
                            segments.push(PathSegment::Line(from, to));
                        }
                    }
                    pen = start;
                }
            }
        }
        segments
    }

    /// SVG path data (`d` attribute)
    pub fn to_svg(&self) -> String {
        let mut d = String::new();
        for command in &self.commands {
            if !d.is_empty() {
                d.push(' ');
            }
            // Writing into a String cannot fail
            let _ = match command {
                PathCommand::MoveTo(p) => write!(d, "M{},{}", coord(p.x), coord(p.y)),
                PathCommand::LineTo(p) => write!(d, "L{},{}", coord(p.x), coord(p.y)),
                PathCommand::CubicTo { c1, c2, to } => write!(
                    d,
                    "C{},{} {},{} {},{}",
                    coord(c1.x),
                    coord(c1.y),
                    coord(c2.x),
                    coord(c2.y),
                    coord(to.x),
                    coord(to.y)
                ),
                PathCommand::Close => write!(d, "Z"),
            };
        }
        d
    }
}

fn coord(value: f32) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Build the bar outline for a bar `width` pixels wide.
///
/// The bottom edge is a Catmull-Rom spline through the height samples,
/// emitted as cubic Bezier segments.
pub fn build_bar_path(width: f32, cursor_x: Option<f32>, config: &FisheyeConfig) -> BarPath {
    if !(width > 0.0) || !width.is_finite() {
        return BarPath::default();
    }
    let Some(cursor) = cursor_x.filter(|c| c.is_finite()) else {
        return BarPath::flat(width, config.rest_height);
    };

    let count = config.path_samples.max(2);
    let samples: Vec<Point> = (0..count)
        .map(|i| {
            let x = width * i as f32 / (count - 1) as f32;
            Point::new(x, bar_height(x, Some(cursor), config))
        })
        .collect();

    let mut commands = Vec::with_capacity(count + 3);
    commands.push(PathCommand::MoveTo(Point::new(0.0, 0.0)));
    commands.push(PathCommand::LineTo(Point::new(width, 0.0)));
    commands.push(PathCommand::LineTo(samples[count - 1]));

    // Bottom edge runs right to left
    let at = |i: isize| samples[i.clamp(0, count as isize - 1) as usize];
    for k in (1..count as isize).rev() {
        let p0 = at(k + 1);
        let p1 = at(k);
        let p2 = at(k - 1);
        let p3 = at(k - 2);
        let c1 = Point::new(p1.x + (p2.x - p0.x) / 6.0, p1.y + (p2.y - p0.y) / 6.0);
        let c2 = Point::new(p2.x - (p3.x - p1.x) / 6.0, p2.y - (p3.y - p1.y) / 6.0);
        commands.push(PathCommand::CubicTo { c1, c2, to: p2 });
    }
    commands.push(PathCommand::Close);

    BarPath {
        width,
        samples,
        commands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_width() {
        let config = FisheyeConfig::default();
        assert!(build_bar_path(0.0, Some(10.0), &config).is_empty());
        assert!(build_bar_path(-5.0, None, &config).is_empty());
        assert!(build_bar_path(f32::NAN, None, &config).is_empty());
        assert_eq!(build_bar_path(0.0, None, &config).height_at(3.0), 0.0);
    }

    #[test]
    fn test_flat_bar_without_cursor() {
        let config = FisheyeConfig::default();
        let path = build_bar_path(100.0, None, &config);
        assert_eq!(path.to_svg(), "M0,0 L100,0 L100,8 L0,8 Z");
        assert_eq!(path.height_at(42.0), 8.0);
    }

    #[test]
    fn test_bulge_follows_cursor() {
        let config = FisheyeConfig::default();
        let path = build_bar_path(400.0, Some(200.0), &config);

        assert_eq!(path.samples.len(), 200);
        assert!(matches!(path.commands.first(), Some(PathCommand::MoveTo(_))));
        assert_eq!(path.commands.last(), Some(&PathCommand::Close));
        let curves = path
            .commands
            .iter()
            .filter(|c| matches!(c, PathCommand::CubicTo { .. }))
            .count();
        assert_eq!(curves, 199);

        assert!((path.height_at(200.0) - 24.0).abs() < 0.1);
        assert_eq!(path.height_at(10.0), 8.0);
        assert!(path.height_at(180.0) > path.height_at(140.0));
    }

    #[test]
    fn test_curve_ends_on_left_edge() {
        let config = FisheyeConfig::default();
        let path = build_bar_path(300.0, Some(20.0), &config);
        let last_curve = path.commands.iter().rev().find_map(|c| match c {
            PathCommand::CubicTo { to, .. } => Some(*to),
            _ => None,
        });
        let to = last_curve.unwrap();
        assert_eq!(to.x, 0.0);
        assert!(to.y > 8.0);
        assert!(path.to_svg().starts_with("M0,0 L300,0 L300,8 C"));
    }

    #[test]
    fn test_segments_follow_samples() {
        let config = FisheyeConfig::default();
        let path = build_bar_path(300.0, Some(150.0), &config);
        let segments = path.segments();

        let cubics: Vec<[Point; 4]> = segments
            .iter()
            .filter_map(|s| match s {
                PathSegment::Cubic(points) => Some(*points),
                _ => None,
            })
            .collect();
        assert_eq!(cubics.len(), path.samples.len() - 1);
        // Bottom edge runs right to left through every sample
        for (cubic, pair) in cubics.iter().zip(path.samples.windows(2).rev()) {
            assert_eq!(cubic[0], pair[1]);
            assert_eq!(cubic[3], pair[0]);
        }

        // Closing edge returns to the top-left corner
        assert_eq!(
            segments.last(),
            Some(&PathSegment::Line(Point::new(0.0, path.samples[0].y), Point::new(0.0, 0.0)))
        );
    }

    #[test]
    fn test_flat_segments_form_rectangle() {
        let path = BarPath::flat(100.0, 8.0);
        let segments = path.segments();
        assert_eq!(segments.len(), 4);
        assert!(segments.iter().all(|s| matches!(s, PathSegment::Line(..))));
        assert!(BarPath::default().segments().is_empty());
    }
}
