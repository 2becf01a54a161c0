use crate::geometry::{BarPath, PathSegment, Point};
use crate::session::MarkerSet;
use crate::timeline::{MarkerSlit, TimelineInput, TimelineLayout, TimelineViewModel};
use crate::utils::format_time;
use eframe::egui;

const BAR_COLOR: egui::Color32 = egui::Color32::from_rgb(70, 70, 82);
const CHAPTER_COLOR: egui::Color32 = egui::Color32::from_rgb(145, 70, 255);
const SLIT_COLOR: egui::Color32 = egui::Color32::from_gray(200);
const ACTIVE_SLIT_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 200, 80);
const SEEK_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 80, 80);
const OUTLINE_COLOR: egui::Color32 = egui::Color32::from_rgb(110, 110, 128);

/// Room below the tallest bulge for marker tooltips
const TOOLTIP_SPACE: f32 = 22.0;

/// Fisheye ghost timeline: paints a [`TimelineLayout`] and turns pointer
/// input into seek targets through the view-model
pub struct GhostTimelineWidget<'a> {
    view_model: &'a mut TimelineViewModel,
    input: TimelineInput<'a>,
    max_height: f32,
    enabled: bool,
}

impl<'a> GhostTimelineWidget<'a> {
    pub fn new(view_model: &'a mut TimelineViewModel, input: TimelineInput<'a>) -> Self {
        Self {
            view_model,
            input,
            max_height: 24.0,
            enabled: true,
        }
    }

    /// Tallest bar thickness, used to size the widget
    pub fn max_height(mut self, height: f32) -> Self {
        self.max_height = height;
        self
    }

    /// Disabled timelines still paint but never emit seeks
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> TimelineResponse {
        let mut response = TimelineResponse::default();
        let height = self.max_height + TOOLTIP_SPACE;
        let (rect, ui_response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), height),
            egui::Sense::click_and_drag(),
        );

        let vm = self.view_model;
        vm.set_width(rect.width());
        let local_x = |pos: egui::Pos2| pos.x - rect.left();

        if self.enabled {
            // Drags behave like touch: the release commits to a marker
            if ui_response.dragged() {
                if let Some(pos) = ui_response.interact_pointer_pos() {
                    vm.touch_move(local_x(pos));
                    response.is_interacting = true;
                }
            } else if ui_response.drag_stopped() {
                response.seek_to = vm.touch_end(self.input.markers, self.input.duration_seconds);
            } else if let Some(pos) = ui_response.hover_pos() {
                vm.pointer_move(local_x(pos));
                response.is_interacting = true;
            } else {
                vm.pointer_leave();
            }

            if ui_response.clicked() {
                if let Some(pos) = ui_response.interact_pointer_pos() {
                    response.seek_to = vm.click(
                        local_x(pos),
                        self.input.markers,
                        self.input.duration_seconds,
                    );
                }
            }
        } else {
            vm.pointer_leave();
        }

        let layout = vm.layout(&self.input);
        response.hovered_marker = layout
            .cursor_x
            .and_then(|x| vm.hovered_marker(&layout, x));

        if ui.is_rect_visible(rect) {
            let painter = ui.painter_at(rect);
            draw_bar(&painter, rect, &layout.bar);
            draw_outline(&painter, rect, &layout.bar);
            for chapter in &layout.chapter_rects {
                draw_chapter(&painter, rect, &layout.bar, chapter.x, chapter.x + chapter.width);
            }
            for slit in &layout.marker_slits {
                draw_slit(&painter, rect, slit);
            }
            if let Some(seek) = layout.seek_indicator {
                let x = rect.left() + seek.x;
                painter.line_segment(
                    [egui::pos2(x, rect.top()), egui::pos2(x, rect.top() + seek.height)],
                    egui::Stroke::new(vm.timeline_config().seek_indicator_width, SEEK_COLOR),
                );
            }
            draw_tooltips(
                &painter,
                rect,
                &layout,
                response.hovered_marker,
                self.input.markers,
                self.max_height,
            );
        }

        if let Some(x) = layout.cursor_x {
            if layout.snapped_slit().is_none() && self.input.duration_seconds > 0.0 {
                let time = (x / rect.width()) as f64 * self.input.duration_seconds;
                ui_response.on_hover_text_at_pointer(format_time(time));
            }
        }

        response
    }
}

fn draw_tooltips(
    painter: &egui::Painter,
    rect: egui::Rect,
    layout: &TimelineLayout,
    hovered: Option<usize>,
    markers: &MarkerSet,
    bar_height: f32,
) {
    for slit in &layout.marker_slits {
        if !layout.tooltip_open(slit, hovered) {
            continue;
        }
        let Some(marker) = markers.get(slit.marker_index) else {
            continue;
        };
        let text = match &marker.category {
            Some(category) => format!(
                "{} ({}) {}",
                marker.label,
                category,
                format_time(marker.offset_seconds)
            ),
            None => format!("{} {}", marker.label, format_time(marker.offset_seconds)),
        };

        let galley = painter.layout_no_wrap(
            text,
            egui::FontId::proportional(11.0),
            egui::Color32::WHITE,
        );
        let size = galley.size() + egui::vec2(8.0, 4.0);
        let left = (rect.left() + slit.x - size.x / 2.0)
            .clamp(rect.left(), (rect.right() - size.x).max(rect.left()));
        let top = rect.top() + bar_height + 2.0;
        let bubble = egui::Rect::from_min_size(egui::pos2(left, top), size);

        painter.rect_filled(bubble, 3.0, egui::Color32::from_black_alpha(200));
        painter.galley(bubble.min + egui::vec2(4.0, 2.0), galley, egui::Color32::WHITE);
    }
}

/// Bar outline as vertical strips between consecutive samples
fn draw_bar(painter: &egui::Painter, rect: egui::Rect, bar: &BarPath) {
    for pair in bar.samples.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        strip(painter, rect, a.x, a.y, b.x, b.y, BAR_COLOR);
    }
}

/// Stroke the outline segments; the bulge edge is the cubic spline
fn draw_outline(painter: &egui::Painter, rect: egui::Rect, bar: &BarPath) {
    let stroke = egui::Stroke::new(1.0, OUTLINE_COLOR);
    let to_pos = |p: Point| egui::pos2(rect.left() + p.x, rect.top() + p.y);

    for segment in bar.segments() {
        match segment {
            PathSegment::Line(from, to) => {
                painter.line_segment([to_pos(from), to_pos(to)], stroke);
            }
            PathSegment::Cubic(points) => {
                painter.add(egui::epaint::CubicBezierShape::from_points_stroke(
                    points.map(to_pos),
                    false,
                    egui::Color32::TRANSPARENT,
                    stroke,
                ));
            }
        }
    }
}

/// Chapter highlight clipped to the bar outline
fn draw_chapter(painter: &egui::Painter, rect: egui::Rect, bar: &BarPath, start: f32, end: f32) {
    let mut x0 = start;
    let mut edges: Vec<f32> = bar
        .samples
        .iter()
        .map(|p| p.x)
        .filter(|x| *x > start && *x < end)
        .collect();
    edges.push(end);

    for x1 in edges {
        strip(painter, rect, x0, bar.height_at(x0), x1, bar.height_at(x1), CHAPTER_COLOR);
        x0 = x1;
    }
}

fn strip(painter: &egui::Painter, rect: egui::Rect, x0: f32, h0: f32, x1: f32, h1: f32, color: egui::Color32) {
    if x1 <= x0 {
        return;
    }
    let left = rect.left();
    let top = rect.top();
    let quad = vec![
        egui::pos2(left + x0, top),
        egui::pos2(left + x1, top),
        egui::pos2(left + x1, top + h1),
        egui::pos2(left + x0, top + h0),
    ];
    painter.add(egui::Shape::convex_polygon(quad, color, egui::Stroke::NONE));
}

fn draw_slit(painter: &egui::Painter, rect: egui::Rect, slit: &MarkerSlit) {
    let color = if slit.snapped || slit.active {
        ACTIVE_SLIT_COLOR
    } else {
        SLIT_COLOR
    };
    let x = rect.left() + slit.x;
    let slit_rect = egui::Rect::from_min_max(
        egui::pos2(x - slit.width / 2.0, rect.top()),
        egui::pos2(x + slit.width / 2.0, rect.top() + slit.height),
    );
    painter.rect_filled(slit_rect, 0.0, color);
}

#[derive(Debug, Default)]
pub struct TimelineResponse {
    pub seek_to: Option<f64>,
    pub hovered_marker: Option<usize>,
    /// Pointer over or dragging on the bar
    pub is_interacting: bool,
}
