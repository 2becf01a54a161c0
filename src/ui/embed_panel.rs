use crate::app::GhostlineApp;
use crate::player::AdapterState;
use crate::session::{chapter_summary, VideoMeta};
use crate::timeline::TimelineInput;
use crate::ui::GhostTimelineWidget;
use crate::utils::format_time;
use eframe::egui;
use log::warn;

pub fn render_embed_panel(app: &mut GhostlineApp, ui: &mut egui::Ui) {
    if !app.session.is_visible() {
        ui.centered_and_justified(|ui| {
            ui.label("No video open\nPick a ghost from the list to start watching");
        });
        return;
    }

    render_meta_bar(app, ui);
    ui.separator();
    render_player_area(app, ui);
    ui.separator();
    render_transport(app, ui);
    render_timeline(app, ui);

    let chapters = app.session.chapters();
    ui.small(chapter_summary(&chapters));
}

fn render_meta_bar(app: &mut GhostlineApp, ui: &mut egui::Ui) {
    let session = app.session.session();
    let video_id = session.video_id.unwrap_or_default();

    ui.horizontal(|ui| {
        match &session.meta {
            Some(meta) => {
                render_avatar(ui, meta);
                ui.strong(&meta.owner_name);
                ui.label(&meta.title);
                if let Some(date) = &meta.published_date {
                    ui.small(date);
                }
            }
            None => {
                ui.strong(format!("Video {}", video_id));
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button("x").on_hover_text("Close player (Esc)").clicked() {
                app.hide_player();
            }
            if ui.small_button("Open").on_hover_text("Open on Twitch").clicked() {
                app.open_in_browser();
            }
            if ui
                .small_button("Copy link")
                .on_hover_text("Copy a link at the current time")
                .clicked()
            {
                let ctx = ui.ctx().clone();
                app.copy_link(&ctx);
            }
        });
    });
}

/// Round badge with the owner's initial; the avatar link opens on click
fn render_avatar(ui: &mut egui::Ui, meta: &VideoMeta) {
    let size = 20.0;
    let sense = if meta.owner_avatar_url.is_some() {
        egui::Sense::click()
    } else {
        egui::Sense::hover()
    };
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), sense);
    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        painter.circle_filled(rect.center(), size / 2.0, egui::Color32::from_rgb(145, 70, 255));
        let initial = meta.owner_initial().map(String::from).unwrap_or_default();
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            initial,
            egui::FontId::proportional(12.0),
            egui::Color32::WHITE,
        );
    }

    if let Some(url) = &meta.owner_avatar_url {
        if response.on_hover_text(url.as_str()).clicked() {
            if let Err(err) = open::that(url) {
                warn!("Failed to open {}: {}", url, err);
            }
        }
    }
}

fn render_player_area(app: &GhostlineApp, ui: &mut egui::Ui) {
    let available_size = ui.available_size();
    let player_height = (available_size.y * 0.6).clamp(150.0, 480.0);
    let snapshot = app.session.snapshot();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_height(player_height);
        ui.set_max_height(player_height);

        ui.centered_and_justified(|ui| {
            if let Some(error) = app.session.error() {
                ui.colored_label(egui::Color32::from_rgb(255, 100, 100), error);
                return;
            }
            match app.session.adapter_state() {
                AdapterState::Loading { .. } | AdapterState::Empty => {
                    ui.spinner();
                }
                AdapterState::Ready { .. } => {
                    let status = if snapshot.is_paused { "Paused" } else { "Playing" };
                    ui.label(format!(
                        "[{}]\n{}\n{} / {}",
                        app.session.mount_id(),
                        status,
                        format_time(snapshot.current_time_seconds),
                        format_time(snapshot.duration_seconds)
                    ));
                }
                AdapterState::Error { message, .. } => {
                    ui.colored_label(egui::Color32::from_rgb(255, 100, 100), message);
                }
                AdapterState::Destroyed => {
                    ui.label("Player closed");
                }
            }
        });
    });
}

fn render_transport(app: &mut GhostlineApp, ui: &mut egui::Ui) {
    let ready = app.session.is_ready();
    let snapshot = app.session.snapshot();

    ui.horizontal(|ui| {
        if ui
            .add_enabled(ready && !app.session.is_at_first_marker(), egui::Button::new("|<"))
            .on_hover_text("Previous ghost (P)")
            .clicked()
        {
            app.prev_marker();
        }

        let play_pause_text = if snapshot.is_paused { ">" } else { "||" };
        if ui
            .add_enabled(ready, egui::Button::new(play_pause_text))
            .on_hover_text("Play/Pause (Space)")
            .clicked()
        {
            app.toggle_play();
        }

        if ui
            .add_enabled(ready && !app.session.is_at_last_marker(), egui::Button::new(">|"))
            .on_hover_text("Next ghost (N)")
            .clicked()
        {
            app.next_marker();
        }

        let mute_text = if snapshot.is_muted { "Unmute" } else { "Mute" };
        if ui
            .add_enabled(ready, egui::Button::new(mute_text))
            .on_hover_text("Mute (M)")
            .clicked()
        {
            app.toggle_mute();
        }

        ui.separator();

        ui.label(format!(
            "{} / {}",
            format_time(snapshot.current_time_seconds),
            format_time(app.session.duration())
        ));

        if let Some(marker) = app.session.current_marker() {
            ui.separator();
            match &marker.category {
                Some(category) => ui.label(format!("{} ({})", marker.label, category)),
                None => ui.label(&marker.label),
            };
        }
    });
}

fn render_timeline(app: &mut GhostlineApp, ui: &mut egui::Ui) {
    let markers = app.session.markers();
    let chapters = app.session.chapters();
    let input = TimelineInput {
        markers: &markers,
        chapters: &chapters,
        duration_seconds: app.session.duration(),
        current_time_seconds: app.session.current_time(),
    };
    let ready = app.session.is_ready();
    let max_height = app.config.fisheye.max_height;

    let response = GhostTimelineWidget::new(&mut app.timeline, input)
        .max_height(max_height)
        .enabled(ready)
        .show(ui);

    if let Some(time) = response.seek_to {
        app.seek(time);
    }
    if response.is_interacting {
        ui.ctx().request_repaint();
    }
}
