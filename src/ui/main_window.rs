use crate::app::GhostlineApp;
use crate::ui::{render_embed_panel, render_search_panel};
use eframe::egui;

pub fn render_main_window(app: &mut GhostlineApp, ctx: &egui::Context) {
    // Top menu bar
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        render_menu_bar(app, ui);
    });

    // Status bar at bottom
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        render_status_bar(app, ui);
    });

    // Left panel: ghost search
    egui::SidePanel::left("search_panel")
        .resizable(true)
        .default_width(280.0)
        .min_width(200.0)
        .max_width(420.0)
        .show(ctx, |ui| {
            render_search_panel(app, ui);
        });

    // Central panel: embedded player + timeline
    egui::CentralPanel::default().show(ctx, |ui| {
        render_embed_panel(app, ui);
    });
}

fn render_menu_bar(app: &mut GhostlineApp, ui: &mut egui::Ui) {
    egui::menu::bar(ui, |ui| {
        ui.menu_button("File", |ui| {
            if ui.button("Open Catalog...").clicked() {
                app.pick_catalog();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Exit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.menu_button("Playback", |ui| {
            let ready = app.session.is_ready();

            if ui.add_enabled(ready, egui::Button::new("Play/Pause (Space)")).clicked() {
                app.toggle_play();
                ui.close_menu();
            }
            if ui.add_enabled(ready, egui::Button::new("Mute (M)")).clicked() {
                app.toggle_mute();
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(ready && !app.session.is_at_last_marker(), egui::Button::new("Next Ghost (N)"))
                .clicked()
            {
                app.next_marker();
                ui.close_menu();
            }
            if ui
                .add_enabled(ready && !app.session.is_at_first_marker(), egui::Button::new("Previous Ghost (P)"))
                .clicked()
            {
                app.prev_marker();
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(app.session.is_visible(), egui::Button::new("Close Player (Esc)"))
                .clicked()
            {
                app.hide_player();
                ui.close_menu();
            }
        });
    });
}

fn render_status_bar(app: &GhostlineApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.label(&app.status_message);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(format!("{} ghost(s)", app.session.markers().len()));
            ui.separator();
            ui.label(app.catalog_name.as_deref().unwrap_or("no catalog"));
        });
    });
}
