use crate::app::GhostlineApp;
use crate::utils::format_time;
use eframe::egui;

pub fn render_search_panel(app: &mut GhostlineApp, ui: &mut egui::Ui) {
    ui.heading("Ghosts");
    ui.separator();

    let mut submit = false;
    egui::Grid::new("search_form").num_columns(2).show(ui, |ui| {
        ui.label("Player:");
        let response = ui.text_edit_singleline(&mut app.search_text);
        submit |= response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        ui.end_row();

        ui.label("Streamer:");
        let response = ui.text_edit_singleline(&mut app.owner_filter);
        submit |= response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        ui.end_row();
    });

    ui.horizontal(|ui| {
        if ui
            .add_enabled(!app.search_running, egui::Button::new("Search"))
            .clicked()
        {
            submit = true;
        }
        if app.search_running {
            ui.spinner();
        }
    });
    if submit {
        let ctx = ui.ctx().clone();
        app.run_search(Some(&ctx));
    }

    ui.separator();

    if app.results.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.label("No ghosts found");
        });
        return;
    }

    let mut activate_idx: Option<usize> = None;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .id_salt("results_scroll")
        .show(ui, |ui| {
            for (i, found) in app.results.iter().enumerate() {
                let is_selected = app.selected_result == Some(i);
                let label = egui::RichText::new(format!(
                    "{} #{}  {}",
                    found.username,
                    found.occurrence,
                    format_time(found.offset_seconds)
                ));
                let response = ui.selectable_label(is_selected, label);
                if response.clicked() {
                    activate_idx = Some(i);
                }

                let title = if found.meta.title.is_empty() {
                    format!("Video {}", found.video_id)
                } else {
                    found.meta.title.clone()
                };
                response.on_hover_text(format!(
                    "{}\n{}{}",
                    title,
                    found.meta.owner_name,
                    found
                        .category
                        .as_ref()
                        .map(|c| format!(" | {}", c))
                        .unwrap_or_default()
                ));
            }
        });

    if let Some(idx) = activate_idx {
        app.activate_result(idx);
    }

    ui.small(format!("{} result(s)", app.results.len()));
}
