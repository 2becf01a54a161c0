use crate::catalog::{JsonCatalog, SearchMatch, SearchQuery, VideoCatalog};
use crate::config::AppConfig;
use crate::error::PlayerError;
use crate::player::SimulatedSdk;
use crate::session::SessionController;
use crate::timeline::TimelineViewModel;
use crate::utils::watch_url;
use anyhow::{Context, Result};
use eframe::egui;
use log::{info, warn};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;

type SearchSlot = Arc<Mutex<Option<Result<Vec<SearchMatch>, String>>>>;

pub struct GhostlineApp {
    pub config: AppConfig,
    pub runtime: Runtime,
    pub session: SessionController,
    pub timeline: TimelineViewModel,
    pub status_message: String,

    // Catalog and search
    catalog: Arc<dyn VideoCatalog>,
    pub catalog_name: Option<String>,
    pub search_text: String,
    pub owner_filter: String,
    pub results: Vec<SearchMatch>,
    pub selected_result: Option<usize>,
    pub search_running: bool,
    search_slot: SearchSlot,
}

impl GhostlineApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Result<Self> {
        let runtime = Runtime::new().context("Failed to create Tokio runtime")?;
        let sdk = Arc::new(SimulatedSdk::new());
        let catalog: Arc<dyn VideoCatalog> = Arc::new(JsonCatalog::default());
        let session = SessionController::new(
            sdk,
            Arc::clone(&catalog),
            config.session.clone(),
            runtime.handle().clone(),
        );
        let timeline = TimelineViewModel::new(config.fisheye.clone(), config.timeline.clone());

        let mut app = Self {
            runtime,
            session,
            timeline,
            status_message: String::from("Ready"),
            catalog,
            catalog_name: None,
            search_text: String::new(),
            owner_filter: String::new(),
            results: Vec::new(),
            selected_result: None,
            search_running: false,
            search_slot: Arc::new(Mutex::new(None)),
            config,
        };

        if let Some(path) = app.config.catalog_path.clone() {
            app.open_catalog(&path)?;
        } else {
            app.status_message = String::from("No catalog loaded. Use File > Open Catalog...");
        }
        Ok(app)
    }

    pub fn open_catalog(&mut self, path: &Path) -> Result<()> {
        let catalog = JsonCatalog::load(path)
            .with_context(|| format!("Failed to open catalog {}", path.display()))?;
        let count = catalog.video_count();
        let catalog: Arc<dyn VideoCatalog> = Arc::new(catalog);

        self.session.set_catalog(Arc::clone(&catalog));
        self.catalog = catalog;
        self.catalog_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string());
        self.results.clear();
        self.selected_result = None;
        self.status_message = format!("Loaded {} video(s) from {}", count, path.display());
        info!("{}", self.status_message);
        self.run_search(None);
        Ok(())
    }

    pub fn pick_catalog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Catalog", &["json"])
            .add_filter("All Files", &["*"])
            .pick_file()
        else {
            return;
        };
        if let Err(err) = self.open_catalog(&path) {
            warn!("{:#}", err);
            self.status_message = format!("{:#}", err);
        }
    }

    pub fn run_search(&mut self, ctx: Option<&egui::Context>) {
        let owner = self.owner_filter.trim();
        let query = SearchQuery {
            username: self.search_text.trim().to_string(),
            owner: (!owner.is_empty()).then(|| owner.to_string()),
            ..Default::default()
        };
        let catalog = Arc::clone(&self.catalog);
        let slot = Arc::clone(&self.search_slot);
        let ctx = ctx.cloned();

        self.search_running = true;
        self.runtime.spawn(async move {
            let result = catalog.search(&query).await.map_err(|err| err.to_string());
            *slot.lock() = Some(result);
            if let Some(ctx) = ctx {
                ctx.request_repaint();
            }
        });
    }

    fn poll_search(&mut self) {
        let Some(result) = self.search_slot.lock().take() else {
            return;
        };
        self.search_running = false;
        match result {
            Ok(results) => {
                self.status_message = format!("{} ghost(s) found", results.len());
                self.results = results;
                self.selected_result = None;
            }
            Err(err) => {
                warn!("Search failed: {}", err);
                self.status_message = format!("Search failed: {}", err);
            }
        }
    }

    pub fn activate_result(&mut self, index: usize) {
        let Some(found) = self.results.get(index) else {
            return;
        };
        self.session.activate(
            &found.video_id,
            found.offset_seconds,
            Some(found.meta.clone()),
        );
        self.selected_result = Some(index);
        self.status_message = format!(
            "{} #{} in video {}",
            found.username, found.occurrence, found.video_id
        );
    }

    pub fn activate(&mut self, video_id: &str, offset_seconds: f64) {
        self.session.activate(video_id, offset_seconds, None);
    }

    pub fn seek(&mut self, seconds: f64) {
        let result = self.session.seek(seconds);
        self.report(result);
    }

    pub fn toggle_play(&mut self) {
        let result = self.session.toggle_play();
        self.report(result);
    }

    pub fn toggle_mute(&mut self) {
        let result = self.session.toggle_mute();
        self.report(result);
    }

    pub fn next_marker(&mut self) {
        let result = self.session.next_marker().map(|_| ());
        self.report(result);
    }

    pub fn prev_marker(&mut self) {
        let result = self.session.prev_marker().map(|_| ());
        self.report(result);
    }

    pub fn hide_player(&mut self) {
        self.session.hide();
        self.timeline.pointer_leave();
    }

    /// Watch link for the active video at the current playback position
    pub fn current_watch_url(&self) -> Option<String> {
        let session = self.session.session();
        let video_id = session.video_id?;
        Some(watch_url(&video_id, self.session.current_time()))
    }

    pub fn copy_link(&mut self, ctx: &egui::Context) {
        if let Some(url) = self.current_watch_url() {
            ctx.copy_text(url.clone());
            self.status_message = format!("Copied {}", url);
        }
    }

    pub fn open_in_browser(&mut self) {
        let Some(url) = self.current_watch_url() else {
            return;
        };
        if let Err(err) = open::that(&url) {
            warn!("Failed to open {}: {}", url, err);
            self.status_message = format!("Failed to open browser: {}", err);
        }
    }

    fn report(&mut self, result: Result<(), PlayerError>) {
        if let Err(err) = result {
            warn!("Player command failed: {}", err);
            self.status_message = err.to_string();
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() || !self.session.is_visible() {
            return;
        }
        let (space, mute, next, prev, escape) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::M),
                i.key_pressed(egui::Key::N),
                i.key_pressed(egui::Key::P),
                i.key_pressed(egui::Key::Escape),
            )
        });

        if space {
            self.toggle_play();
        }
        if mute {
            self.toggle_mute();
        }
        if next {
            self.next_marker();
        }
        if prev {
            self.prev_marker();
        }
        if escape {
            self.hide_player();
        }
    }
}

impl eframe::App for GhostlineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);
        self.poll_search();

        crate::ui::render_main_window(self, ctx);

        // Snapshots arrive on the poll interval
        if self.session.is_visible() {
            ctx.request_repaint_after(self.config.session.poll_interval());
        }
        if self.search_running {
            ctx.request_repaint();
        }
    }
}

impl Drop for GhostlineApp {
    fn drop(&mut self) {
        self.session.teardown();
    }
}
