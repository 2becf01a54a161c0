#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Result;
use clap::Parser;
use eframe::egui;
use ghostline::app::GhostlineApp;
use ghostline::cli::Args;
use ghostline::config::AppConfig;
use ghostline::utils::parse_twitch_duration;
use log::{debug, info, warn};

fn main() -> Result<()> {
    let args = Args::parse();

    // Respects RUST_LOG when set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .filter_module("egui", log::LevelFilter::Warn)
        .filter_module("eframe", log::LevelFilter::Warn)
        .format_timestamp_millis()
        .init();

    info!("Ghostline starting...");
    debug!("Command-line args: {:?}", args);

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if args.catalog.is_some() {
        config.catalog_path = args.catalog.clone();
    }

    let startup = args.video.clone().map(|video| {
        let offset = args
            .at
            .as_deref()
            .and_then(|at| {
                let parsed = parse_twitch_duration(at);
                if parsed.is_none() {
                    warn!("Ignoring unreadable start time {:?}", at);
                }
                parsed
            })
            .unwrap_or(0.0);
        (video, offset)
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Ghostline"),
        ..Default::default()
    };

    eframe::run_native(
        "Ghostline",
        options,
        Box::new(move |cc| {
            let mut app = GhostlineApp::new(cc, config)?;
            if let Some((video, offset)) = startup {
                app.activate(&video, offset);
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow::anyhow!("{}", err))
}
